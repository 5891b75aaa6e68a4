//! Newtypes and request values shared by every profiling session.

use serde::Deserialize;
use std::fmt;

/// Process ID of a profiling target that passed the existence check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sampling duration in whole seconds, always within `MIN..=MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Seconds(u32);

impl Seconds {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 300;

    /// Returns `None` when `secs` is outside the accepted range.
    #[must_use]
    pub fn new(secs: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&secs).then_some(Self(secs))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output format selected by the route a request arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFormat {
    /// gzip-compressed pprof protobuf from `perf record` + `pprof -proto`
    Pprof,
    /// Folded stacks from the BCC `profile` tool
    Folded,
}

impl ProfileFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pprof => "pprof",
            Self::Folded => "folded",
        }
    }
}

impl fmt::Display for ProfileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw query parameters as received from the HTTP layer
///
/// A repeated key keeps its first value; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct ProfileQuery {
    pub pid: Option<String>,
    pub seconds: Option<String>,
    pub test: Option<String>,
}

impl From<Vec<(String, String)>> for ProfileQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "pid" => &mut query.pid,
                "seconds" => &mut query.seconds,
                "test" => &mut query.test,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// A validated profiling request
///
/// `pid` stays a string here: test-mode sessions never parse it, and the
/// existence check is what turns it into a [`Pid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRequest {
    pub pid: String,
    pub duration: Seconds,
    pub format: ProfileFormat,
    pub test_mode: bool,
}
