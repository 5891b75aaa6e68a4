//! Stderr-based failure classification
//!
//! Tool wording changes between versions, so the patterns are data: an
//! ordered list of rules, first match wins, anything unmatched is generic.

/// Coarse cause of a failed external tool run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    PermissionDenied,
    ProcessVanished,
    NoSamples,
    Generic,
}

#[derive(Debug, Clone)]
struct Rule {
    /// Stored lowercased; matching is case-insensitive
    pattern: String,
    kind: FailureKind,
}

#[derive(Debug, Clone, Default)]
pub struct StderrClassifier {
    rules: Vec<Rule>,
}

impl StderrClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; earlier rules take precedence.
    #[must_use]
    pub fn rule(mut self, pattern: &str, kind: FailureKind) -> Self {
        self.rules.push(Rule { pattern: pattern.to_lowercase(), kind });
        self
    }

    /// Rules for `perf record` failures
    #[must_use]
    pub fn capture_defaults() -> Self {
        Self::new()
            .rule("permission denied", FailureKind::PermissionDenied)
            .rule("no such process", FailureKind::ProcessVanished)
    }

    /// Rules for `pprof -proto` failures
    #[must_use]
    pub fn conversion_defaults() -> Self {
        Self::new()
            .rule("no samples", FailureKind::NoSamples)
            .rule("permission denied", FailureKind::PermissionDenied)
    }

    #[must_use]
    pub fn classify(&self, stderr: &str) -> FailureKind {
        let haystack = stderr.to_lowercase();
        self.rules
            .iter()
            .find(|rule| haystack.contains(&rule.pattern))
            .map_or(FailureKind::Generic, |rule| rule.kind)
    }
}
