//! Request validation
//!
//! Turns raw query parameters into a [`ProfileRequest`]. Pure: nothing here
//! touches `/proc`, the filesystem, or any external tool.

use std::num::IntErrorKind;

use crate::domain::{ProfileFormat, ProfileQuery, ProfileRequest, RequestError, Seconds};

/// Validate the query for a session on the given route.
///
/// Empty strings count as missing. Both formats share the same duration
/// bounds.
///
/// # Errors
/// - [`RequestError::MissingParameters`] naming every absent parameter
/// - [`RequestError::DurationNotANumber`] when `seconds` is not an integer
/// - [`RequestError::DurationOutOfRange`] when `seconds` is outside 1..=300
pub fn validate(
    query: &ProfileQuery,
    format: ProfileFormat,
) -> Result<ProfileRequest, RequestError> {
    let pid = non_empty(query.pid.as_deref());
    let seconds = non_empty(query.seconds.as_deref());

    let (pid, seconds) = match (pid, seconds) {
        (Some(pid), Some(seconds)) => (pid, seconds),
        (pid, seconds) => {
            let mut missing = Vec::new();
            if pid.is_none() {
                missing.push("pid");
            }
            if seconds.is_none() {
                missing.push("seconds");
            }
            return Err(RequestError::MissingParameters(missing));
        }
    };

    Ok(ProfileRequest {
        pid: pid.to_string(),
        duration: parse_duration(seconds)?,
        format,
        test_mode: query.test.as_deref() == Some("true"),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn parse_duration(raw: &str) -> Result<Seconds, RequestError> {
    let secs = match raw.parse::<i64>() {
        Ok(secs) => secs,
        // "99999999999999999999" is a number, just not one we accept
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return Err(RequestError::DurationOutOfRange(raw.to_string()));
        }
        Err(_) => return Err(RequestError::DurationNotANumber(raw.to_string())),
    };

    u32::try_from(secs)
        .ok()
        .and_then(Seconds::new)
        .ok_or_else(|| RequestError::DurationOutOfRange(raw.to_string()))
}
