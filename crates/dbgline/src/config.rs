//! crates/dbgline/src/config.rs
//! Process-wide verbosity threshold and default destination.
//!
//! Both values are reachable from any call depth through the accessor
//! functions below; nothing is threaded through function signatures. The
//! threshold is a relaxed atomic, so a reader on another thread may observe a
//! stale value for a short while. The default destination lives behind a
//! lock whose poisoning is ignored.

use std::env;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::destination::Destination;

/// Name of the variable consulted for the initial threshold, both at build
/// time and by [`init_from_env`].
pub const LEVEL_ENV: &str = "DBGLINE_LEVEL";

/// Name of the build-time variable that overrides [`MAX_LENGTH_HINT`].
pub const MAX_LENGTH_ENV: &str = "DBGLINE_MAX_LENGTH";

/// Threshold in effect when the process starts.
///
/// Defaults to `1`, which lets every statement without an explicit level
/// through. Setting `DBGLINE_LEVEL` while compiling overrides it.
pub const INITIAL_VERBOSITY: u32 = match option_env!("DBGLINE_LEVEL") {
    Some(text) => parse_build_value(text),
    None => 1,
};

/// Preferred upper bound for the message part of a line, in characters.
///
/// Guidance only: nothing truncates or wraps longer messages. The default
/// keeps a typical line on an 80-column terminal once the file, line, and
/// function prefix is added.
pub const MAX_LENGTH_HINT: usize = match option_env!("DBGLINE_MAX_LENGTH") {
    Some(text) => parse_build_value(text) as usize,
    None => 60,
};

static VERBOSITY: AtomicU32 = AtomicU32::new(INITIAL_VERBOSITY);
static DEFAULT_DESTINATION: RwLock<Option<Destination>> = RwLock::new(Some(Destination::Stderr));

const fn parse_build_value(text: &str) -> u32 {
    let digits = text.as_bytes().trim_ascii();
    assert!(!digits.is_empty(), "build-time dbgline value must not be empty");

    let mut value: u32 = 0;
    let mut index = 0;
    while index < digits.len() {
        let byte = digits[index];
        assert!(
            byte.is_ascii_digit(),
            "build-time dbgline value must be an unsigned decimal integer"
        );
        value = match value.checked_mul(10) {
            Some(shifted) => shifted,
            None => panic!("build-time dbgline value does not fit in 32 bits"),
        };
        value = match value.checked_add((byte - b'0') as u32) {
            Some(sum) => sum,
            None => panic!("build-time dbgline value does not fit in 32 bits"),
        };
        index += 1;
    }
    value
}

/// Returns the current verbosity threshold.
#[inline]
pub fn verbosity() -> u32 {
    VERBOSITY.load(Ordering::Relaxed)
}

/// Replaces the verbosity threshold. `0` silences every statement.
#[inline]
pub fn set_verbosity(level: u32) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

/// Returns a handle to the current default destination.
///
/// `None` means the default was explicitly cleared; emitting through the
/// default in that state panics.
pub fn default_destination() -> Option<Destination> {
    DEFAULT_DESTINATION
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the default destination.
pub fn set_default_destination(destination: Option<Destination>) {
    let _previous = replace_default_destination(destination);
}

/// Replaces the default destination and returns the one it displaced.
#[must_use = "the returned destination was the default before the replacement"]
pub fn replace_default_destination(destination: Option<Destination>) -> Option<Destination> {
    let mut slot = DEFAULT_DESTINATION
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, destination)
}

/// Failure to interpret text as a verbosity threshold.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum VerbosityParseError {
    /// The text was empty or only whitespace.
    #[error("verbosity value is empty")]
    Empty,
    /// The text contained something other than ASCII digits.
    #[error("verbosity value {0:?} is not an unsigned decimal integer")]
    Invalid(String),
    /// The digits describe a value larger than `u32::MAX`.
    #[error("verbosity value {0:?} does not fit in 32 bits")]
    Overflow(String),
}

/// Parses a verbosity threshold from decimal text.
///
/// Surrounding whitespace is ignored. Signs are rejected: a threshold is
/// never negative.
///
/// # Examples
///
/// ```
/// use dbgline::{VerbosityParseError, parse_verbosity};
///
/// assert_eq!(parse_verbosity(" 3 "), Ok(3));
/// assert_eq!(parse_verbosity(""), Err(VerbosityParseError::Empty));
/// assert!(parse_verbosity("-1").is_err());
/// ```
pub fn parse_verbosity(text: &str) -> Result<u32, VerbosityParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(VerbosityParseError::Empty);
    }
    if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(VerbosityParseError::Invalid(trimmed.to_owned()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| VerbosityParseError::Overflow(trimmed.to_owned()))
}

/// Applies `DBGLINE_LEVEL` from the running process's environment.
///
/// Returns the applied threshold, or `None` when the variable is unset. A
/// malformed value leaves the threshold untouched.
pub fn init_from_env() -> Result<Option<u32>, VerbosityParseError> {
    apply_env_value(env::var(LEVEL_ENV))
}

fn apply_env_value(
    value: Result<String, env::VarError>,
) -> Result<Option<u32>, VerbosityParseError> {
    let value = match value {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(raw)) => {
            return Err(VerbosityParseError::Invalid(
                raw.to_string_lossy().into_owned(),
            ));
        }
    };

    let level = parse_verbosity(&value)?;
    set_verbosity(level);
    Ok(Some(level))
}

/// Point-in-time view of the facility's configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticSettings {
    /// Threshold at the time of the snapshot.
    pub verbosity: u32,
    /// Soft message length guidance, see [`MAX_LENGTH_HINT`].
    pub max_length_hint: usize,
    /// Whether the debug macros were compiled in.
    pub enabled: bool,
}

/// Captures the current configuration.
pub fn settings() -> DiagnosticSettings {
    DiagnosticSettings {
        verbosity: verbosity(),
        max_length_hint: MAX_LENGTH_HINT,
        enabled: cfg!(feature = "diagnostics"),
    }
}

/// RAII guard that restores the previous verbosity threshold on drop.
///
/// Created by [`scoped_verbosity`].
#[must_use = "dropping the guard immediately restores the previous verbosity"]
#[derive(Debug)]
pub struct VerbosityGuard {
    previous: u32,
}

impl VerbosityGuard {
    /// Returns the threshold that will be restored when the guard is dropped.
    #[must_use]
    pub const fn previous_verbosity(&self) -> u32 {
        self.previous
    }
}

impl Drop for VerbosityGuard {
    fn drop(&mut self) {
        set_verbosity(self.previous);
    }
}

/// Sets the threshold until the returned guard is dropped.
///
/// # Examples
///
/// ```
/// use dbgline::{scoped_verbosity, verbosity};
///
/// let before = verbosity();
/// {
///     let _guard = scoped_verbosity(4);
///     assert_eq!(verbosity(), 4);
/// }
/// assert_eq!(verbosity(), before);
/// ```
pub fn scoped_verbosity(level: u32) -> VerbosityGuard {
    VerbosityGuard {
        previous: VERBOSITY.swap(level, Ordering::Relaxed),
    }
}

/// RAII guard that restores the previous default destination on drop.
///
/// Created by [`scoped_default_destination`].
#[must_use = "dropping the guard immediately restores the previous default destination"]
#[derive(Debug)]
pub struct DestinationGuard {
    previous: Option<Option<Destination>>,
}

impl DestinationGuard {
    /// Returns the destination that will be restored when the guard is dropped.
    #[must_use]
    pub fn previous_destination(&self) -> Option<&Destination> {
        self.previous.as_ref().and_then(Option::as_ref)
    }

    /// Consumes the guard without restoring the previous destination.
    ///
    /// The scoped destination becomes the new baseline. The displaced
    /// destination is handed back to the caller.
    pub fn keep(mut self) -> Option<Destination> {
        self.previous.take().flatten()
    }
}

impl Drop for DestinationGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            set_default_destination(previous);
        }
    }
}

/// Installs `destination` as the default until the returned guard is dropped.
pub fn scoped_default_destination(destination: Option<Destination>) -> DestinationGuard {
    DestinationGuard {
        previous: Some(replace_default_destination(destination)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn build_value_parser_accepts_padded_digits() {
        assert_eq!(parse_build_value("7"), 7);
        assert_eq!(parse_build_value(" 42\n"), 42);
        assert_eq!(parse_build_value("4294967295"), u32::MAX);
    }

    #[test]
    #[should_panic(expected = "unsigned decimal")]
    fn build_value_parser_rejects_signs() {
        let _ = parse_build_value("-1");
    }

    #[test]
    #[should_panic(expected = "32 bits")]
    fn build_value_parser_rejects_overflow() {
        let _ = parse_build_value("4294967296");
    }

    #[test]
    fn parse_verbosity_reports_each_failure_kind() {
        assert_eq!(parse_verbosity("0"), Ok(0));
        assert_eq!(parse_verbosity("  "), Err(VerbosityParseError::Empty));
        assert_eq!(
            parse_verbosity("+2"),
            Err(VerbosityParseError::Invalid("+2".to_owned()))
        );
        assert_eq!(
            parse_verbosity("99999999999"),
            Err(VerbosityParseError::Overflow("99999999999".to_owned()))
        );
    }

    #[test]
    fn parse_errors_render_readable_messages() {
        let message = VerbosityParseError::Invalid("x".to_owned()).to_string();
        assert_eq!(message, "verbosity value \"x\" is not an unsigned decimal integer");
    }

    #[test]
    #[serial]
    fn verbosity_reads_are_stable_without_writes() {
        let _guard = scoped_verbosity(3);
        assert_eq!(verbosity(), verbosity());
        assert_eq!(verbosity(), 3);
    }

    #[test]
    #[serial]
    fn verbosity_guard_restores_previous_value() {
        set_verbosity(2);
        {
            let guard = scoped_verbosity(9);
            assert_eq!(guard.previous_verbosity(), 2);
            assert_eq!(verbosity(), 9);
        }
        assert_eq!(verbosity(), 2);
        set_verbosity(INITIAL_VERBOSITY);
    }

    #[test]
    #[serial]
    fn default_destination_starts_as_stderr() {
        let current = default_destination().expect("default destination");
        assert!(current.same_target(&Destination::Stderr));
    }

    #[test]
    #[serial]
    fn destination_guard_restores_on_drop() {
        {
            let guard = scoped_default_destination(Some(Destination::Stdout));
            assert!(
                guard
                    .previous_destination()
                    .is_some_and(|previous| previous.same_target(&Destination::Stderr))
            );
            assert!(default_destination().is_some_and(|d| d.same_target(&Destination::Stdout)));
        }
        assert!(default_destination().is_some_and(|d| d.same_target(&Destination::Stderr)));
    }

    #[test]
    #[serial]
    fn destination_guard_keep_skips_restoration() {
        let previous = scoped_default_destination(None).keep();
        assert!(default_destination().is_none());
        set_default_destination(previous);
        assert!(default_destination().is_some_and(|d| d.same_target(&Destination::Stderr)));
    }

    #[test]
    #[serial]
    fn env_values_apply_or_leave_threshold_untouched() {
        let _guard = scoped_verbosity(1);

        assert_eq!(apply_env_value(Ok("5".to_owned())), Ok(Some(5)));
        assert_eq!(verbosity(), 5);

        assert!(matches!(
            apply_env_value(Ok("loud".to_owned())),
            Err(VerbosityParseError::Invalid(_))
        ));
        assert_eq!(verbosity(), 5);

        assert_eq!(apply_env_value(Err(env::VarError::NotPresent)), Ok(None));
        assert_eq!(verbosity(), 5);
    }

    #[test]
    #[serial]
    fn settings_snapshot_reflects_current_state() {
        let _guard = scoped_verbosity(6);
        let snapshot = settings();
        assert_eq!(snapshot.verbosity, 6);
        assert_eq!(snapshot.max_length_hint, MAX_LENGTH_HINT);
        assert_eq!(snapshot.enabled, cfg!(feature = "diagnostics"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn settings_round_trip_through_json() {
        let snapshot = DiagnosticSettings {
            verbosity: 2,
            max_length_hint: 60,
            enabled: true,
        };
        let json = serde_json::to_string(&snapshot).expect("serialize");
        assert_eq!(
            json,
            r#"{"verbosity":2,"max_length_hint":60,"enabled":true}"#
        );
        let parsed: DiagnosticSettings = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, snapshot);
    }
}
