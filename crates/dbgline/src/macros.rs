//! crates/dbgline/src/macros.rs
//! The eight debug statements.
//!
//! Each macro exists twice. With the `diagnostics` feature the definition
//! checks the level gate, resolves the destination, captures the location,
//! and writes the line. Without it the definition discards its tokens and
//! expands to `()`, so no argument is evaluated and no code is generated.
//! Write errors are discarded by every macro; use [`emit`](crate::emit) to
//! observe them.
//!
//! Naming follows the axes of the call: an `l` takes an explicit level, a
//! leading `f` takes an explicit destination, and a trailing `f` takes a
//! format string. Literal forms print any [`Display`](core::fmt::Display)
//! value verbatim, so braces in a literal message are not interpreted.

/// Writes a literal message at level 1 to the default destination.
///
/// # Examples
///
/// ```
/// dbgline::debug!("cache warmed");
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! debug {
    ($message:expr $(,)?) => {
        $crate::fdebuglf!(1, ::core::option::Option::None::<$crate::Destination>, "{}", $message)
    };
}

/// Writes a literal message at level 1 to the default destination.
///
/// Compiled out: expands to `()` without evaluating its argument.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! debug {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a literal message at an explicit level to the default destination.
///
/// # Examples
///
/// ```
/// dbgline::debugl!(3, "entering slow path");
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! debugl {
    ($level:expr, $message:expr $(,)?) => {
        $crate::fdebuglf!(
            $level,
            ::core::option::Option::None::<$crate::Destination>,
            "{}",
            $message
        )
    };
}

/// Writes a literal message at an explicit level to the default destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! debugl {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a literal message at level 1 to an explicit destination.
///
/// The destination is anything implementing
/// [`IntoDestination`](crate::IntoDestination); `None` falls back to the
/// default destination.
///
/// # Examples
///
/// ```
/// use dbgline::Destination;
///
/// dbgline::fdebug!(Destination::Stdout, "to stdout");
/// dbgline::fdebug!(None, "to the default destination");
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! fdebug {
    ($destination:expr, $message:expr $(,)?) => {
        $crate::fdebuglf!(1, $destination, "{}", $message)
    };
}

/// Writes a literal message at level 1 to an explicit destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! fdebug {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a literal message at an explicit level to an explicit destination.
///
/// # Examples
///
/// ```
/// use dbgline::Destination;
///
/// dbgline::fdebugl!(2, Destination::Stderr, "detailed state");
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! fdebugl {
    ($level:expr, $destination:expr, $message:expr $(,)?) => {
        $crate::fdebuglf!($level, $destination, "{}", $message)
    };
}

/// Writes a literal message at an explicit level to an explicit destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! fdebugl {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a formatted message at level 1 to the default destination.
///
/// Accepts the same arguments as [`format_args!`].
///
/// # Examples
///
/// ```
/// let entries = 12;
/// dbgline::debugf!("loaded {entries} entries");
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::fdebuglf!(1, ::core::option::Option::None::<$crate::Destination>, $($arg)+)
    };
}

/// Writes a formatted message at level 1 to the default destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! debugf {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a formatted message at an explicit level to the default destination.
///
/// # Examples
///
/// ```
/// dbgline::debuglf!(2, "count={}", 7);
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! debuglf {
    ($level:expr, $($arg:tt)+) => {
        $crate::fdebuglf!(
            $level,
            ::core::option::Option::None::<$crate::Destination>,
            $($arg)+
        )
    };
}

/// Writes a formatted message at an explicit level to the default destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! debuglf {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a formatted message at level 1 to an explicit destination.
///
/// # Examples
///
/// ```
/// use dbgline::Destination;
///
/// dbgline::fdebugf!(Destination::Stdout, "{} of {}", 3, 4);
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! fdebugf {
    ($destination:expr, $($arg:tt)+) => {
        $crate::fdebuglf!(1, $destination, $($arg)+)
    };
}

/// Writes a formatted message at level 1 to an explicit destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! fdebugf {
    ($($ignored:tt)*) => {
        ()
    };
}

/// Writes a formatted message at an explicit level to an explicit destination.
///
/// Every other debug macro expands to this one. The level expression is
/// evaluated exactly once. When the level does not pass the threshold, the
/// destination and format arguments are not evaluated at all.
///
/// # Examples
///
/// ```
/// use dbgline::Destination;
///
/// dbgline::fdebuglf!(1, Destination::Stderr, "retrying after {}ms", 250);
/// ```
#[cfg(feature = "diagnostics")]
#[macro_export]
macro_rules! fdebuglf {
    ($level:expr, $destination:expr, $($arg:tt)+) => {{
        if $crate::enabled_for($level) {
            let _ = $crate::resolve($crate::IntoDestination::into_destination($destination))
                .write_line(&$crate::location!(), ::core::format_args!($($arg)+));
        }
    }};
}

/// Writes a formatted message at an explicit level to an explicit destination.
///
/// Compiled out: expands to `()` without evaluating its arguments.
#[cfg(not(feature = "diagnostics"))]
#[macro_export]
macro_rules! fdebuglf {
    ($($ignored:tt)*) => {
        ()
    };
}

#[cfg(test)]
mod tests {
    use crate::Destination;
    use crate::config::scoped_verbosity;
    use serial_test::serial;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    fn capture() -> (Arc<Mutex<Vec<u8>>>, Destination) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let destination = Destination::shared(Arc::clone(&buffer));
        (buffer, destination)
    }

    fn contents(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().expect("lock").clone()).expect("utf-8")
    }

    #[cfg_attr(not(feature = "diagnostics"), allow(dead_code))]
    fn bump(counter: &Cell<u32>) -> u32 {
        counter.set(counter.get() + 1);
        counter.get()
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    #[serial]
    fn literal_and_format_payloads_match() {
        let _verbosity = scoped_verbosity(1);
        let (buffer, destination) = capture();

        fdebug!(&destination, "X");
        fdebugf!(&destination, "{}", "X");
        fdebugf!(&destination, "X");

        let text = contents(&buffer);
        let tails: Vec<&str> = text
            .lines()
            .map(|line| line.splitn(3, ' ').nth(2).expect("function and message"))
            .collect();
        assert_eq!(tails.len(), 3);
        assert_eq!(tails[0], tails[1]);
        assert_eq!(tails[1], tails[2]);
        assert!(tails[0].ends_with(": X"));
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    #[serial]
    fn literal_braces_are_printed_verbatim() {
        let _verbosity = scoped_verbosity(1);
        let (buffer, destination) = capture();
        fdebug!(&destination, "{not a placeholder}");
        assert!(contents(&buffer).ends_with(": {not a placeholder}\n"));
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    #[serial]
    fn gated_out_statements_skip_argument_evaluation() {
        let _verbosity = scoped_verbosity(2);
        let (buffer, destination) = capture();
        let evaluated = Cell::new(0);

        fdebuglf!(5, { bump(&evaluated); &destination }, "{}", bump(&evaluated));
        assert_eq!(evaluated.get(), 0);
        assert!(contents(&buffer).is_empty());

        fdebuglf!(2, { bump(&evaluated); &destination }, "{}", bump(&evaluated));
        assert_eq!(evaluated.get(), 2);
        assert!(contents(&buffer).ends_with(": 2\n"));
    }

    #[cfg(feature = "diagnostics")]
    #[test]
    #[serial]
    fn level_expression_is_evaluated_once() {
        let _verbosity = scoped_verbosity(9);
        let (_buffer, destination) = capture();
        let evaluated = Cell::new(0);

        fdebugl!(bump(&evaluated), &destination, "once");
        assert_eq!(evaluated.get(), 1);
    }

    #[cfg(not(feature = "diagnostics"))]
    #[test]
    #[serial]
    fn compiled_out_statements_evaluate_nothing() {
        let _verbosity = scoped_verbosity(u32::MAX);
        let (buffer, destination) = capture();
        let evaluated = Cell::new(0);

        debug!(bump(&evaluated));
        debugl!(bump(&evaluated), "b");
        fdebug!({ bump(&evaluated); &destination }, "c");
        fdebugl!(1, &destination, bump(&evaluated));
        debugf!("{}", bump(&evaluated));
        debuglf!(1, "{}", bump(&evaluated));
        fdebugf!(&destination, "{}", bump(&evaluated));
        fdebuglf!(bump(&evaluated), &destination, "{}", 0);

        assert_eq!(evaluated.get(), 0);
        assert!(contents(&buffer).is_empty());
        drop(destination);
    }
}
