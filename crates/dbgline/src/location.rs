//! crates/dbgline/src/location.rs
//! Call-site file, line, and function capture.

use std::fmt;

/// Suffix left on the type name of the marker item declared by
/// [`function_name!`](crate::function_name).
const MARKER_SUFFIX: &str = "::__dbgline_here";
const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// File, line, and enclosing function of a debug statement.
///
/// Computed fresh at every call site and discarded after the line is
/// written. [`Display`](fmt::Display) renders the prefix shared by every
/// emitted line: `<file> <line> <function>`.
///
/// # Examples
///
/// ```
/// use dbgline::Location;
///
/// let location = Location::new("main", 42, "run");
/// assert_eq!(location.to_string(), "main 42 run");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Location {
    file: &'static str,
    line: u32,
    function: &'static str,
}

impl Location {
    /// Creates a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Source file as reported by `file!()`.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// 1-based line of the statement.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Enclosing function, in the form selected at build time.
    #[must_use]
    pub const fn function(&self) -> &'static str {
        self.function
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.file, self.line, self.function)
    }
}

/// Turns the type name of a call-site marker into a function name.
///
/// Strips the marker segment and any trailing closure segments, then keeps
/// either the full path or only its last segment depending on the
/// `bare-function-names` feature.
#[doc(hidden)]
#[must_use]
pub fn trim_function_name(raw: &'static str) -> &'static str {
    let mut path = raw.strip_suffix(MARKER_SUFFIX).unwrap_or(raw);
    while let Some(outer) = path.strip_suffix(CLOSURE_SUFFIX) {
        path = outer;
    }
    select_form(path)
}

#[cfg(not(feature = "bare-function-names"))]
const fn select_form(path: &'static str) -> &'static str {
    path
}

#[cfg(feature = "bare-function-names")]
fn select_form(path: &'static str) -> &'static str {
    path.rsplit_once("::").map_or(path, |(_, last)| last)
}

/// Expands to the name of the enclosing function as a `&'static str`.
///
/// By default the name carries its full module path (and the type for
/// methods), e.g. `my_crate::parser::Parser::next`. With the
/// `bare-function-names` feature only the final identifier is kept. Inside
/// closures and async blocks the enclosing function is reported.
///
/// The text comes from [`core::any::type_name_of_val`], whose exact format
/// is not guaranteed by the compiler; it is meant for humans.
///
/// # Examples
///
/// ```
/// fn load_index() -> &'static str {
///     dbgline::function_name!()
/// }
///
/// assert!(load_index().ends_with("load_index"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __dbgline_here() {}
        $crate::__private::trim_function_name(::core::any::type_name_of_val(&__dbgline_here))
    }};
}

/// Expands to the [`Location`] of the invocation.
///
/// # Examples
///
/// ```
/// let location = dbgline::location!();
/// assert_eq!(location.file(), file!());
/// assert_eq!(location.line(), line!() - 2);
/// ```
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(::core::file!(), ::core::line!(), $crate::function_name!())
    };
}
