#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `dbgline` provides leveled debug statements that prefix every line with
//! the file, line, and function they were written in, and that disappear
//! completely from builds that do not ask for them. A line looks like:
//!
//! ```text
//! src/index.rs 118 app::index::Index::load: loaded 12 entries
//! ```
//!
//! # Design
//!
//! The statements are the eight macros [`debug!`], [`debugl!`], [`fdebug!`],
//! [`fdebugl!`], [`debugf!`], [`debuglf!`], [`fdebugf!`], and [`fdebuglf!`].
//! They vary along three axes: implicit level `1` or an explicit level,
//! the default destination or an explicit one, and a literal message or a
//! format string. All of them reduce to the same sequence, also available
//! as the function [`emit`]:
//!
//! 1. the level gate ([`should_emit`]) against the process-wide threshold;
//! 2. destination resolution ([`resolve`]), falling back to the default;
//! 3. location capture ([`location!`]);
//! 4. rendering ([`render_line`]) followed by a flush.
//!
//! The macros are only compiled in with the `diagnostics` cargo feature.
//! Without it each one expands to `()` and none of its arguments is
//! evaluated, so expensive expressions passed for logging cost nothing. The
//! function-level API is always available.
//!
//! # Configuration
//!
//! - [`verbosity`] / [`set_verbosity`]: the threshold. A statement emits
//!   only when `0 < level <= threshold`. It starts at [`INITIAL_VERBOSITY`],
//!   which is `1` unless `DBGLINE_LEVEL` was set at build time.
//! - [`default_destination`] / [`set_default_destination`]: where statements
//!   without an explicit destination write. Starts as standard error.
//! - [`MAX_LENGTH_HINT`]: soft guidance for message length, never enforced.
//! - The `bare-function-names` feature reports `load` instead of
//!   `app::index::Index::load`.
//!
//! # Errors
//!
//! [`emit`] and [`render_line`] return the [`std::io::Error`] of the
//! underlying writer. The macros discard it: a failed debug line never
//! disturbs the program being debugged. Clearing the default destination and
//! then emitting through it panics.
//!
//! # Examples
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use dbgline::{Destination, Location, emit, scoped_verbosity};
//!
//! let buffer = Arc::new(Mutex::new(Vec::new()));
//! let destination = Destination::shared(Arc::clone(&buffer));
//! let _threshold = scoped_verbosity(3);
//!
//! emit(2, &destination, Location::new("main", 42, "run"), format_args!("count={}", 7))?;
//! assert_eq!(buffer.lock().unwrap().as_slice(), b"main 42 run: count=7\n");
//!
//! // Compiled in only with the `diagnostics` feature.
//! dbgline::fdebuglf!(2, &destination, "count={}", 7);
//! # Ok::<(), std::io::Error>(())
//! ```

mod config;
mod destination;
mod gate;
mod location;
mod macros;
mod render;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::{
    DestinationGuard, DiagnosticSettings, INITIAL_VERBOSITY, LEVEL_ENV, MAX_LENGTH_ENV,
    MAX_LENGTH_HINT, VerbosityGuard, VerbosityParseError, default_destination, init_from_env,
    parse_verbosity, replace_default_destination, scoped_default_destination, scoped_verbosity,
    set_default_destination, set_verbosity, settings, verbosity,
};
pub use destination::{Destination, IntoDestination, SharedWriter, resolve};
pub use gate::{IntoLevel, enabled_for, should_emit};
pub use location::Location;
pub use render::{emit, render_line};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{DiagnosticLayer, init_tracing, init_tracing_with_filter};

/// Items referenced by the exported macros. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::location::trim_function_name;
}
