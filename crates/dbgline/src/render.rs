//! crates/dbgline/src/render.rs
//! Line rendering and the canonical emission path.

use std::fmt;
use std::io::{self, Write};

use crate::destination::{IntoDestination, resolve};
use crate::gate::{IntoLevel, enabled_for};
use crate::location::Location;

/// Writes `<file> <line> <function>: <message>\n` to `writer`, then flushes.
///
/// The message is written as given: no wrapping, truncation, or padding.
/// Flushing after every line keeps output visible even if the process dies
/// right after the statement.
///
/// # Examples
///
/// ```
/// use dbgline::{Location, render_line};
///
/// let mut out = Vec::new();
/// render_line(&mut out, &Location::new("main", 42, "run"), format_args!("count={}", 7))?;
/// assert_eq!(out, b"main 42 run: count=7\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_line<W>(writer: &mut W, location: &Location, message: fmt::Arguments<'_>) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writeln!(writer, "{location}: {message}")?;
    writer.flush()
}

/// Emits one debug line if `level` passes the current threshold.
///
/// This is the single path every debug macro reduces to. The gate runs
/// first; only then is the destination resolved (falling back to the
/// process default when `destination` is absent) and the line rendered.
/// Write and flush failures are returned unchanged and never retried.
///
/// # Panics
///
/// Panics when the line passes the gate, `destination` is absent, and no
/// default destination is configured.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use dbgline::{Destination, Location, emit, scoped_verbosity};
///
/// let buffer = Arc::new(Mutex::new(Vec::new()));
/// let destination = Destination::shared(Arc::clone(&buffer));
/// let _verbosity = scoped_verbosity(2);
///
/// emit(5, &destination, Location::new("main", 9, "run"), format_args!("hidden"))?;
/// emit(2, &destination, Location::new("main", 10, "run"), format_args!("shown"))?;
/// assert_eq!(buffer.lock().unwrap().as_slice(), b"main 10 run: shown\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[track_caller]
pub fn emit<L, D>(
    level: L,
    destination: D,
    location: Location,
    message: fmt::Arguments<'_>,
) -> io::Result<()>
where
    L: IntoLevel,
    D: IntoDestination,
{
    if !enabled_for(level) {
        return Ok(());
    }
    resolve(destination.into_destination()).write_line(&location, message)
}
