//! crates/dbgline/src/destination.rs
//! Writable targets for debug lines and the fallback to the process default.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config;
use crate::location::Location;
use crate::render::render_line;

/// Shared handle to an arbitrary writer used as a [`Destination`].
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// A stream that debug lines are written to.
///
/// Destinations are cheap handles: cloning one never duplicates the
/// underlying stream, and the facility never opens or closes streams on its
/// own. Standard streams are referenced by variant; any other writer is
/// shared behind a mutex so that one line is written and flushed without
/// interleaving.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use dbgline::{Destination, Location};
///
/// let buffer = Arc::new(Mutex::new(Vec::new()));
/// let destination = Destination::shared(Arc::clone(&buffer));
///
/// destination.write_line(&Location::new("main", 42, "run"), format_args!("hello"))?;
/// assert_eq!(buffer.lock().unwrap().as_slice(), b"main 42 run: hello\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone)]
pub enum Destination {
    /// The process's standard error stream.
    Stderr,
    /// The process's standard output stream.
    Stdout,
    /// Any other writer, shared between clones of the handle.
    Writer(SharedWriter),
}

impl Destination {
    /// Wraps an owned writer so it can serve as a destination.
    pub fn writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::Writer(Arc::new(Mutex::new(writer)))
    }

    /// Uses a writer the caller keeps a handle to, for example to inspect
    /// what was written.
    pub fn shared<W>(writer: Arc<Mutex<W>>) -> Self
    where
        W: Write + Send + 'static,
    {
        Self::Writer(writer)
    }

    /// Reports whether both handles refer to the same stream.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Stderr, Self::Stderr) | (Self::Stdout, Self::Stdout) => true,
            (Self::Writer(left), Self::Writer(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }

    /// Writes one `<file> <line> <function>: <message>` line and flushes.
    ///
    /// The line is formatted before the stream is locked, so a payload whose
    /// `Display` impl emits to the same destination cannot deadlock. The lock
    /// is then held for one write and one flush. A poisoned writer lock is
    /// recovered rather than reported.
    pub fn write_line(&self, location: &Location, message: fmt::Arguments<'_>) -> io::Result<()> {
        let mut line = Vec::new();
        render_line(&mut line, location, message)?;

        match self {
            Self::Stderr => write_and_flush(&mut io::stderr().lock(), &line),
            Self::Stdout => write_and_flush(&mut io::stdout().lock(), &line),
            Self::Writer(shared) => {
                let mut writer = shared.lock().unwrap_or_else(PoisonError::into_inner);
                write_and_flush(&mut *writer, &line)
            }
        }
    }
}

fn write_and_flush<W>(writer: &mut W, line: &[u8]) -> io::Result<()>
where
    W: Write + ?Sized,
{
    writer.write_all(line)?;
    writer.flush()
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stderr => f.write_str("Stderr"),
            Self::Stdout => f.write_str("Stdout"),
            Self::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

/// Conversion accepted wherever a call site names an explicit destination.
///
/// `None` stands for an absent destination and falls back to the process
/// default.
pub trait IntoDestination {
    /// Converts `self` into an optional destination.
    fn into_destination(self) -> Option<Destination>;
}

impl IntoDestination for Destination {
    fn into_destination(self) -> Option<Destination> {
        Some(self)
    }
}

impl IntoDestination for &Destination {
    fn into_destination(self) -> Option<Destination> {
        Some(self.clone())
    }
}

impl IntoDestination for Option<Destination> {
    fn into_destination(self) -> Self {
        self
    }
}

/// Picks the stream a line goes to.
///
/// Returns `explicit` when present, otherwise the process default.
///
/// # Panics
///
/// Panics when `explicit` is `None` and the default destination has been
/// cleared with [`set_default_destination(None)`](crate::set_default_destination).
/// A missing default is a setup error that must not go unnoticed.
#[track_caller]
pub fn resolve(explicit: Option<Destination>) -> Destination {
    match explicit {
        Some(destination) => destination,
        None => config::default_destination().unwrap_or_else(|| {
            panic!("dbgline: no default destination is configured; install one before emitting")
        }),
    }
}
