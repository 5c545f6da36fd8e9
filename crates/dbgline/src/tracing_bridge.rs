//! crates/dbgline/src/tracing_bridge.rs
//! Bridge from the tracing crate into dbgline's gate and line format.
//!
//! [`DiagnosticLayer`] is a tracing-subscriber layer that renders tracing
//! events as ordinary debug lines. The event level is mapped to a message
//! level, checked against the process-wide threshold, and written as
//! `<file> <line> <module>: <message>`. Tracing metadata carries no function
//! name, so the module path (or the target when no path is recorded) takes
//! the function column.
//!
//! # Usage
//!
//! ```rust,ignore
//! dbgline::set_verbosity(4);
//! dbgline::init_tracing();
//!
//! tracing::debug!(entries = 12, "index loaded");
//! ```

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::destination::{Destination, resolve};
use crate::gate::enabled_for;
use crate::location::Location;

const UNKNOWN_FILE: &str = "<unknown>";

/// A tracing layer that writes events through the dbgline gate.
///
/// Without an explicit destination the layer writes to the process default
/// at the time of each event.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticLayer {
    destination: Option<Destination>,
}

impl DiagnosticLayer {
    /// Creates a layer that writes to the default destination.
    #[must_use]
    pub const fn new() -> Self {
        Self { destination: None }
    }

    /// Creates a layer that always writes to `destination`.
    #[must_use]
    pub const fn with_destination(destination: Destination) -> Self {
        Self {
            destination: Some(destination),
        }
    }

    /// Maps a tracing level to a message level; more verbose levels map higher.
    const fn message_level(level: &Level) -> u32 {
        match *level {
            Level::ERROR => 1,
            Level::WARN => 2,
            Level::INFO => 3,
            Level::DEBUG => 4,
            Level::TRACE => 5,
        }
    }
}

impl<S> Layer<S> for DiagnosticLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !enabled_for(Self::message_level(metadata.level())) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let location = Location::new(
            metadata.file().unwrap_or(UNKNOWN_FILE),
            metadata.line().unwrap_or(0),
            metadata.module_path().unwrap_or_else(|| metadata.target()),
        );
        let _ = resolve(self.destination.clone())
            .write_line(&location, format_args!("{}", visitor.finish()));
    }
}

/// Collects the `message` field and appends the remaining fields as
/// `name=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match self.message {
            Some(mut message) => {
                message.push_str(&self.fields);
                message
            }
            None => self.fields.trim_start().to_owned(),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// Installs a global subscriber that renders tracing events as debug lines.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(DiagnosticLayer::new())
        .init();
}

/// Installs a global subscriber combining an extra filter layer with the
/// dbgline gate.
///
/// # Example
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// dbgline::init_tracing_with_filter(EnvFilter::from_default_env());
/// ```
pub fn init_tracing_with_filter<F>(filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(DiagnosticLayer::new())
        .init();
}
