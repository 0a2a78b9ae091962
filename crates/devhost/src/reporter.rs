//! Fan-out of bundler events to the terminal and a late-bound sink.
//!
//! The bundler only ever sees one [`Reporter`]. The [`ReporterMultiplexer`]
//! behind it forwards each event to the terminal renderer and, once the
//! events socket exists, to that socket as well.
//!
//! # Data Flow
//!
//! ```text
//! bundler ──update(e)──▶ ReporterMultiplexer ──▶ terminal renderer (always)
//!                                           └──▶ events sink (after bind)
//! ```

use crate::error::{Error, Result};
use crate::event::ReporterEvent;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Receives bundler lifecycle events.
pub trait Reporter: Send + Sync {
    fn update(&self, event: &ReporterEvent);
}

/// Receives events forwarded by the multiplexer (events socket, telemetry).
pub trait EventSink: Send + Sync {
    fn report_event(&self, event: &ReporterEvent);
}

/// Reporter that forwards to a terminal renderer and an optional sink.
///
/// The sink slot is write-once: it starts empty, is bound once after the
/// server launches and is never unbound. Events emitted before binding reach
/// only the terminal and are not replayed.
pub struct ReporterMultiplexer {
    terminal: Arc<dyn Reporter>,
    sink: OnceCell<Arc<dyn EventSink>>,
}

impl ReporterMultiplexer {
    pub fn new(terminal: Arc<dyn Reporter>) -> Self {
        Self {
            terminal,
            sink: OnceCell::new(),
        }
    }

    /// Bind the sink that receives every subsequent event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SinkAlreadyBound`] if a sink was bound before; the
    /// original sink stays in place.
    pub fn bind_sink(&self, sink: Arc<dyn EventSink>) -> Result<()> {
        self.sink.set(sink).map_err(|_| Error::SinkAlreadyBound)
    }

    pub fn is_bound(&self) -> bool {
        self.sink.get().is_some()
    }
}

impl Reporter for ReporterMultiplexer {
    fn update(&self, event: &ReporterEvent) {
        self.terminal.update(event);
        if let Some(sink) = self.sink.get() {
            sink.report_event(event);
        }
    }
}

impl fmt::Debug for ReporterMultiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterMultiplexer")
            .field("sink_bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}
