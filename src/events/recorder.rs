//! Event sinks.
//!
//! The engine pushes every event it emits into a [`Recorder`]. The in-memory
//! recorder is the default; [`JsonLinesRecorder`] additionally streams the
//! log to a writer.

use std::io::Write;

use crate::core::CodecError;

use super::event::GameEvent;

/// Subscriber to an engine's event stream.
pub trait Recorder {
    /// Append one event. Events arrive in emission order.
    fn record(&mut self, event: GameEvent);

    /// Push buffered events to durable storage, if any.
    fn flush(&mut self) -> Result<(), CodecError>;

    /// Everything recorded so far, in order.
    fn events(&self) -> Vec<GameEvent>;

    /// Events from position `start` on.
    fn events_since(&self, start: usize) -> Vec<GameEvent> {
        self.events().into_iter().skip(start).collect()
    }

    fn len(&self) -> usize {
        self.events().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Recorder + ?Sized> Recorder for Box<R> {
    fn record(&mut self, event: GameEvent) {
        (**self).record(event);
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        (**self).flush()
    }

    fn events(&self) -> Vec<GameEvent> {
        (**self).events()
    }

    fn events_since(&self, start: usize) -> Vec<GameEvent> {
        (**self).events_since(start)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Keeps the log in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecorder {
    events: Vec<GameEvent>,
}

impl InMemoryRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the log without copying it.
    #[must_use]
    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}

impl Recorder for InMemoryRecorder {
    fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn flush(&mut self) -> Result<(), CodecError> {
        Ok(())
    }

    fn events(&self) -> Vec<GameEvent> {
        self.events.clone()
    }

    fn events_since(&self, start: usize) -> Vec<GameEvent> {
        self.events.get(start..).map_or_else(Vec::new, <[GameEvent]>::to_vec)
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}

/// Writes one JSON object per line on each `flush`.
#[derive(Debug)]
pub struct JsonLinesRecorder<W: Write> {
    writer: W,
    events: Vec<GameEvent>,
    written: usize,
}

impl<W: Write> JsonLinesRecorder<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            events: Vec::new(),
            written: 0,
        }
    }

    /// Events recorded but not yet written.
    #[must_use]
    pub fn unflushed(&self) -> usize {
        self.events.len() - self.written
    }

    /// Recover the writer. Unflushed events are not written.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Recorder for JsonLinesRecorder<W> {
    fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Write every unwritten event, one whole line at a time.
    ///
    /// `written` advances per completed line, so a retry after an I/O error
    /// resumes at the first event whose line was not written in full.
    fn flush(&mut self) -> Result<(), CodecError> {
        while let Some(event) = self.events.get(self.written) {
            let mut line = serde_json::to_vec(event).map_err(|source| CodecError::Json {
                line: self.written + 1,
                source,
            })?;
            line.push(b'\n');
            self.writer.write_all(&line)?;
            self.written += 1;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn events(&self) -> Vec<GameEvent> {
        self.events.clone()
    }

    fn events_since(&self, start: usize) -> Vec<GameEvent> {
        self.events.get(start..).map_or_else(Vec::new, <[GameEvent]>::to_vec)
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}
