//! Event sourcing: the event log, its sinks and codecs, and replay.
//!
//! The engine emits a [`GameEvent`] for every state change. A log plus the
//! game's config is enough to rebuild the final state with [`replay`],
//! without touching a random source.

pub mod event;
pub mod clock;
pub mod recorder;
pub mod codec;
pub mod replay;

pub use event::{action_records, EventPayload, GameEvent};
pub use clock::{Clock, FixedClock, SystemClock};
pub use recorder::{InMemoryRecorder, JsonLinesRecorder, Recorder};
pub use codec::{decode_log, encode_log, from_json_lines, to_json_lines};
pub use replay::{replay, Replayer};
