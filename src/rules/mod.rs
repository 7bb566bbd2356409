//! The game engine.
//!
//! [`Engine`] is the only mutator of game state:
//! - Opens rounds with rolled or supplied dice
//! - Checks and applies actions
//! - Resolves challenges and applies match-play penalties
//!
//! Callers observe state through [`PlayerView`] copies and the event log.

pub mod engine;
pub mod view;

pub use engine::Engine;
pub use view::{ActionOutcome, PlayerView};
