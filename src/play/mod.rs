//! Driving games with agents.
//!
//! - [`driver::play_round`]: one round, view → agent → action until resolved
//! - [`MatchPlay`]: rounds until one player holds all remaining dice

pub mod driver;
pub mod match_play;

pub use driver::play_round;
pub use match_play::MatchPlay;
