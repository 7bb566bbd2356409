//! Core types: players, dice RNG, configuration, bids, actions, state, errors.
//!
//! Everything here is a value type; the only mutator of a [`GameState`] is
//! the engine in [`crate::rules`].

pub mod player;
pub mod rng;
pub mod config;
pub mod bid;
pub mod action;
pub mod state;
pub mod error;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{BidOrdering, FaceRange, GameConfig, GameConfigBuilder, WILD_FACE};
pub use bid::{
    count_matches, legal_raises, Bid, BidOrderPolicy, Dice, Face, LiarsDiceStandard,
    QuantityThenFace,
};
pub use action::{Action, ActionRecord};
pub use state::{GameState, PlayerState, PublicState, RoundOutcome, RoundStatus};
pub use error::{
    CodecError, ConfigError, Error, IllegalMoveError, InvalidStateError, ReplayError,
    ValidationError,
};
