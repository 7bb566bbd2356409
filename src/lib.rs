//! # liars-dice
//!
//! A headless, event-sourced Liar's Dice engine.
//!
//! ## Design Principles
//!
//! 1. **Engine as sole mutator**: `Engine::apply_action` checks legality in
//!    full before touching state. Callers only ever see copies
//!    (`PlayerView`) or shared references.
//!
//! 2. **N-Player First**: seats are `PlayerId`s into a `PlayerMap`; nothing
//!    assumes two players.
//!
//! 3. **Reproducible**: dice come from a per-engine ChaCha8 stream. The same
//!    config, seed and actions give the same dice, log and outcome.
//!
//! 4. **Event sourced**: every state change is a `GameEvent`. Replaying a log
//!    against its config rebuilds the exact final state, using the recorded
//!    dice instead of the RNG.
//!
//! ## Example
//!
//! ```
//! use liars_dice::{Action, Engine, GameConfig, PlayerId};
//!
//! let config = GameConfig::builder().dice_distribution(vec![2, 3]).build()?;
//! let mut engine = Engine::new(config);
//! engine.start_new_round()?;
//!
//! engine.apply_action(PlayerId::new(0), Action::bid(1, 4))?;
//! let outcome = engine.apply_action(PlayerId::new(1), Action::CallLiar)?;
//! assert!(engine.is_terminal());
//!
//! let rebuilt = liars_dice::replay(engine.config().clone(), &engine.events())?;
//! assert_eq!(&rebuilt, engine.state());
//! # let _ = outcome;
//! # Ok::<(), liars_dice::Error>(())
//! ```
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration, bids, actions, state, errors
//! - `rules`: the `Engine` state machine and player views
//! - `events`: event log, recorders, codecs, replay
//! - `agents`: the `Agent` capability and simple built-in agents
//! - `play`: driving loop and multi-round match play

pub mod core;
pub mod rules;
pub mod events;
pub mod agents;
pub mod play;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    GameRng, GameRngState,
    FaceRange, BidOrdering, GameConfig, GameConfigBuilder,
    Bid, BidOrderPolicy, Dice, Face, QuantityThenFace, LiarsDiceStandard,
    Action, ActionRecord,
    PlayerState, PublicState, GameState, RoundStatus, RoundOutcome,
    Error, ConfigError, ValidationError, IllegalMoveError, InvalidStateError, ReplayError, CodecError,
};

pub use crate::rules::{ActionOutcome, Engine, PlayerView};

pub use crate::events::{
    GameEvent, EventPayload,
    Clock, SystemClock, FixedClock,
    Recorder, InMemoryRecorder, JsonLinesRecorder,
    replay, Replayer,
};

pub use crate::agents::{Agent, AgentRegistry, RandomAgent, ScriptedAgent};

pub use crate::play::MatchPlay;
