//! Error taxonomy.
//!
//! | Error | Raised by | State after |
//! |---|---|---|
//! | [`ConfigError`] | config construction / parsing | no config exists |
//! | [`ValidationError`] | malformed bid or unknown seat | unchanged |
//! | [`IllegalMoveError`] | `apply_action` | unchanged |
//! | [`InvalidStateError`] | lifecycle calls in the wrong phase | unchanged |
//! | [`ReplayError`] | event log inconsistent with its config | replay aborted |
//! | [`CodecError`] | persisted log unreadable | nothing decoded |

use thiserror::Error;

use super::bid::{Bid, Face};
use super::player::PlayerId;
use super::state::RoundStatus;

/// Inconsistent configuration parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("need 2..=255 players (got {got})")]
    PlayerCount { got: usize },
    #[error("dice distribution has {distribution_len} entries but num_players is {num_players}")]
    DistributionLength {
        num_players: usize,
        distribution_len: usize,
    },
    #[error("dice distribution sums to {actual} but total_dice is {declared}")]
    DistributionMismatch { declared: u32, actual: u32 },
    #[error("{player} starts with no dice")]
    PlayerWithoutDice { player: PlayerId },
    #[error("face range {min}..={max} is empty")]
    EmptyFaceRange { min: Face, max: Face },
    #[error("face range must start at 1 or above (got {min})")]
    ZeroFace { min: Face },
    #[error("ones_wild requires face 1 in range (faces start at {min})")]
    WildFaceOutOfRange { min: Face },
    #[error("max_turns must be > 0")]
    ZeroMaxTurns,
    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A bid or request whose shape is invalid regardless of game position.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("bid quantity must be at least 1")]
    ZeroQuantity,
    #[error("bid quantity {quantity} exceeds the {total_dice} dice in play")]
    QuantityExceedsDice { quantity: u32, total_dice: u32 },
    #[error("face {face} outside {min}..={max}")]
    FaceOutOfRange { face: Face, min: Face, max: Face },
    #[error("unknown {player}")]
    UnknownPlayer { player: PlayerId },
    #[error("{player} holds {expected} dice but {got} were supplied")]
    WrongDiceCount {
        player: PlayerId,
        expected: u8,
        got: usize,
    },
}

/// A well-formed action that the rules do not allow right now.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("no round is accepting actions (status {status:?})")]
    NotBidding { status: RoundStatus },
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("turn limit of {max_turns} bids reached; only a challenge is allowed")]
    TurnLimitReached { max_turns: u32 },
    #[error("bid {candidate} is not higher than {previous}")]
    NotHigher { candidate: Bid, previous: Bid },
    #[error("there is no bid to challenge")]
    NothingToChallenge,
    #[error(transparent)]
    InvalidBid(#[from] ValidationError),
}

/// An operation invoked in a lifecycle state that forbids it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("round {round_index} is still in progress")]
    RoundInProgress { round_index: u32 },
    #[error("no round has ended yet")]
    RoundNotEnded,
    #[error("round {round_index} was already settled")]
    AlreadySettled { round_index: u32 },
    #[error("the match is over ({winner} won)")]
    MatchOver { winner: PlayerId },
}

/// An event log that cannot be reproduced under its config.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReplayError {
    #[error("event #{position}: recorded dice for {player} do not fit the game ({reason})")]
    DiceMismatch {
        position: usize,
        player: PlayerId,
        reason: String,
    },
    #[error("event #{position}: expected dice rolled for {expected}")]
    MissingRoll { position: usize, expected: PlayerId },
    #[error("event #{position}: replayed {expected} but log recorded {recorded}")]
    Divergence {
        position: usize,
        expected: String,
        recorded: String,
    },
    #[error("event #{position}: {source}")]
    RejectedAction {
        position: usize,
        #[source]
        source: IllegalMoveError,
    },
    #[error("event #{position}: {source}")]
    RejectedTransition {
        position: usize,
        #[source]
        source: InvalidStateError,
    },
    #[error("event #{position} belongs to game {found}, expected {expected}")]
    ForeignEvent {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("log ends mid-round after {position} events (dice for {missing} never rolled)")]
    Truncated { position: usize, missing: PlayerId },
}

/// Failure to encode or decode a persisted event log.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("binary log: {0}")]
    Binary(#[from] bincode::Error),
    #[error("writing log: {0}")]
    Io(#[from] std::io::Error),
}

/// Any error surfaced by the engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
