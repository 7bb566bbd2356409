//! Player actions.
//!
//! Actions are the only externally supplied input to the engine: either
//! raise the bid or challenge it.

use serde::{Deserialize, Serialize};

use super::bid::Bid;
use super::player::PlayerId;

/// A player's choice on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Claim at least `bid.quantity` dice show `bid.face`.
    PlaceBid(Bid),
    /// Challenge the last bid, ending the round.
    CallLiar,
}

impl Action {
    /// Shorthand for `Action::PlaceBid(Bid::new(quantity, face))`.
    #[must_use]
    pub const fn bid(quantity: u32, face: u8) -> Self {
        Action::PlaceBid(Bid::new(quantity, face))
    }

    #[must_use]
    pub fn as_bid(&self) -> Option<&Bid> {
        match self {
            Action::PlaceBid(bid) => Some(bid),
            Action::CallLiar => None,
        }
    }

    #[must_use]
    pub fn is_call(&self) -> bool {
        matches!(self, Action::CallLiar)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PlaceBid(bid) => write!(f, "bid {bid}"),
            Action::CallLiar => f.write_str("liar!"),
        }
    }
}

/// An accepted action with its position in the game.
///
/// Used for:
/// - Extracting the action stream from an event log
/// - Scripted re-plays of a recorded game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who acted.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round the action belongs to (starts at 1).
    pub round_index: u32,

    /// Turn within the round when the action was taken (starts at 0).
    pub turn_index: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round_index: u32, turn_index: u32) -> Self {
        Self {
            player,
            action,
            round_index,
            turn_index,
        }
    }
}
