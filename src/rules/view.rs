//! Player-scoped projections handed out by the engine.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Dice, Face, GameConfig, PlayerId, PlayerMap, PublicState, RoundOutcome, RoundStatus};

/// What one player may see.
///
/// An owned copy: nothing in it aliases engine state. Other players' dice
/// appear only in `revealed_dice`, which is `None` until a challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// The viewing player.
    pub player: PlayerId,

    pub public: PublicState,

    /// The viewer's own dice.
    pub my_dice: Dice,

    /// Everyone's dice, once revealed this round.
    pub revealed_dice: Option<PlayerMap<Dice>>,

    /// Legal actions for the viewer; empty when it is not their turn.
    pub legal_actions: Vec<Action>,

    pub config: GameConfig,
}

impl PlayerView {
    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.public.status == RoundStatus::Bidding && self.public.current_player == self.player
    }

    /// How many of the viewer's own dice support a bid on `face`.
    #[must_use]
    pub fn own_matches(&self, face: Face) -> u32 {
        crate::core::count_matches([self.my_dice.as_slice()], face, self.config.ones_wild())
    }
}

/// Result of an accepted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The raise stands; bidding continues.
    BidAccepted { next_player: PlayerId },
    /// The challenge was resolved.
    RoundEnded(RoundOutcome),
}

impl ActionOutcome {
    #[must_use]
    pub fn round_outcome(&self) -> Option<&RoundOutcome> {
        match self {
            ActionOutcome::RoundEnded(outcome) => Some(outcome),
            ActionOutcome::BidAccepted { .. } => None,
        }
    }
}
