//! Game event types.
//!
//! Events are the durable history of a game. The engine emits one event per
//! state change; replay consumes nothing else.
//!
//! ## Ordering
//!
//! Every event carries the `round_index` and `turn_index` at the moment it
//! was emitted plus a per-game `sequence` number, so a log is totally ordered
//! even when one call emits several events (a challenge emits
//! `LiarCalled`, `DiceRevealed` and `RoundEnded` at the same turn).

use serde::{Deserialize, Serialize};

use crate::core::{Action, ActionRecord, Bid, Dice, PlayerId, PlayerMap, RoundOutcome};

/// What happened. A closed set, so replay handles every case statically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// A round began with these dice counts.
    RoundStarted {
        starting_player: PlayerId,
        dice_counts: PlayerMap<u8>,
    },
    /// One player's private roll for the round.
    DiceRolled { player: PlayerId, dice: Dice },
    /// An accepted raise.
    BidPlaced { player: PlayerId, bid: Bid },
    /// A challenge against the standing bid.
    LiarCalled { caller: PlayerId, bid: Bid },
    /// All dice made public.
    DiceRevealed { dice: PlayerMap<Dice> },
    /// The challenge was resolved.
    RoundEnded { outcome: RoundOutcome },
    /// Match play: the round loser gave up a die.
    DiceLost { player: PlayerId, remaining: u8 },
    /// Match play: only one player still holds dice.
    MatchEnded { winner: PlayerId },
    /// A seat's agent label changed between rounds.
    PlayerLabeled {
        player: PlayerId,
        label: Option<String>,
    },
}

impl EventPayload {
    /// Stable snake_case name, for logs and diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::RoundStarted { .. } => "round_started",
            EventPayload::DiceRolled { .. } => "dice_rolled",
            EventPayload::BidPlaced { .. } => "bid_placed",
            EventPayload::LiarCalled { .. } => "liar_called",
            EventPayload::DiceRevealed { .. } => "dice_revealed",
            EventPayload::RoundEnded { .. } => "round_ended",
            EventPayload::DiceLost { .. } => "dice_lost",
            EventPayload::MatchEnded { .. } => "match_ended",
            EventPayload::PlayerLabeled { .. } => "player_labeled",
        }
    }

    /// The player this event is about, if it is about one.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        match self {
            EventPayload::DiceRolled { player, .. }
            | EventPayload::BidPlaced { player, .. }
            | EventPayload::DiceLost { player, .. }
            | EventPayload::PlayerLabeled { player, .. } => Some(*player),
            EventPayload::LiarCalled { caller, .. } => Some(*caller),
            EventPayload::MatchEnded { winner } => Some(*winner),
            EventPayload::RoundStarted { .. }
            | EventPayload::DiceRevealed { .. }
            | EventPayload::RoundEnded { .. } => None,
        }
    }
}

/// One immutable record in a game's event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// The game this event belongs to.
    pub game_id: String,

    /// Position in the game's log, starting at 0.
    pub sequence: u64,

    /// Round the event belongs to (starts at 1).
    pub round_index: u32,

    /// Bids accepted in the round before this event.
    pub turn_index: u32,

    /// Milliseconds since the Unix epoch, from the engine's clock.
    pub timestamp_ms: u64,

    pub payload: EventPayload,

    /// Provenance tag of the acting player's agent.
    pub player_type: Option<String>,
}

impl GameEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.payload.name()
    }

    /// Whether `player` may observe this event during play.
    ///
    /// Only other players' dice rolls are hidden; revealed dice travel in
    /// `DiceRevealed`.
    #[must_use]
    pub fn is_visible_to(&self, player: PlayerId) -> bool {
        match &self.payload {
            EventPayload::DiceRolled { player: owner, .. } => *owner == player,
            _ => true,
        }
    }

    /// The action behind a `BidPlaced` or `LiarCalled` event.
    #[must_use]
    pub fn as_action_record(&self) -> Option<ActionRecord> {
        let (player, action) = match &self.payload {
            EventPayload::BidPlaced { player, bid } => (*player, Action::PlaceBid(*bid)),
            EventPayload::LiarCalled { caller, .. } => (*caller, Action::CallLiar),
            _ => return None,
        };
        Some(ActionRecord::new(
            player,
            action,
            self.round_index,
            self.turn_index,
        ))
    }

    /// Equal in everything but the timestamp.
    #[must_use]
    pub fn same_record(&self, other: &GameEvent) -> bool {
        self.game_id == other.game_id
            && self.sequence == other.sequence
            && self.round_index == other.round_index
            && self.turn_index == other.turn_index
            && self.payload == other.payload
            && self.player_type == other.player_type
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} r{}t{} {}",
            self.sequence,
            self.round_index,
            self.turn_index,
            self.name()
        )
    }
}

/// Extract the accepted actions from a log, in order.
pub fn action_records<'a>(
    events: impl IntoIterator<Item = &'a GameEvent>,
) -> impl Iterator<Item = ActionRecord> {
    events.into_iter().filter_map(GameEvent::as_action_record)
}
