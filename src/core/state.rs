//! Game state: per-player private state and shared public state.
//!
//! ## PublicState
//!
//! Observable by every player:
//! - Round and turn counters, whose turn it is
//! - The standing bid and this round's bid history
//! - How many dice each player holds
//! - Round status and, once ended, winner and loser
//!
//! ## GameState
//!
//! The engine-owned composition of config, every [`PlayerState`] (including
//! private dice) and the [`PublicState`]. Outside the crate it is only ever
//! handed out by shared reference or as a copy.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::bid::{Bid, Dice, Face};
use super::config::GameConfig;
use super::player::{PlayerId, PlayerMap};

/// Where the current round is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    /// No round has been started yet.
    #[default]
    NotStarted,
    /// Players are raising bids.
    Bidding,
    /// A challenge is being resolved; all dice are visible.
    Reveal,
    /// The round is resolved.
    Ended,
}

impl RoundStatus {
    /// Whether all dice of the round are public.
    #[must_use]
    pub fn dice_revealed(self) -> bool {
        matches!(self, RoundStatus::Reveal | RoundStatus::Ended)
    }
}

/// One player's state. Private dice are known to the engine and the owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub(crate) player_id: PlayerId,
    pub(crate) num_dice: u8,
    pub(crate) private_dice: Dice,
    pub(crate) agent_label: Option<String>,
}

impl PlayerState {
    #[must_use]
    pub fn new(player_id: PlayerId, num_dice: u8) -> Self {
        Self {
            player_id,
            num_dice,
            private_dice: Dice::new(),
            agent_label: None,
        }
    }

    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Dice this player holds; shrinks in match play.
    #[must_use]
    pub fn num_dice(&self) -> u8 {
        self.num_dice
    }

    /// This round's dice, in roll order.
    #[must_use]
    pub fn private_dice(&self) -> &[Face] {
        &self.private_dice
    }

    /// Provenance tag, e.g. which policy drives this seat.
    #[must_use]
    pub fn agent_label(&self) -> Option<&str> {
        self.agent_label.as_deref()
    }

    /// Still holds dice (not eliminated).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.num_dice > 0
    }
}

/// Public game state - observable by all players.
///
/// `bid_history` is an `im::Vector`, so copying a `PublicState` into a view
/// is O(1).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    /// Current round (starts at 1; 0 before the first round).
    pub round_index: u32,

    /// Bids accepted this round so far.
    pub turn_index: u32,

    /// Whose turn it is. Meaningful while `status == Bidding`.
    pub current_player: PlayerId,

    /// Standing bid; `None` at round start.
    pub last_bid: Option<Bid>,

    /// Every bid accepted this round, strictly increasing.
    pub bid_history: Vector<Bid>,

    /// Dice held per player (public knowledge).
    pub dice_counts: PlayerMap<u8>,

    pub status: RoundStatus,

    /// Round winner, set once `Ended`.
    pub winner: Option<PlayerId>,

    /// Round loser, set once `Ended`.
    pub loser: Option<PlayerId>,
}

impl PublicState {
    /// Public state before the first round.
    #[must_use]
    pub fn new(dice_counts: PlayerMap<u8>) -> Self {
        Self {
            round_index: 0,
            turn_index: 0,
            current_player: PlayerId::new(0),
            last_bid: None,
            bid_history: Vector::new(),
            dice_counts,
            status: RoundStatus::NotStarted,
            winner: None,
            loser: None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.dice_counts.player_count()
    }

    /// Dice on the table across all players.
    #[must_use]
    pub fn total_dice(&self) -> u32 {
        self.dice_counts.values().map(|&d| u32::from(d)).sum()
    }

    /// The player who placed the standing bid.
    ///
    /// Turns alternate strictly, so it is the closest active seat before
    /// `current_player`.
    #[must_use]
    pub fn last_bidder(&self) -> Option<PlayerId> {
        self.last_bid?;
        let count = self.player_count();
        (1..count)
            .map(|back| PlayerId::new(((self.current_player.index() + count - back) % count) as u8))
            .find(|&p| self.dice_counts[p] > 0)
    }
}

/// Resolution of a challenged bid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// The challenged bid.
    pub bid: Bid,
    /// Who called liar.
    pub caller: PlayerId,
    /// Who placed the challenged bid.
    pub bidder: PlayerId,
    /// Dice on the table supporting the bid, wildcards included.
    pub match_count: u32,
    /// `match_count >= bid.quantity`.
    pub was_true: bool,
    pub winner: PlayerId,
    pub loser: PlayerId,
}

/// Complete game state including private information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) players: PlayerMap<PlayerState>,
    pub(crate) public: PublicState,
    pub(crate) round_settled: bool,
    pub(crate) match_winner: Option<PlayerId>,
}

impl GameState {
    /// State before the first round: starting dice, nothing rolled.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let distribution = config.dice_distribution().clone();
        let players = distribution.map(|p, &n| PlayerState::new(p, n));
        Self {
            config,
            players,
            public: PublicState::new(distribution),
            round_settled: false,
            match_winner: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    /// Checked lookup of one player.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.try_get(player)
    }

    #[must_use]
    pub fn public(&self) -> &PublicState {
        &self.public
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Dice currently in play across all players.
    #[must_use]
    pub fn total_dice_in_play(&self) -> u32 {
        self.public.total_dice()
    }

    /// Whether the ended round's dice penalty has been applied.
    #[must_use]
    pub fn is_round_settled(&self) -> bool {
        self.round_settled
    }

    /// Overall winner once only one player holds dice.
    #[must_use]
    pub fn match_winner(&self) -> Option<PlayerId> {
        self.match_winner
    }

    /// Players that still hold dice, in seat order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .filter(|(_, p)| p.is_active())
            .map(|(id, _)| id)
    }

    /// The first active seat after `player`, wrapping around.
    ///
    /// Returns `player` itself when nobody else is active.
    #[must_use]
    pub fn next_active_after(&self, player: PlayerId) -> PlayerId {
        let count = self.player_count();
        let mut seat = player;
        for _ in 0..count {
            seat = seat.next(count);
            if self.players[seat].is_active() {
                return seat;
            }
        }
        player
    }

    /// `player` if still active, otherwise the next active seat.
    #[must_use]
    pub fn active_or_next(&self, player: PlayerId) -> PlayerId {
        if self.players[player].is_active() {
            player
        } else {
            self.next_active_after(player)
        }
    }

    /// All players' dice, in seat order.
    #[must_use]
    pub fn all_dice(&self) -> PlayerMap<Dice> {
        self.players.map(|_, p| p.private_dice.clone())
    }
}
