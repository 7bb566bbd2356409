//! The round state machine.
//!
//! [`Engine`] owns the [`GameState`], the dice RNG and the event sink, and is
//! the only thing that mutates state. Every accepted transition appends
//! events to the recorder; every rejected one leaves state and log untouched.
//!
//! ```text
//! NotStarted ──start_new_round──▶ Bidding ──PlaceBid──▶ Bidding
//!                                    │
//!                                 CallLiar
//!                                    ▼
//!                          Reveal ──▶ Ended ──settle_round──▶ (next round | match over)
//! ```

use tracing::{debug, info, trace, warn};

use crate::core::{
    count_matches, legal_raises, Action, Bid, BidOrderPolicy, Dice, Error, Face, GameConfig,
    GameRng, GameState, IllegalMoveError, InvalidStateError, PlayerId, PlayerMap, PublicState,
    RoundOutcome, RoundStatus, ValidationError,
};
use crate::events::{Clock, EventPayload, GameEvent, InMemoryRecorder, Recorder, SystemClock};

use super::view::{ActionOutcome, PlayerView};

/// Seed of the never-consulted RNG inside a replay engine.
const REPLAY_SEED: u64 = 0;

/// An action that passed every legality check.
enum Accepted {
    Raise(Bid),
    Challenge(Bid),
}

/// Liar's Dice engine for one game.
#[derive(Debug)]
pub struct Engine<R: Recorder = InMemoryRecorder> {
    state: GameState,
    rng: GameRng,
    ordering: Box<dyn BidOrderPolicy>,
    recorder: R,
    clock: Box<dyn Clock>,
    game_id: String,
    sequence: u64,
    /// Recorder length at the last `take_pending`.
    delivered: usize,
}

impl Engine<InMemoryRecorder> {
    /// Engine recording into memory.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_recorder(config, InMemoryRecorder::new())
    }
}

impl<R: Recorder> Engine<R> {
    /// Engine recording into `recorder`.
    ///
    /// Without a configured seed, one is drawn from entropy and kept as
    /// [`Engine::effective_seed`].
    pub fn with_recorder(config: GameConfig, recorder: R) -> Self {
        let rng = config
            .rng_seed()
            .map_or_else(GameRng::from_entropy, GameRng::new);
        Self::assemble(config, recorder, rng)
    }

    /// Engine for rebuilding a recorded game. Dice always come from the
    /// log, so the RNG is fixed and entropy is never drawn.
    pub(crate) fn for_replay(config: GameConfig, recorder: R) -> Self {
        Self::assemble(config, recorder, GameRng::new(REPLAY_SEED))
    }

    fn assemble(config: GameConfig, recorder: R, rng: GameRng) -> Self {
        let game_id = match config.game_id() {
            Some(id) => id.to_owned(),
            None => format!("{:016x}", rng.for_context("game-id").next_u64()),
        };
        let ordering = config.bid_ordering().policy(config.faces());
        debug!(
            %game_id,
            seed = rng.seed(),
            players = config.num_players(),
            ordering = ordering.name(),
            "engine created"
        );

        Self {
            state: GameState::new(config),
            rng,
            ordering,
            recorder,
            clock: Box::new(SystemClock),
            game_id,
            sequence: 0,
            delivered: 0,
        }
    }

    /// Replace the timestamp source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the bid ordering chosen by the config.
    #[must_use]
    pub fn with_ordering_policy(mut self, policy: impl BidOrderPolicy + 'static) -> Self {
        self.ordering = Box::new(policy);
        self
    }

    /// Override the game id stamped on events.
    #[must_use]
    pub fn with_game_id(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = game_id.into();
        self
    }

    pub(crate) fn set_game_id(&mut self, game_id: String) {
        self.game_id = game_id;
    }

    // === Accessors ===

    /// Seed of the dice RNG, drawn from entropy if the config had none.
    #[must_use]
    pub fn effective_seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.state.config
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    #[must_use]
    pub fn ordering(&self) -> &dyn BidOrderPolicy {
        self.ordering.as_ref()
    }

    #[must_use]
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut R {
        &mut self.recorder
    }

    #[must_use]
    pub fn into_recorder(self) -> R {
        self.recorder
    }

    /// The full log recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.recorder.events()
    }

    /// Events recorded since the previous call.
    ///
    /// Read back from the recorder; the engine keeps no second copy.
    pub fn take_pending(&mut self) -> Vec<GameEvent> {
        let events = self.recorder.events_since(self.delivered);
        self.delivered = self.recorder.len();
        events
    }

    /// Tag a seat with the name of whatever drives it.
    ///
    /// Labels travel on that player's events as `player_type`, so they may
    /// only change between rounds. A change is logged as `PlayerLabeled`;
    /// setting the current label again records nothing.
    pub fn set_agent_label(&mut self, player: PlayerId, label: Option<String>) -> Result<(), Error> {
        if !self.state.players.contains(player) {
            return Err(ValidationError::UnknownPlayer { player }.into());
        }
        if self.round_in_progress() {
            return Err(InvalidStateError::RoundInProgress {
                round_index: self.state.public.round_index,
            }
            .into());
        }
        if self.state.players[player].agent_label == label {
            return Ok(());
        }
        debug!(game_id = %self.game_id, %player, label = ?label, "agent labelled");
        self.state.players[player].agent_label = label.clone();
        self.emit(EventPayload::PlayerLabeled { player, label });
        Ok(())
    }

    // === Round lifecycle ===

    /// Whether a new round may start now.
    pub fn can_start_round(&self) -> Result<(), InvalidStateError> {
        if let Some(winner) = self.state.match_winner {
            return Err(InvalidStateError::MatchOver { winner });
        }
        if self.round_in_progress() {
            return Err(InvalidStateError::RoundInProgress {
                round_index: self.state.public.round_index,
            });
        }
        Ok(())
    }

    /// Roll fresh dice for every player still holding dice and open bidding.
    ///
    /// Round 1 is opened by player 0; later rounds by the previous loser, or
    /// the next seat with dice if the loser is out.
    pub fn start_new_round(&mut self) -> Result<(), InvalidStateError> {
        self.can_start_round()?;

        let faces = self.state.config.faces();
        let mut rolls = Vec::with_capacity(self.state.player_count());
        for player in self.state.players.values() {
            rolls.push(self.rng.roll_dice(player.num_dice, faces));
        }
        self.begin_round(PlayerMap::from_vec(rolls));
        Ok(())
    }

    /// Open a round with the given dice instead of rolling.
    ///
    /// Each hand must match the player's current dice count (empty for
    /// eliminated players) and lie in the face range.
    pub fn begin_round_with_dice(&mut self, dice: PlayerMap<Dice>) -> Result<(), Error> {
        self.can_start_round()?;
        let seats = self.state.player_count();
        if dice.player_count() > seats {
            return Err(ValidationError::UnknownPlayer {
                player: PlayerId::new(seats as u8),
            }
            .into());
        }
        for player in self.state.players.player_ids() {
            let hand = dice.try_get(player).map_or(&[][..], |d| d.as_slice());
            self.check_dice(player, hand)?;
        }

        let dice = PlayerMap::new(seats, |p| dice.try_get(p).cloned().unwrap_or_default());
        self.begin_round(dice);
        Ok(())
    }

    /// Check one player's hand against their dice count and the face range.
    pub fn check_dice(&self, player: PlayerId, hand: &[Face]) -> Result<(), ValidationError> {
        let state = self
            .state
            .player(player)
            .ok_or(ValidationError::UnknownPlayer { player })?;
        if hand.len() != usize::from(state.num_dice) {
            return Err(ValidationError::WrongDiceCount {
                player,
                expected: state.num_dice,
                got: hand.len(),
            });
        }
        let faces = self.state.config.faces();
        if let Some(&face) = hand.iter().find(|&&f| !faces.contains(f)) {
            return Err(ValidationError::FaceOutOfRange {
                face,
                min: faces.min(),
                max: faces.max(),
            });
        }
        Ok(())
    }

    fn begin_round(&mut self, dice: PlayerMap<Dice>) {
        let round_index = self.state.public.round_index + 1;
        let opener = self.state.public.loser.unwrap_or(PlayerId::new(0));
        let starting_player = self.state.active_or_next(opener);

        for ((_, player), hand) in self.state.players.iter_mut().zip(dice.into_vec()) {
            player.private_dice = hand;
        }
        let dice_counts = self.state.players.map(|_, p| p.num_dice);
        self.state.public = PublicState {
            round_index,
            current_player: starting_player,
            status: RoundStatus::Bidding,
            ..PublicState::new(dice_counts.clone())
        };
        self.state.round_settled = false;

        info!(
            game_id = %self.game_id,
            round = round_index,
            %starting_player,
            total_dice = self.state.total_dice_in_play(),
            "round started"
        );
        self.emit(EventPayload::RoundStarted {
            starting_player,
            dice_counts,
        });

        let rolled: Vec<(PlayerId, Dice)> = self
            .state
            .active_players()
            .map(|p| (p, self.state.players[p].private_dice.clone()))
            .collect();
        for (player, dice) in rolled {
            trace!(game_id = %self.game_id, %player, ?dice, "dice rolled");
            self.emit(EventPayload::DiceRolled { player, dice });
        }
    }

    /// Apply the dice penalty of the ended round.
    ///
    /// The loser gives up one die. Returns the match winner once only one
    /// player still holds dice; after that no further round can start.
    pub fn settle_round(&mut self) -> Result<Option<PlayerId>, InvalidStateError> {
        let public = &self.state.public;
        match public.status {
            RoundStatus::NotStarted => return Err(InvalidStateError::RoundNotEnded),
            RoundStatus::Bidding | RoundStatus::Reveal => {
                return Err(InvalidStateError::RoundInProgress {
                    round_index: public.round_index,
                })
            }
            RoundStatus::Ended => {}
        }
        if self.state.round_settled {
            return Err(InvalidStateError::AlreadySettled {
                round_index: public.round_index,
            });
        }
        let Some(loser) = public.loser else {
            return Err(InvalidStateError::RoundNotEnded);
        };

        let player = &mut self.state.players[loser];
        player.num_dice = player.num_dice.saturating_sub(1);
        let remaining = player.num_dice;
        self.state.public.dice_counts[loser] = remaining;
        self.state.round_settled = true;

        debug!(game_id = %self.game_id, player = %loser, remaining, "die lost");
        self.emit(EventPayload::DiceLost {
            player: loser,
            remaining,
        });

        let survivors: Vec<PlayerId> = self.state.active_players().collect();
        if let [winner] = survivors[..] {
            self.state.match_winner = Some(winner);
            info!(
                game_id = %self.game_id,
                %winner,
                rounds = self.state.public.round_index,
                "match ended"
            );
            self.emit(EventPayload::MatchEnded { winner });
        }
        Ok(self.state.match_winner)
    }

    /// True once the current round has been resolved.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.public.status == RoundStatus::Ended
    }

    #[must_use]
    pub fn is_match_over(&self) -> bool {
        self.state.match_winner.is_some()
    }

    fn round_in_progress(&self) -> bool {
        matches!(
            self.state.public.status,
            RoundStatus::Bidding | RoundStatus::Reveal
        )
    }

    // === Views ===

    /// What `player` may see right now.
    pub fn get_view(&self, player: PlayerId) -> Result<PlayerView, ValidationError> {
        let me = self
            .state
            .player(player)
            .ok_or(ValidationError::UnknownPlayer { player })?;
        let public = &self.state.public;

        Ok(PlayerView {
            player,
            public: public.clone(),
            my_dice: me.private_dice.clone(),
            revealed_dice: public
                .status
                .dice_revealed()
                .then(|| self.state.all_dice()),
            legal_actions: self.legal_actions(player),
            config: self.state.config.clone(),
        })
    }

    /// Every action `player` may take now: raises lowest first, then
    /// `CallLiar` if there is a bid to challenge.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        let public = &self.state.public;
        if public.status != RoundStatus::Bidding || public.current_player != player {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if public.turn_index < self.state.config.max_turns() {
            actions.extend(
                legal_raises(
                    public.last_bid.as_ref(),
                    self.state.config.faces(),
                    public.total_dice(),
                    self.ordering.as_ref(),
                )
                .into_iter()
                .map(Action::PlaceBid),
            );
        }
        if public.last_bid.is_some() {
            actions.push(Action::CallLiar);
        }
        actions
    }

    // === Actions ===

    /// Apply `player`'s action.
    ///
    /// Legality is checked in full before anything changes; a rejected
    /// action leaves state and log as they were.
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: Action,
    ) -> Result<ActionOutcome, IllegalMoveError> {
        match self.check_action(player, action) {
            Ok(Accepted::Raise(bid)) => Ok(self.place_bid(player, bid)),
            Ok(Accepted::Challenge(bid)) => Ok(self.call_liar(player, bid)),
            Err(err) => {
                warn!(
                    game_id = %self.game_id,
                    %player,
                    %action,
                    error = %err,
                    "action rejected"
                );
                Err(err)
            }
        }
    }

    fn check_action(&self, player: PlayerId, action: Action) -> Result<Accepted, IllegalMoveError> {
        let public = &self.state.public;
        if public.status != RoundStatus::Bidding {
            return Err(IllegalMoveError::NotBidding {
                status: public.status,
            });
        }
        if player != public.current_player {
            return Err(IllegalMoveError::NotYourTurn {
                expected: public.current_player,
                actual: player,
            });
        }

        match action {
            Action::PlaceBid(bid) => {
                let max_turns = self.state.config.max_turns();
                if public.turn_index >= max_turns {
                    return Err(IllegalMoveError::TurnLimitReached { max_turns });
                }
                bid.validate(self.state.config.faces(), public.total_dice())?;
                if let Some(previous) = public.last_bid {
                    if !self.ordering.is_higher(&bid, &previous) {
                        return Err(IllegalMoveError::NotHigher {
                            candidate: bid,
                            previous,
                        });
                    }
                }
                Ok(Accepted::Raise(bid))
            }
            Action::CallLiar => public
                .last_bid
                .map(Accepted::Challenge)
                .ok_or(IllegalMoveError::NothingToChallenge),
        }
    }

    fn place_bid(&mut self, player: PlayerId, bid: Bid) -> ActionOutcome {
        self.emit(EventPayload::BidPlaced { player, bid });

        let next_player = self.state.next_active_after(player);
        let public = &mut self.state.public;
        public.last_bid = Some(bid);
        public.bid_history.push_back(bid);
        public.turn_index += 1;
        public.current_player = next_player;

        debug!(
            game_id = %self.game_id,
            %player,
            %bid,
            turn = public.turn_index,
            "bid placed"
        );
        ActionOutcome::BidAccepted { next_player }
    }

    fn call_liar(&mut self, caller: PlayerId, bid: Bid) -> ActionOutcome {
        let bidder = self.state.public.last_bidder().unwrap_or(caller);
        debug!(game_id = %self.game_id, %caller, %bidder, %bid, "liar called");
        self.emit(EventPayload::LiarCalled { caller, bid });

        self.state.public.status = RoundStatus::Reveal;
        let dice = self.state.all_dice();
        self.emit(EventPayload::DiceRevealed { dice });

        let match_count = count_matches(
            self.state.players.values().map(|p| p.private_dice.as_slice()),
            bid.face,
            self.state.config.ones_wild(),
        );
        let was_true = match_count >= bid.quantity;
        let (winner, loser) = if was_true {
            (bidder, caller)
        } else {
            (caller, bidder)
        };
        let outcome = RoundOutcome {
            bid,
            caller,
            bidder,
            match_count,
            was_true,
            winner,
            loser,
        };

        let public = &mut self.state.public;
        public.status = RoundStatus::Ended;
        public.winner = Some(winner);
        public.loser = Some(loser);

        info!(
            game_id = %self.game_id,
            round = public.round_index,
            %bid,
            match_count,
            was_true,
            %winner,
            %loser,
            "round ended"
        );
        self.emit(EventPayload::RoundEnded {
            outcome: outcome.clone(),
        });
        ActionOutcome::RoundEnded(outcome)
    }

    /// Stamp and record one event.
    fn emit(&mut self, payload: EventPayload) {
        let actor = match &payload {
            EventPayload::DiceRolled { player, .. } | EventPayload::BidPlaced { player, .. } => {
                Some(*player)
            }
            EventPayload::LiarCalled { caller, .. } => Some(*caller),
            _ => None,
        };
        let player_type = actor
            .and_then(|p| self.state.player(p))
            .and_then(|p| p.agent_label.clone());

        let event = GameEvent {
            game_id: self.game_id.clone(),
            sequence: self.sequence,
            round_index: self.state.public.round_index,
            turn_index: self.state.public.turn_index,
            timestamp_ms: self.clock.now_millis(),
            payload,
            player_type,
        };
        self.sequence += 1;
        self.recorder.record(event);
    }
}
