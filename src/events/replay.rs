//! Rebuild a game from its event log.
//!
//! Replay drives a fresh [`Engine`] through the recorded history: recorded
//! dice open each round and recorded actions are re-applied. Every event the
//! replay engine emits must equal the next recorded event (timestamps
//! aside), so a log that diverges from its config is rejected at the first
//! event that disagrees rather than producing a different state.

use std::collections::VecDeque;

use crate::core::{Action, Dice, Error, GameConfig, GameState, PlayerId, PlayerMap, ReplayError};
use crate::rules::Engine;

use super::clock::FixedClock;
use super::event::{EventPayload, GameEvent};
use super::recorder::InMemoryRecorder;

/// A round whose start has been read but whose dice are still arriving.
#[derive(Debug)]
struct PendingRound {
    position: usize,
    started: GameEvent,
    awaiting: Vec<PlayerId>,
    rolls: Vec<GameEvent>,
}

impl PendingRound {
    fn next_roller(&self) -> Option<PlayerId> {
        self.awaiting.get(self.rolls.len()).copied()
    }
}

/// Incremental replay of one game's log.
#[derive(Debug)]
pub struct Replayer {
    engine: Engine,
    game_id: Option<String>,
    position: usize,
    expected: VecDeque<GameEvent>,
    pending_round: Option<PendingRound>,
    failed: Option<ReplayError>,
}

impl Replayer {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            engine: Engine::for_replay(config, InMemoryRecorder::new())
                .with_clock(FixedClock(0)),
            game_id: None,
            position: 0,
            expected: VecDeque::new(),
            pending_round: None,
            failed: None,
        }
    }

    /// State rebuilt from the events applied so far.
    #[must_use]
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    /// Events consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume the next recorded event.
    ///
    /// After the first error the replayer is spent: every later call, and
    /// [`Replayer::finish`], returns that same error.
    pub fn apply(&mut self, event: &GameEvent) -> Result<(), ReplayError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        let result = self.apply_event(event);
        if let Err(err) = &result {
            self.failed = Some(err.clone());
        }
        result
    }

    fn apply_event(&mut self, event: &GameEvent) -> Result<(), ReplayError> {
        let position = self.position;
        match &self.game_id {
            None => {
                self.game_id = Some(event.game_id.clone());
                self.engine.set_game_id(event.game_id.clone());
            }
            Some(id) if *id != event.game_id => {
                return Err(ReplayError::ForeignEvent {
                    position,
                    expected: id.clone(),
                    found: event.game_id.clone(),
                });
            }
            Some(_) => {}
        }
        self.position += 1;

        if let Some(expected) = self.expected.pop_front() {
            return check_same(position, &expected, event);
        }
        if self.pending_round.is_some() {
            return self.collect_roll(position, event);
        }

        match &event.payload {
            EventPayload::RoundStarted { .. } => {
                self.engine
                    .can_start_round()
                    .map_err(|source| ReplayError::RejectedTransition { position, source })?;
                self.pending_round = Some(PendingRound {
                    position,
                    started: event.clone(),
                    awaiting: self.engine.state().active_players().collect(),
                    rolls: Vec::new(),
                });
                Ok(())
            }
            EventPayload::BidPlaced { player, bid } => {
                self.replay_action(position, event, *player, Action::PlaceBid(*bid))
            }
            EventPayload::LiarCalled { caller, .. } => {
                self.replay_action(position, event, *caller, Action::CallLiar)
            }
            EventPayload::PlayerLabeled { player, label } => {
                self.engine
                    .set_agent_label(*player, label.clone())
                    .map_err(|err| match err {
                        Error::InvalidState(source) => {
                            ReplayError::RejectedTransition { position, source }
                        }
                        other => ReplayError::Divergence {
                            position,
                            expected: "a label for a seated player".to_string(),
                            recorded: other.to_string(),
                        },
                    })?;
                self.match_emitted(position, std::slice::from_ref(event))
            }
            EventPayload::DiceLost { .. } => {
                self.engine
                    .settle_round()
                    .map_err(|source| ReplayError::RejectedTransition { position, source })?;
                self.match_emitted(position, std::slice::from_ref(event))
            }
            EventPayload::DiceRolled { .. }
            | EventPayload::DiceRevealed { .. }
            | EventPayload::RoundEnded { .. }
            | EventPayload::MatchEnded { .. } => Err(ReplayError::Divergence {
                position,
                expected: "a round start, action or settlement".to_string(),
                recorded: describe(event),
            }),
        }
    }

    /// End of log: hand back the rebuilt state.
    pub fn finish(self) -> Result<GameState, ReplayError> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        if let Some(missing) = self.pending_round.as_ref().and_then(PendingRound::next_roller) {
            return Err(ReplayError::Truncated {
                position: self.position,
                missing,
            });
        }
        if let Some(expected) = self.expected.front() {
            return Err(ReplayError::Divergence {
                position: self.position,
                expected: describe(expected),
                recorded: "end of log".to_string(),
            });
        }
        Ok(self.engine.into_state())
    }

    fn collect_roll(&mut self, position: usize, event: &GameEvent) -> Result<(), ReplayError> {
        let Some(round) = self.pending_round.as_mut() else {
            return Ok(());
        };
        let Some(expected) = round.next_roller() else {
            return Ok(());
        };
        match &event.payload {
            EventPayload::DiceRolled { player, dice } if *player == expected => {
                self.engine
                    .check_dice(*player, dice)
                    .map_err(|err| ReplayError::DiceMismatch {
                        position,
                        player: *player,
                        reason: err.to_string(),
                    })?;
                round.rolls.push(event.clone());
            }
            _ => return Err(ReplayError::MissingRoll { position, expected }),
        }

        if round.next_roller().is_none() {
            if let Some(round) = self.pending_round.take() {
                self.start_round(round)?;
            }
        }
        Ok(())
    }

    fn start_round(&mut self, round: PendingRound) -> Result<(), ReplayError> {
        let position = round.position;
        let mut dice: PlayerMap<Dice> = PlayerMap::with_default(self.engine.state().player_count());

        for roll in &round.rolls {
            if let EventPayload::DiceRolled { player, dice: hand } = &roll.payload {
                dice[*player] = hand.clone();
            }
        }

        self.engine
            .begin_round_with_dice(dice)
            .map_err(|err| match err {
                Error::InvalidState(source) => ReplayError::RejectedTransition { position, source },
                other => ReplayError::Divergence {
                    position,
                    expected: "a playable round".to_string(),
                    recorded: other.to_string(),
                },
            })?;

        let mut recorded = Vec::with_capacity(round.rolls.len() + 1);
        recorded.push(round.started);
        recorded.extend(round.rolls);
        self.match_emitted(position, &recorded)
    }

    fn replay_action(
        &mut self,
        position: usize,
        event: &GameEvent,
        player: PlayerId,
        action: Action,
    ) -> Result<(), ReplayError> {
        self.engine
            .apply_action(player, action)
            .map_err(|source| ReplayError::RejectedAction { position, source })?;
        self.match_emitted(position, std::slice::from_ref(event))
    }

    /// Compare what the engine just emitted against `recorded`, which starts
    /// at `position`. Emitted events beyond it must appear next in the log.
    fn match_emitted(&mut self, position: usize, recorded: &[GameEvent]) -> Result<(), ReplayError> {
        let mut emitted = self.engine.take_pending().into_iter();
        for (offset, record) in recorded.iter().enumerate() {
            match emitted.next() {
                Some(replayed) => check_same(position + offset, &replayed, record)?,
                None => {
                    return Err(ReplayError::Divergence {
                        position: position + offset,
                        expected: "no further event".to_string(),
                        recorded: describe(record),
                    })
                }
            }
        }
        self.expected.extend(emitted);
        Ok(())
    }
}

fn check_same(position: usize, replayed: &GameEvent, recorded: &GameEvent) -> Result<(), ReplayError> {
    if replayed.same_record(recorded) {
        Ok(())
    } else {
        Err(ReplayError::Divergence {
            position,
            expected: describe(replayed),
            recorded: describe(recorded),
        })
    }
}

fn describe(event: &GameEvent) -> String {
    format!("{event} {:?}", event.payload)
}

/// Rebuild the final state of the game that produced `events`.
pub fn replay<'a>(
    config: GameConfig,
    events: impl IntoIterator<Item = &'a GameEvent>,
) -> Result<GameState, ReplayError> {
    let mut replayer = Replayer::new(config);
    for event in events {
        replayer.apply(event)?;
    }
    replayer.finish()
}
