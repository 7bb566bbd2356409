//! Multi-round match play.
//!
//! A thin loop over the single-round engine: play a round, settle it (the
//! loser drops a die), repeat until one player holds all remaining dice.

use tracing::info;

use crate::agents::Agent;
use crate::core::{Error, GameConfig, PlayerId, PlayerMap, RoundOutcome};
use crate::events::{InMemoryRecorder, Recorder};
use crate::rules::Engine;

use super::driver;

/// A match in progress.
#[derive(Debug)]
pub struct MatchPlay<R: Recorder = InMemoryRecorder> {
    engine: Engine<R>,
    rounds_played: u32,
    started: bool,
}

impl MatchPlay<InMemoryRecorder> {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::from_engine(Engine::new(config))
    }
}

impl<R: Recorder> MatchPlay<R> {
    /// Play a match on an existing, not yet started engine.
    #[must_use]
    pub fn from_engine(engine: Engine<R>) -> Self {
        Self {
            engine,
            rounds_played: 0,
            started: false,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine<R> {
        &self.engine
    }

    #[must_use]
    pub fn into_engine(self) -> Engine<R> {
        self.engine
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.engine.state().match_winner()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.engine.is_match_over()
    }

    /// Play and settle one round.
    ///
    /// Fails with `InvalidStateError::MatchOver` once the match is decided.
    pub fn play_round<A: Agent>(&mut self, agents: &mut PlayerMap<A>) -> Result<RoundOutcome, Error> {
        self.engine.can_start_round()?;
        if !self.started {
            for (player, agent) in agents.iter_mut() {
                agent.on_game_start(player, self.engine.config());
            }
            self.started = true;
        }

        let outcome = driver::play_round(&mut self.engine, agents)?;
        let winner = self.engine.settle_round()?;
        driver::dispatch_events(&mut self.engine, agents);
        self.rounds_played += 1;

        if let Some(winner) = winner {
            info!(
                game_id = self.engine.game_id(),
                %winner,
                rounds = self.rounds_played,
                "match decided"
            );
            for (_, agent) in agents.iter_mut() {
                agent.on_game_end(winner);
            }
        }
        Ok(outcome)
    }

    /// Play rounds until someone wins; returns the winner.
    pub fn play_to_completion<A: Agent>(
        &mut self,
        agents: &mut PlayerMap<A>,
    ) -> Result<PlayerId, Error> {
        loop {
            if let Some(winner) = self.winner() {
                return Ok(winner);
            }
            self.play_round(agents)?;
        }
    }
}
