//! The single-round driving loop.

use tracing::debug;

use crate::agents::Agent;
use crate::core::{Error, PlayerMap, RoundOutcome, ValidationError};
use crate::events::Recorder;
use crate::rules::{ActionOutcome, Engine};

/// Start a round and play it to resolution.
///
/// Each seat's agent label is recorded before the round starts. The current
/// player's agent is asked for an action until a challenge ends the round.
/// An illegal action aborts the round with the engine's error, leaving the
/// round in progress; there are no retries.
pub fn play_round<R, A>(
    engine: &mut Engine<R>,
    agents: &mut PlayerMap<A>,
) -> Result<RoundOutcome, Error>
where
    R: Recorder,
    A: Agent,
{
    for (player, agent) in agents.iter() {
        engine.set_agent_label(player, Some(agent.label().to_owned()))?;
    }
    engine.start_new_round()?;
    dispatch_events(engine, agents);

    loop {
        let player = engine.state().public().current_player;
        let view = engine.get_view(player)?;
        let agent = agents
            .try_get_mut(player)
            .ok_or(ValidationError::UnknownPlayer { player })?;
        let action = agent.choose_action(&view);

        let outcome = engine.apply_action(player, action)?;
        dispatch_events(engine, agents);

        if let ActionOutcome::RoundEnded(outcome) = outcome {
            debug!(
                game_id = engine.game_id(),
                round = engine.state().public().round_index,
                turns = engine.state().public().turn_index,
                "round played"
            );
            return Ok(outcome);
        }
    }
}

/// Hand newly emitted events to every agent allowed to see them.
pub fn dispatch_events<R, A>(engine: &mut Engine<R>, agents: &mut PlayerMap<A>)
where
    R: Recorder,
    A: Agent,
{
    for event in engine.take_pending() {
        for (player, agent) in agents.iter_mut() {
            if event.is_visible_to(player) {
                agent.on_event(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{RandomAgent, ScriptedAgent};
    use crate::core::{Action, GameConfig, IllegalMoveError, PlayerId, RoundStatus};
    use crate::events::{EventPayload, GameEvent};
    use crate::rules::PlayerView;

    /// Records which events it was shown.
    #[derive(Default)]
    struct Watcher {
        seen: Vec<GameEvent>,
        inner: Option<ScriptedAgent>,
    }

    impl Agent for Watcher {
        fn choose_action(&mut self, view: &PlayerView) -> Action {
            match &mut self.inner {
                Some(inner) => inner.choose_action(view),
                None => Action::CallLiar,
            }
        }

        fn label(&self) -> &str {
            "watcher"
        }

        fn on_event(&mut self, event: &GameEvent) {
            self.seen.push(event.clone());
        }
    }

    #[test]
    fn test_play_round_with_random_agents() {
        let mut engine = Engine::new(GameConfig::default());
        let mut agents = PlayerMap::new(2, |p| RandomAgent::new(u64::from(p.0)));

        let outcome = play_round(&mut engine, &mut agents).unwrap();

        assert!(engine.is_terminal());
        assert_eq!(engine.state().public().loser, Some(outcome.loser));
        assert!(engine
            .events()
            .iter()
            .filter(|e| e.name() == "bid_placed")
            .all(|e| e.player_type.as_deref() == Some("random")));
    }

    #[test]
    fn test_opponent_rolls_withheld() {
        let mut engine = Engine::new(GameConfig::default());
        // player 0 opens, player 1 challenges
        let mut agents = PlayerMap::new(2, |p| Watcher {
            inner: Some(ScriptedAgent::new(if p.0 == 0 {
                vec![Action::bid(1, 2)]
            } else {
                vec![]
            })),
            ..Watcher::default()
        });

        play_round(&mut engine, &mut agents).unwrap();

        for (player, watcher) in agents.iter() {
            let rolls: Vec<PlayerId> = watcher
                .seen
                .iter()
                .filter_map(|e| match e.payload {
                    EventPayload::DiceRolled { player: owner, .. } => Some(owner),
                    _ => None,
                })
                .collect();
            assert_eq!(rolls, vec![player]);
            assert!(watcher.seen.iter().any(|e| e.name() == "dice_revealed"));
        }
        assert!(engine.take_pending().is_empty());
    }

    #[test]
    fn test_illegal_agent_action_aborts() {
        let mut engine = Engine::new(GameConfig::default());
        let mut agents = PlayerMap::new(2, |_| Watcher::default());

        let err = play_round(&mut engine, &mut agents).unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalMove(IllegalMoveError::NothingToChallenge)
        ));
        assert_eq!(engine.state().public().status, RoundStatus::Bidding);
    }
}
