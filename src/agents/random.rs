//! Uniformly random play.

use crate::core::{Action, GameRng};
use crate::rules::PlayerView;

use super::agent::Agent;

/// Picks uniformly among the legal actions in its view.
///
/// Deterministic for a given seed and sequence of views.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
    label: String,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            label: "random".to_string(),
        }
    }

    /// Override the default `"random"` label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Agent for RandomAgent {
    fn choose_action(&mut self, view: &PlayerView) -> Action {
        match view.legal_actions.len() {
            // not our turn; the engine will say so
            0 => Action::CallLiar,
            n => view.legal_actions[self.rng.gen_index(n)],
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, PlayerId};
    use crate::rules::Engine;

    #[test]
    fn test_random_agent_plays_legal_actions() {
        let mut engine = Engine::new(GameConfig::default());
        engine.start_new_round().unwrap();
        let mut agent = RandomAgent::new(7);

        for _ in 0..20 {
            if engine.is_terminal() {
                break;
            }
            let player = engine.state().public().current_player;
            let view = engine.get_view(player).unwrap();
            let action = agent.choose_action(&view);
            assert!(view.legal_actions.contains(&action));
            engine.apply_action(player, action).unwrap();
        }
    }

    #[test]
    fn test_random_agent_deterministic() {
        let mut engine = Engine::new(GameConfig::default());
        engine.start_new_round().unwrap();
        let view = engine.get_view(PlayerId::new(0)).unwrap();

        let picks = |seed| {
            let mut agent = RandomAgent::new(seed);
            (0..5).map(|_| agent.choose_action(&view)).collect::<Vec<_>>()
        };
        assert_eq!(picks(3), picks(3));
        assert_eq!(RandomAgent::new(3).with_label("r2").label(), "r2");
    }
}
