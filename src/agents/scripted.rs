//! Fixed action lists, for tests and for re-driving recorded games.

use std::collections::VecDeque;

use crate::core::{Action, ActionRecord, PlayerId};
use crate::rules::PlayerView;

use super::agent::Agent;

/// Plays a predetermined sequence of actions, then challenges.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAgent {
    script: VecDeque<Action>,
    label: String,
}

impl ScriptedAgent {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Action>) -> Self {
        Self {
            script: script.into_iter().collect(),
            label: "scripted".to_string(),
        }
    }

    /// The actions `player` took in a recorded game.
    #[must_use]
    pub fn from_records<'a>(
        player: PlayerId,
        records: impl IntoIterator<Item = &'a ActionRecord>,
    ) -> Self {
        Self::new(
            records
                .into_iter()
                .filter(|r| r.player == player)
                .map(|r| r.action),
        )
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Actions not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Agent for ScriptedAgent {
    fn choose_action(&mut self, _view: &PlayerView) -> Action {
        self.script.pop_front().unwrap_or(Action::CallLiar)
    }

    fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::rules::Engine;

    #[test]
    fn test_scripted_agent_plays_in_order() {
        let engine = Engine::new(GameConfig::default());
        let view = engine.get_view(PlayerId::new(0)).unwrap();
        let mut agent = ScriptedAgent::new([Action::bid(1, 2), Action::bid(2, 2)]);

        assert_eq!(agent.choose_action(&view), Action::bid(1, 2));
        assert_eq!(agent.remaining(), 1);
        assert_eq!(agent.choose_action(&view), Action::bid(2, 2));
        assert_eq!(agent.choose_action(&view), Action::CallLiar);
    }

    #[test]
    fn test_from_records_filters_player() {
        let records = vec![
            ActionRecord::new(PlayerId::new(0), Action::bid(1, 2), 1, 0),
            ActionRecord::new(PlayerId::new(1), Action::bid(1, 3), 1, 1),
            ActionRecord::new(PlayerId::new(0), Action::CallLiar, 1, 2),
        ];
        let agent = ScriptedAgent::from_records(PlayerId::new(0), &records);

        assert_eq!(agent.remaining(), 2);
        assert_eq!(agent.label(), "scripted");
    }
}
