//! The agent capability.

use crate::core::{Action, GameConfig, PlayerId};
use crate::events::GameEvent;
use crate::rules::PlayerView;

/// Chooses actions for one seat.
///
/// Only `choose_action` is required. The hooks are notifications; nothing
/// in the engine depends on them.
pub trait Agent {
    /// Pick an action for the position in `view`.
    ///
    /// Called only when it is this agent's turn. Returning an illegal action
    /// is allowed; the driver reports the rejection.
    fn choose_action(&mut self, view: &PlayerView) -> Action;

    /// Provenance tag recorded on this seat's events.
    fn label(&self) -> &str;

    /// A game is about to start with this agent in seat `player`.
    fn on_game_start(&mut self, _player: PlayerId, _config: &GameConfig) {}

    /// An event this agent is allowed to see.
    fn on_event(&mut self, _event: &GameEvent) {}

    /// The match is over.
    fn on_game_end(&mut self, _winner: PlayerId) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn choose_action(&mut self, view: &PlayerView) -> Action {
        (**self).choose_action(view)
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn on_game_start(&mut self, player: PlayerId, config: &GameConfig) {
        (**self).on_game_start(player, config);
    }

    fn on_event(&mut self, event: &GameEvent) {
        (**self).on_event(event);
    }

    fn on_game_end(&mut self, winner: PlayerId) {
        (**self).on_game_end(winner);
    }
}
