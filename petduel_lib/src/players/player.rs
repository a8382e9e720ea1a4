use crate::rules::{CombatView, EntityId, UiEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerAction {
    PlayCard { hand_index: usize, target: EntityId },
    EndTurn,
}

/// Decides what the local human does during the player turn.
#[async_trait]
pub trait PlayerAgent {
    async fn choose_action(&mut self, view: &CombatView) -> PlayerAction;

    fn notify_event(&mut self, _event: &UiEvent) {}
}
