use crate::players::{PlayerAction, PlayerAgent};
use crate::rules::{CombatView, EntityId};
use async_trait::async_trait;

/// Plays the leftmost affordable card until nothing is affordable.
#[derive(Default)]
pub struct GreedyPlayer {}

#[async_trait]
impl PlayerAgent for GreedyPlayer {
    async fn choose_action(&mut self, view: &CombatView) -> PlayerAction {
        match view.affordable_cards().next() {
            Some(card) => PlayerAction::PlayCard {
                hand_index: card.index,
                target: if card.targets_opponent {
                    EntityId::OpponentPet
                } else {
                    EntityId::LocalPlayer
                },
            },
            None => PlayerAction::EndTurn,
        }
    }
}
