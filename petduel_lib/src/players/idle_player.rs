use crate::players::{PlayerAction, PlayerAgent};
use crate::rules::CombatView;
use async_trait::async_trait;

pub struct IdlePlayer {}

#[async_trait]
impl PlayerAgent for IdlePlayer {
    async fn choose_action(&mut self, _view: &CombatView) -> PlayerAction {
        PlayerAction::EndTurn
    }
}
