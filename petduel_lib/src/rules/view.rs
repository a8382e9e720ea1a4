use crate::replication::ReplicatedStats;
use crate::rules::cards::{CardId, InstanceId};
use crate::rules::CombatPhase;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HandCardView {
    pub index: usize,
    pub instance: InstanceId,
    pub card_id: CardId,
    pub name: String,
    pub effective_cost: i32,
    pub affordable: bool,
    pub targets_opponent: bool,
}

/// What the local human can see of the combat.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombatView {
    pub turn: u32,
    pub phase: CombatPhase,
    pub player: ReplicatedStats,
    pub local_pet: ReplicatedStats,
    pub opponent_pet: ReplicatedStats,
    pub hand: Vec<HandCardView>,
    pub pet_hand_size: usize,
    pub deck_size: usize,
    pub discard_size: usize,
}

impl CombatView {
    pub fn affordable_cards(&self) -> impl Iterator<Item = &HandCardView> {
        self.hand.iter().filter(|card| card.affordable)
    }
}
