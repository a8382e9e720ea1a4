#![allow(dead_code)]

use petduel_lib::replication::Replicator;
use petduel_lib::rules::cards::{starter, CardDescriptor, CardId, CardLibrary};
use petduel_lib::rules::{CombatConfig, CombatContext, EntityStats, PeerId, TurnFlow};

pub const LOCAL: PeerId = PeerId(1);
pub const OPPONENT: PeerId = PeerId(2);

/// Costs more than anyone ever has, so a pet holding only these never plays.
pub const DORMANT: u32 = 700;

pub fn ids(cards: &[u32]) -> Vec<CardId> {
    cards.iter().copied().map(CardId).collect()
}

/// Zero crit chance everywhere, so every hit is deterministic.
pub fn config(player_deck: &[u32], pet_deck: &[u32]) -> CombatConfig {
    CombatConfig {
        player: EntityStats::new(30, 3),
        local_pet: EntityStats::new(20, 3),
        opponent_pet_fallback: EntityStats::new(40, 3),
        player_hand_size: 5,
        pet_hand_size: 3,
        player_deck: ids(player_deck),
        pet_deck: ids(pet_deck),
        seed: Some(7),
        turn_limit: 20,
    }
}

pub fn library() -> CardLibrary {
    let mut library = starter::library();
    library.insert(CardDescriptor::new(DORMANT, "Dormant", 9));
    library
}

pub fn flow(config: CombatConfig, library: CardLibrary) -> TurnFlow {
    let replicator = Replicator::new(LOCAL, Some(OPPONENT));
    TurnFlow::new(CombatContext::new(config, library, replicator))
}

pub fn started(config: CombatConfig, library: CardLibrary) -> TurnFlow {
    let mut flow = flow(config, library);
    flow.start_combat();
    flow
}

pub fn hand_index_of(flow: &TurnFlow, card: u32) -> usize {
    flow.view()
        .hand
        .iter()
        .find(|view| view.card_id == CardId(card))
        .map(|view| view.index)
        .expect("card should be in hand")
}
