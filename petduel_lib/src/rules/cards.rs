mod facets;
pub mod starter;

pub use facets::*;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From,
)]
#[display(fmt = "card#{}", _0)]
pub struct CardId(pub u32);

/// Identifies one physical copy of a card for the whole combat.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From,
)]
#[display(fmt = "instance#{}", _0)]
pub struct InstanceId(pub u32);

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct CardInstance {
    pub instance_id: InstanceId,
    pub card_id: CardId,
}

/// Whom a damage facet hits when the card is played by the pet.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PetTarget {
    #[default]
    Opponent,
    SelfPet,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardDescriptor {
    pub id: CardId,
    pub name: String,
    pub cost: i32,
    #[serde(default)]
    pub primary_target_when_played_by_pet: PetTarget,
    #[serde(default)]
    pub upgraded: Option<CardId>,
    #[serde(default)]
    pub facets: Vec<CardFacet>,
}

impl CardDescriptor {
    pub fn new(id: u32, name: &str, cost: i32) -> Self {
        Self {
            id: CardId(id),
            name: name.to_string(),
            cost,
            primary_target_when_played_by_pet: PetTarget::Opponent,
            upgraded: None,
            facets: vec![],
        }
    }

    pub fn with(mut self, facet: impl Into<CardFacet>) -> Self {
        self.facets.push(facet.into());
        self
    }

    pub fn upgrades_to(mut self, upgraded: u32) -> Self {
        self.upgraded = Some(CardId(upgraded));
        self
    }

    pub fn when_played_by_pet(mut self, target: PetTarget) -> Self {
        self.primary_target_when_played_by_pet = target;
        self
    }

    /// Facets sorted by resolution stage. Facets of the same stage keep their authored order.
    pub fn facets_in_resolution_order(&self) -> Vec<&CardFacet> {
        let mut facets: Vec<&CardFacet> = self.facets.iter().collect();
        facets.sort_by_key(|facet| facet.stage());
        facets
    }

    /// Whether a human would aim this card at the opponent rather than at themselves.
    pub fn is_offensive(&self) -> bool {
        self.facets.iter().any(|facet| match facet {
            CardFacet::Damage(_) | CardFacet::DamageOverTime(_) => true,
            CardFacet::ApplyStatus(status) => status.resolved_recipient() == Recipient::Target,
            _ => false,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    cards: HashMap<CardId, CardDescriptor>,
}

impl CardLibrary {
    pub fn new(cards: impl IntoIterator<Item = CardDescriptor>) -> Self {
        Self {
            cards: cards.into_iter().map(|card| (card.id, card)).collect(),
        }
    }

    pub fn get(&self, id: CardId) -> Option<&CardDescriptor> {
        self.cards.get(&id)
    }

    pub fn insert(&mut self, card: CardDescriptor) {
        self.cards.insert(card.id, card);
    }

    pub fn upgraded_of(&self, id: CardId) -> Option<&CardDescriptor> {
        self.get(id)?.upgraded.and_then(|upgraded| self.get(upgraded))
    }

    pub fn base_cost(&self, id: CardId) -> Option<i32> {
        self.get(id).map(|card| card.cost)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
