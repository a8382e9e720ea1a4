mod actor_data;
pub mod calculator;
pub mod cards;
mod combo;
mod config;
mod context;
mod cost_modifiers;
mod discard_triggers;
mod entity;
mod events;
mod piles;
pub mod resolver;
mod status;
mod turn_flow;
mod upgrades;
mod view;

pub use {
    actor_data::ActorData, actor_data::EntitiesData, combo::ComboState, config::CombatConfig,
    config::ConfigError, config::EntityStats, context::CombatContext,
    cost_modifiers::CostLedger, cost_modifiers::CostModifier, discard_triggers::DiscardTriggers,
    entity::CombatEntity, entity::DamageTaken, entity::TurnStartReport, events::UiEvent,
    piles::CardPiles, status::CritBuff, status::OverTime, status::StatusKind,
    status::StatusLedger, turn_flow::OpponentStep, turn_flow::PlayRejected, turn_flow::TurnFlow,
    upgrades::TemporaryUpgrades, view::CombatView, view::HandCardView,
};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifies a peer in the match.
#[derive(Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Debug, Hash, Display, From)]
#[display(fmt = "peer#{}", _0)]
pub struct PeerId(pub u32);

#[derive(Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum EntityId {
    LocalPlayer,
    LocalPet,
    /// Shadow of the opponent's pet. Owned by the opponent peer.
    OpponentPet,
}

impl EntityId {
    /// Whether this peer is the authority for the entity's state.
    pub fn is_owned(self) -> bool {
        !matches!(self, EntityId::OpponentPet)
    }
}

/// A side that plays cards in the local simulation.
#[derive(Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Actor {
    Player,
    /// The opponent's pet, driven autonomously on this peer.
    Pet,
}

impl Actor {
    pub fn entity(self) -> EntityId {
        match self {
            Actor::Player => EntityId::LocalPlayer,
            Actor::Pet => EntityId::OpponentPet,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Actor::Player => Actor::Pet,
            Actor::Pet => Actor::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CombatOutcome {
    Victory,
    Defeat,
    /// Ended without a zero-health transition, e.g. by the turn limit.
    Aborted,
}

impl CombatOutcome {
    pub fn from_defeated(defeated: EntityId) -> Self {
        match defeated {
            EntityId::OpponentPet => CombatOutcome::Victory,
            EntityId::LocalPlayer | EntityId::LocalPet => CombatOutcome::Defeat,
        }
    }
}

#[derive(Serialize, Deserialize, Eq, PartialEq, Copy, Clone, Debug)]
pub enum CombatPhase {
    NotInCombat,
    PlayerTurn,
    OpponentTurn,
    CombatEnded(CombatOutcome),
}

impl CombatPhase {
    pub fn is_ended(&self) -> bool {
        matches!(self, CombatPhase::CombatEnded(_))
    }
}
