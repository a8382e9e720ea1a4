use crate::replication::StatKey;
use crate::rules::{CombatEntity, EntityId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OwnedRole {
    Player,
    Pet,
}

impl OwnedRole {
    pub fn prefix(self) -> &'static str {
        match self {
            OwnedRole::Player => "player",
            OwnedRole::Pet => "pet",
        }
    }

    /// The owned entity a role is published from.
    pub fn of(entity: EntityId) -> Option<Self> {
        match entity {
            EntityId::LocalPlayer => Some(OwnedRole::Player),
            EntityId::LocalPet => Some(OwnedRole::Pet),
            EntityId::OpponentPet => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct ReplicatedStats {
    pub health: i32,
    pub max_health: i32,
    pub block: i32,
    pub energy: i32,
    pub weak_turns: u32,
    pub break_turns: u32,
    pub thorns: i32,
    pub strength: i32,
    pub dot_turns: u32,
    pub dot_damage: i32,
    pub hot_turns: u32,
    pub hot_amount: i32,
    /// Effective crit chance, buffs included.
    pub crit_chance: f64,
}

impl From<&CombatEntity> for ReplicatedStats {
    fn from(entity: &CombatEntity) -> Self {
        let statuses = entity.statuses();
        Self {
            health: entity.current_health(),
            max_health: entity.max_health(),
            block: entity.block(),
            energy: entity.energy(),
            weak_turns: statuses.weak_turns,
            break_turns: statuses.break_turns,
            thorns: statuses.thorns,
            strength: statuses.strength,
            dot_turns: statuses.dot.turns,
            dot_damage: statuses.dot.amount,
            hot_turns: statuses.hot.turns,
            hot_amount: statuses.hot.amount,
            crit_chance: entity.crit_chance(),
        }
    }
}

impl ReplicatedStats {
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::Hp => self.health as f64,
            StatKey::MaxHp => self.max_health as f64,
            StatKey::Block => self.block as f64,
            StatKey::Energy => self.energy as f64,
            StatKey::WeakTurns => self.weak_turns as f64,
            StatKey::BreakTurns => self.break_turns as f64,
            StatKey::Thorns => self.thorns as f64,
            StatKey::Strength => self.strength as f64,
            StatKey::DotTurns => self.dot_turns as f64,
            StatKey::DotDamage => self.dot_damage as f64,
            StatKey::HotTurns => self.hot_turns as f64,
            StatKey::HotAmount => self.hot_amount as f64,
            StatKey::CritChance => self.crit_chance,
        }
    }
}

/// The published state of one owned entity.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct EntityRecord {
    pub role: OwnedRole,
    /// Counts up per role on the publishing peer.
    pub version: u64,
    pub stats: ReplicatedStats,
}

impl EntityRecord {
    /// The record flattened to the scalar key schema.
    pub fn named_values(&self) -> Vec<(String, f64)> {
        StatKey::ALL
            .iter()
            .map(|key| (key.qualified(self.role), self.stats.get(*key)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EntityStats, StatusKind};

    #[test]
    fn record_flattens_to_prefixed_keys() {
        let mut pet = CombatEntity::new(EntityId::LocalPet, EntityStats::new(30, 2));
        pet.apply_status_effect(StatusKind::Thorns, 3);
        pet.apply_dot(2, 4);

        let record = EntityRecord {
            role: OwnedRole::Pet,
            version: 7,
            stats: ReplicatedStats::from(&pet),
        };
        let values = record.named_values();

        assert_eq!(values.len(), StatKey::ALL.len());
        assert!(values.contains(&("pet_hp".to_string(), 30.0)));
        assert!(values.contains(&("pet_thorns".to_string(), 3.0)));
        assert!(values.contains(&("pet_dot_turns".to_string(), 4.0)));
    }
}
