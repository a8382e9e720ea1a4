use crate::replication::OwnedRole;
use serde::{Deserialize, Serialize};

/// Per-entity replicated values. Published as `player_<name>` or `pet_<name>`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StatKey {
    Hp,
    MaxHp,
    Block,
    Energy,
    WeakTurns,
    BreakTurns,
    Thorns,
    Strength,
    DotTurns,
    DotDamage,
    HotTurns,
    HotAmount,
    CritChance,
}

impl StatKey {
    pub const ALL: [StatKey; 13] = [
        StatKey::Hp,
        StatKey::MaxHp,
        StatKey::Block,
        StatKey::Energy,
        StatKey::WeakTurns,
        StatKey::BreakTurns,
        StatKey::Thorns,
        StatKey::Strength,
        StatKey::DotTurns,
        StatKey::DotDamage,
        StatKey::HotTurns,
        StatKey::HotAmount,
        StatKey::CritChance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKey::Hp => "hp",
            StatKey::MaxHp => "max_hp",
            StatKey::Block => "block",
            StatKey::Energy => "energy",
            StatKey::WeakTurns => "weak_turns",
            StatKey::BreakTurns => "break_turns",
            StatKey::Thorns => "thorns",
            StatKey::Strength => "strength",
            StatKey::DotTurns => "dot_turns",
            StatKey::DotDamage => "dot_damage",
            StatKey::HotTurns => "hot_turns",
            StatKey::HotAmount => "hot_amount",
            StatKey::CritChance => "crit_chance",
        }
    }

    pub fn qualified(self, role: OwnedRole) -> String {
        format!("{}_{}", role.prefix(), self.name())
    }
}

/// Values shared with every peer for the cross-combat overview.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SharedKey {
    OpponentPetHp,
    CurrentTurn,
}

impl SharedKey {
    pub fn name(self) -> &'static str {
        match self {
            SharedKey::OpponentPetHp => "opponent_pet_hp",
            SharedKey::CurrentTurn => "current_turn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_carry_the_owner_prefix() {
        assert_eq!(StatKey::Hp.qualified(OwnedRole::Player), "player_hp");
        assert_eq!(StatKey::DotDamage.qualified(OwnedRole::Pet), "pet_dot_damage");
        assert_eq!(SharedKey::OpponentPetHp.name(), "opponent_pet_hp");
    }
}
