use super::*;
use crate::rules::calculator::{LowHealthBonus, Scaling};
use crate::rules::StatusKind;

pub const STRIKE: u32 = 1;
pub const STRIKE_PLUS: u32 = 2;
pub const GUARD: u32 = 3;
pub const GUARD_PLUS: u32 = 4;
pub const ENFEEBLE: u32 = 5;
pub const SHATTER: u32 = 6;
pub const VENOM_FANG: u32 = 7;
pub const MEND: u32 = 8;
pub const QUICK_JAB: u32 = 9;
pub const FLURRY_FINISHER: u32 = 10;
pub const BRAMBLE_HIDE: u32 = 11;
pub const WAR_CRY: u32 = 12;
pub const SCRAMBLE: u32 = 13;
pub const TAX: u32 = 14;
pub const SHARPEN: u32 = 15;
pub const DESPERATE_BITE: u32 = 16;
pub const RUMMAGE: u32 = 17;
pub const HUNTERS_FOCUS: u32 = 18;
pub const SNARL: u32 = 19;

pub fn cards() -> Vec<CardDescriptor> {
    vec![
        CardDescriptor::new(STRIKE, "Strike", 1)
            .with(DamageFacet::new(6))
            .upgrades_to(STRIKE_PLUS),
        CardDescriptor::new(STRIKE_PLUS, "Strike+", 1).with(DamageFacet::new(9)),
        CardDescriptor::new(GUARD, "Guard", 1)
            .with(BlockFacet::new(5))
            .upgrades_to(GUARD_PLUS),
        CardDescriptor::new(GUARD_PLUS, "Guard+", 1).with(BlockFacet::new(8)),
        CardDescriptor::new(ENFEEBLE, "Enfeeble", 1)
            .with(DamageFacet::new(3))
            .with(StatusFacet::new(StatusKind::Weak, 2)),
        CardDescriptor::new(SHATTER, "Shatter", 2)
            .with(DamageFacet::new(4))
            .with(StatusFacet::new(StatusKind::Break, 2)),
        CardDescriptor::new(VENOM_FANG, "Venom Fang", 1)
            .with(DamageFacet::new(2))
            .with(DamageOverTimeFacet {
                amount: 2,
                duration: 3,
            }),
        CardDescriptor::new(MEND, "Mend", 1)
            .with(HealFacet {
                amount: 4,
                recipient: Recipient::Caster,
            })
            .with(HealOverTimeFacet {
                amount: 2,
                duration: 2,
                recipient: Recipient::Caster,
            })
            .when_played_by_pet(PetTarget::SelfPet),
        CardDescriptor::new(QUICK_JAB, "Quick Jab", 0)
            .with(DamageFacet::new(3))
            .with(ComboFacet {
                starter: true,
                trigger: None,
            }),
        CardDescriptor::new(FLURRY_FINISHER, "Flurry Finisher", 1)
            .with(DamageFacet::new(4))
            .with(ComboFacet {
                starter: true,
                trigger: Some(ComboTrigger {
                    threshold: 3,
                    bonus: ComboBonus::Damage(8),
                    target: Recipient::Target,
                }),
            }),
        CardDescriptor::new(BRAMBLE_HIDE, "Bramble Hide", 1)
            .with(BlockFacet::new(3))
            .with(StatusFacet::new(StatusKind::Thorns, 2)),
        CardDescriptor::new(WAR_CRY, "War Cry", 1)
            .with(StatusFacet::new(StatusKind::Strength, 2))
            .with(CritBuffFacet {
                amount: 15.0,
                duration: 2,
                recipient: Recipient::Caster,
            }),
        CardDescriptor::new(SCRAMBLE, "Scramble", 0)
            .with(DrawFacet { amount: 2 })
            .with(RandomDiscardFacet {
                amount: 1,
                hand: HandRole::Own,
            }),
        CardDescriptor::new(TAX, "Tax", 1)
            .with(DamageFacet::new(2))
            .with(CostModifierFacet {
                amount: 1,
                duration: 1,
                card_count: 2,
                hand: HandRole::Opponent,
            }),
        CardDescriptor::new(SHARPEN, "Sharpen", 1)
            .with(TemporaryUpgradeFacet {
                card_count: 2,
                duration: 1,
                rule: SelectionRule::Cheapest,
            })
            .with(EnergyGainFacet { amount: 1 }),
        CardDescriptor::new(DESPERATE_BITE, "Desperate Bite", 2).with(DamageFacet {
            base: 5,
            scaling: Scaling {
                per_turn: 0.5,
                per_play: 1.0,
                per_copy: 0.0,
                low_health: Some(LowHealthBonus {
                    threshold_percent: 50,
                    multiplier: 2.0,
                }),
            },
        }),
        CardDescriptor::new(RUMMAGE, "Rummage", 1)
            .with(BlockFacet::new(4))
            .with(DiscardTriggerFacet {
                trigger: DiscardTrigger {
                    kind: DiscardTriggerKind::Damage,
                    value: 5,
                },
            }),
        CardDescriptor::new(HUNTERS_FOCUS, "Hunter's Focus", 0)
            .with(CostModifierFacet {
                amount: -1,
                duration: 1,
                card_count: 0,
                hand: HandRole::Own,
            })
            .with(CritBuffFacet {
                amount: 10.0,
                duration: 1,
                recipient: Recipient::Caster,
            }),
        CardDescriptor::new(SNARL, "Snarl", 1)
            .with(StatusFacet::new(StatusKind::Weak, 1))
            .with(BlockFacet::new(3)),
    ]
}

pub fn library() -> CardLibrary {
    CardLibrary::new(cards())
}

pub fn player_deck() -> Vec<CardId> {
    [
        STRIKE, STRIKE, STRIKE, GUARD, GUARD, ENFEEBLE, SHATTER, VENOM_FANG, QUICK_JAB,
        QUICK_JAB, FLURRY_FINISHER, WAR_CRY, SCRAMBLE, TAX, SHARPEN, RUMMAGE, HUNTERS_FOCUS,
    ]
    .into_iter()
    .map(CardId)
    .collect()
}

pub fn pet_deck() -> Vec<CardId> {
    [
        STRIKE, STRIKE, GUARD, SNARL, MEND, BRAMBLE_HIDE, DESPERATE_BITE, VENOM_FANG,
    ]
    .into_iter()
    .map(CardId)
    .collect()
}
