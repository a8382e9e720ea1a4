use crate::rules::calculator::Scaling;
use crate::rules::resolver::Resolution;
use crate::rules::StatusKind;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

/// The order in which the facets of one card resolve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetStage {
    Damage,
    Block,
    EnergyGain,
    Draw,
    RandomDiscard,
    Heal,
    Status,
    OverTime,
    Combo,
    CostModifier,
    TemporaryUpgrade,
    DiscardTrigger,
}

#[enum_dispatch]
pub trait Facet {
    fn stage(&self) -> FacetStage;
    fn apply(&self, resolution: &mut Resolution<'_>);
}

#[enum_dispatch(Facet)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum CardFacet {
    Damage(DamageFacet),
    Block(BlockFacet),
    EnergyGain(EnergyGainFacet),
    Draw(DrawFacet),
    RandomDiscard(RandomDiscardFacet),
    Heal(HealFacet),
    ApplyStatus(StatusFacet),
    CritBuff(CritBuffFacet),
    DamageOverTime(DamageOverTimeFacet),
    HealOverTime(HealOverTimeFacet),
    Combo(ComboFacet),
    CostModifier(CostModifierFacet),
    TemporaryUpgrade(TemporaryUpgradeFacet),
    DiscardTrigger(DiscardTriggerFacet),
}

/// Who receives a facet, relative to the play.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Recipient {
    #[default]
    Caster,
    Target,
}

/// Which hand a facet touches, relative to the acting side.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HandRole {
    #[default]
    Own,
    Opponent,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SelectionRule {
    #[default]
    Random,
    Cheapest,
    MostExpensive,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DamageFacet {
    pub base: i32,
    #[serde(default)]
    pub scaling: Scaling,
}

impl DamageFacet {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            scaling: Scaling::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BlockFacet {
    pub base: i32,
    #[serde(default)]
    pub scaling: Scaling,
    #[serde(default)]
    pub recipient: Recipient,
}

impl BlockFacet {
    pub fn new(base: i32) -> Self {
        Self {
            base,
            scaling: Scaling::default(),
            recipient: Recipient::Caster,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct EnergyGainFacet {
    pub amount: i32,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct DrawFacet {
    pub amount: u32,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct RandomDiscardFacet {
    pub amount: u32,
    #[serde(default)]
    pub hand: HandRole,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct HealFacet {
    pub amount: i32,
    #[serde(default)]
    pub recipient: Recipient,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct StatusFacet {
    pub kind: StatusKind,
    pub magnitude: i32,
    /// Defaults to the target for weak/break and to the caster for thorns/strength.
    #[serde(default)]
    pub recipient: Option<Recipient>,
}

impl StatusFacet {
    pub fn new(kind: StatusKind, magnitude: i32) -> Self {
        Self {
            kind,
            magnitude,
            recipient: None,
        }
    }

    pub fn resolved_recipient(&self) -> Recipient {
        self.recipient.unwrap_or(match self.kind {
            StatusKind::Weak | StatusKind::Break => Recipient::Target,
            StatusKind::Thorns | StatusKind::Strength => Recipient::Caster,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct CritBuffFacet {
    pub amount: f64,
    pub duration: u32,
    #[serde(default)]
    pub recipient: Recipient,
}

/// Always lands on the target.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct DamageOverTimeFacet {
    pub amount: i32,
    pub duration: u32,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct HealOverTimeFacet {
    pub amount: i32,
    pub duration: u32,
    #[serde(default)]
    pub recipient: Recipient,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum ComboBonus {
    Damage(i32),
    Block(i32),
    Heal(i32),
    Energy(i32),
    Draw(u32),
    Status { kind: StatusKind, magnitude: i32 },
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ComboTrigger {
    pub threshold: u32,
    pub bonus: ComboBonus,
    #[serde(default)]
    pub target: Recipient,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ComboFacet {
    #[serde(default)]
    pub starter: bool,
    #[serde(default)]
    pub trigger: Option<ComboTrigger>,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct CostModifierFacet {
    pub amount: i32,
    pub duration: u32,
    /// 0 means every card in the hand.
    #[serde(default)]
    pub card_count: u32,
    #[serde(default)]
    pub hand: HandRole,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct TemporaryUpgradeFacet {
    pub card_count: u32,
    pub duration: u32,
    #[serde(default)]
    pub rule: SelectionRule,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiscardTriggerKind {
    /// Hits the opponent of the hand that discarded the card.
    Damage,
    Block,
    Heal,
    Energy,
    Draw,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct DiscardTrigger {
    pub kind: DiscardTriggerKind,
    pub value: i32,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct DiscardTriggerFacet {
    pub trigger: DiscardTrigger,
}
