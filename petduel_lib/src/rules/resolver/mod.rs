mod facet_impls;

use crate::rules::calculator::{
    calculate_damage, DamageInput, DamageResult, Scaling, ScalingInput,
};
use crate::rules::cards::{
    CardDescriptor, CardId, CardInstance, ComboBonus, DiscardTrigger, Facet, HandRole, InstanceId,
    PetTarget, Recipient,
};
use crate::rules::{Actor, CombatContext, DamageTaken, EntityId, StatusKind, UiEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One mutation a card play caused.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum AppliedEffect {
    Damage {
        target: EntityId,
        result: DamageResult,
        health_lost: i32,
    },
    Thorns {
        attacker: EntityId,
        amount: i32,
    },
    Block {
        recipient: EntityId,
        amount: i32,
    },
    EnergyGained {
        recipient: EntityId,
        amount: i32,
    },
    Drawn {
        hand: Actor,
        count: usize,
    },
    Discarded {
        hand: Actor,
        count: usize,
    },
    Healed {
        recipient: EntityId,
        amount: i32,
    },
    Status {
        recipient: EntityId,
        kind: StatusKind,
        magnitude: i32,
    },
    CritBuff {
        recipient: EntityId,
        amount: f64,
        duration: u32,
    },
    DamageOverTime {
        recipient: EntityId,
        amount: i32,
        duration: u32,
    },
    HealOverTime {
        recipient: EntityId,
        amount: i32,
        duration: u32,
    },
    ComboCounted {
        count: u32,
    },
    ComboFired {
        count: u32,
        bonus: ComboBonus,
    },
    CostModified {
        hand: Actor,
        amount: i32,
        duration: u32,
        cards: Option<Vec<InstanceId>>,
    },
    /// The affected hand lives on the opponent peer.
    CostModifierSent {
        amount: i32,
        duration: u32,
        count: u32,
    },
    Upgraded {
        instances: Vec<InstanceId>,
    },
    DiscardTriggerRegistered {
        instance: InstanceId,
        trigger: DiscardTrigger,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AppliedEffects {
    pub card: Option<CardId>,
    pub effects: Vec<AppliedEffect>,
}

impl AppliedEffects {
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppliedEffect> {
        self.effects.iter()
    }

    /// Health lost by `target` through damage facets of this play.
    pub fn health_lost_by(&self, target: EntityId) -> i32 {
        self.effects
            .iter()
            .map(|effect| match effect {
                AppliedEffect::Damage {
                    target: hit,
                    health_lost,
                    ..
                } if *hit == target => *health_lost,
                _ => 0,
            })
            .sum()
    }

    pub fn combo_fired(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, AppliedEffect::ComboFired { .. }))
    }
}

/// State of one card play while its facets resolve.
pub struct Resolution<'a> {
    pub(crate) ctx: &'a mut CombatContext,
    card: &'a CardDescriptor,
    instance: CardInstance,
    actor: Actor,
    caster: EntityId,
    target: EntityId,
    damage_target: EntityId,
    previous_plays: u32,
    applied: Vec<AppliedEffect>,
}

/// Resolves every facet of a played card instance in stage order.
///
/// For the pet, `primary_target_when_played_by_pet` picks whom damage facets hit. Every other
/// facet follows its own recipient. Stops early once an entity is defeated.
pub fn resolve(
    ctx: &mut CombatContext,
    instance: CardInstance,
    actor: Actor,
    target: EntityId,
) -> AppliedEffects {
    if let Some(defeated) = ctx.pending_defeat {
        warn!(?defeated, "ignoring a card resolution after a defeat");
        return AppliedEffects::default();
    }
    let Some(card) = ctx.library.get(instance.card_id).cloned() else {
        warn!(card = %instance.card_id, "card missing from the library, nothing resolved");
        return AppliedEffects::default();
    };

    let caster = actor.entity();
    let damage_target = match (actor, card.primary_target_when_played_by_pet) {
        (Actor::Pet, PetTarget::Opponent) => EntityId::LocalPlayer,
        (Actor::Pet, PetTarget::SelfPet) => EntityId::OpponentPet,
        (Actor::Player, _) => target,
    };
    let previous_plays = ctx.record_play(actor, card.id);
    debug!(?actor, card = %card.name, ?target, "resolving card");

    let mut resolution = Resolution {
        ctx: &mut *ctx,
        card: &card,
        instance,
        actor,
        caster,
        target,
        damage_target,
        previous_plays,
        applied: vec![],
    };
    for facet in card.facets_in_resolution_order() {
        if resolution.ctx.pending_defeat.is_some() {
            debug!("combat decided mid-resolution, skipping the remaining facets");
            break;
        }
        facet.apply(&mut resolution);
    }

    let applied = resolution.applied;
    ctx.push_ui(UiEvent::CardResolved {
        actor,
        card: card.id,
    });
    AppliedEffects {
        card: Some(card.id),
        effects: applied,
    }
}

impl<'a> Resolution<'a> {
    fn recipient(&self, recipient: Recipient) -> EntityId {
        match recipient {
            Recipient::Caster => self.caster,
            Recipient::Target => self.target,
        }
    }

    fn hand(&self, role: HandRole) -> Actor {
        match role {
            HandRole::Own => self.actor,
            HandRole::Opponent => self.actor.other(),
        }
    }

    fn scaling_input(&self, scaling: &Scaling) -> ScalingInput {
        let caster = self.ctx.entity(self.caster);
        ScalingInput {
            current_turn: self.ctx.turn,
            previous_plays: self.previous_plays,
            copies_owned: self.ctx.piles[self.actor].copies_of(self.card.id),
            below_health_threshold: scaling.low_health.map_or(false, |bonus| {
                bonus.is_below_threshold(caster.current_health(), caster.max_health())
            }),
            // Strength is added by the damage calculator.
            strength_bonus: 0,
        }
    }

    /// Runs the damage calculator against `target`, then lets thorns retaliate.
    fn deal_damage(&mut self, target: EntityId, raw_damage: i32) {
        let attacker = self.ctx.entity(self.caster);
        let defender = self.ctx.entity(target);
        let input = DamageInput {
            raw_damage,
            attacker_strength: attacker.statuses().strength,
            target_block: defender.block(),
            attacker_is_weak: attacker.statuses().is_weak(),
            target_is_broken: defender.statuses().is_broken(),
            attacker_crit_chance: attacker.crit_chance(),
        };
        let thorns = defender.statuses().thorns;

        let result = calculate_damage(&input, &mut self.ctx.rng);
        let taken: DamageTaken = self
            .ctx
            .mutate_entity(target, |entity| entity.apply_damage_result(&result));
        self.applied.push(AppliedEffect::Damage {
            target,
            result,
            health_lost: taken.health_lost,
        });

        if thorns > 0 && result.damage_before_block > 0 && target != self.caster {
            if self.ctx.pending_defeat.is_some() {
                return;
            }
            self.ctx
                .mutate_entity(self.caster, |entity| entity.take_damage(thorns, false));
            self.applied.push(AppliedEffect::Thorns {
                attacker: self.caster,
                amount: thorns,
            });
        }
    }

    fn push(&mut self, effect: AppliedEffect) {
        self.applied.push(effect);
    }
}
