use super::{AppliedEffect, Resolution};
use crate::replication::{PeerMessage, StatusApplication};
use crate::rules::calculator::{
    calculate_card_block_with_scaling, calculate_card_damage_with_scaling,
};
use crate::rules::cards::{
    BlockFacet, ComboBonus, ComboFacet, CostModifierFacet, CritBuffFacet, DamageFacet,
    DamageOverTimeFacet, DiscardTriggerFacet, DrawFacet, EnergyGainFacet, Facet, FacetStage,
    HandRole, HealFacet, HealOverTimeFacet, RandomDiscardFacet, Recipient, StatusFacet,
    TemporaryUpgradeFacet,
};
use crate::rules::{Actor, ComboState, UiEvent};
use rand::Rng;
use tracing::debug;

impl Facet for DamageFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Damage
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let input = resolution.scaling_input(&self.scaling);
        let amount = calculate_card_damage_with_scaling(self.base, &self.scaling, &input);
        resolution.deal_damage(resolution.damage_target, amount);
    }
}

impl Facet for BlockFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Block
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let input = resolution.scaling_input(&self.scaling);
        let amount = calculate_card_block_with_scaling(self.base, &self.scaling, &input);
        let recipient = resolution.recipient(self.recipient);
        resolution
            .ctx
            .mutate_entity(recipient, |entity| entity.add_block(amount));
        resolution.push(AppliedEffect::Block { recipient, amount });
    }
}

impl Facet for EnergyGainFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::EnergyGain
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.caster;
        let amount = self.amount;
        resolution
            .ctx
            .mutate_entity(recipient, |entity| entity.gain_energy(amount));
        resolution.push(AppliedEffect::EnergyGained { recipient, amount });
    }
}

impl Facet for DrawFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Draw
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let hand = resolution.actor;
        let drawn = resolution.ctx.draw(hand, self.amount);
        resolution.push(AppliedEffect::Drawn {
            hand,
            count: drawn.len(),
        });
    }
}

impl Facet for RandomDiscardFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::RandomDiscard
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let hand = resolution.hand(self.hand);
        let mut count = 0;
        for _ in 0..self.amount {
            let len = resolution.ctx.piles[hand].hand.len();
            if len == 0 {
                break;
            }
            let index = resolution.ctx.rng.gen_range(0..len);
            if resolution.ctx.discard_from_hand(hand, index).is_some() {
                count += 1;
            }
        }
        resolution.push(AppliedEffect::Discarded { hand, count });
    }
}

impl Facet for HealFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Heal
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.recipient(self.recipient);
        let amount = self.amount;
        let healed = resolution
            .ctx
            .mutate_entity(recipient, |entity| entity.heal(amount));
        resolution.push(AppliedEffect::Healed {
            recipient,
            amount: healed,
        });
    }
}

impl Facet for StatusFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Status
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.recipient(self.resolved_recipient());
        resolution.ctx.apply_status(
            recipient,
            StatusApplication::Status {
                kind: self.kind,
                value: self.magnitude,
            },
        );
        resolution.push(AppliedEffect::Status {
            recipient,
            kind: self.kind,
            magnitude: self.magnitude,
        });
    }
}

impl Facet for CritBuffFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Status
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.recipient(self.recipient);
        resolution.ctx.apply_status(
            recipient,
            StatusApplication::CritBuff {
                amount: self.amount,
                duration: self.duration,
            },
        );
        resolution.push(AppliedEffect::CritBuff {
            recipient,
            amount: self.amount,
            duration: self.duration,
        });
    }
}

impl Facet for DamageOverTimeFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::OverTime
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.recipient(Recipient::Target);
        resolution.ctx.apply_status(
            recipient,
            StatusApplication::DamageOverTime {
                amount: self.amount,
                duration: self.duration,
            },
        );
        resolution.push(AppliedEffect::DamageOverTime {
            recipient,
            amount: self.amount,
            duration: self.duration,
        });
    }
}

impl Facet for HealOverTimeFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::OverTime
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let recipient = resolution.recipient(self.recipient);
        resolution.ctx.apply_status(
            recipient,
            StatusApplication::HealOverTime {
                amount: self.amount,
                duration: self.duration,
            },
        );
        resolution.push(AppliedEffect::HealOverTime {
            recipient,
            amount: self.amount,
            duration: self.duration,
        });
    }
}

impl Facet for ComboFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::Combo
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let actor = resolution.actor;
        let combo = &mut resolution.ctx.combos[actor];
        let before = combo.count();
        let after = if self.starter {
            combo.register_starter()
        } else {
            before
        };
        if self.starter {
            resolution.push(AppliedEffect::ComboCounted { count: after });
        }

        let Some(trigger) = self.trigger else {
            return;
        };
        // A starter fires only on the play that crosses the threshold.
        let fires = if self.starter {
            ComboState::crossed(before, after, trigger.threshold)
        } else {
            ComboState::reached(after, trigger.threshold)
        };
        if !fires {
            return;
        }

        debug!(?actor, count = after, "combo fired");
        resolution
            .ctx
            .push_ui(UiEvent::ComboFired { actor, count: after });
        resolution.push(AppliedEffect::ComboFired {
            count: after,
            bonus: trigger.bonus,
        });

        let recipient = resolution.recipient(trigger.target);
        match trigger.bonus {
            ComboBonus::Damage(amount) => resolution.deal_damage(recipient, amount),
            ComboBonus::Block(amount) => {
                resolution
                    .ctx
                    .mutate_entity(recipient, |entity| entity.add_block(amount));
                resolution.push(AppliedEffect::Block { recipient, amount });
            }
            ComboBonus::Heal(amount) => {
                let healed = resolution
                    .ctx
                    .mutate_entity(recipient, |entity| entity.heal(amount));
                resolution.push(AppliedEffect::Healed {
                    recipient,
                    amount: healed,
                });
            }
            ComboBonus::Energy(amount) => {
                resolution
                    .ctx
                    .mutate_entity(recipient, |entity| entity.gain_energy(amount));
                resolution.push(AppliedEffect::EnergyGained { recipient, amount });
            }
            ComboBonus::Draw(amount) => {
                let drawn = resolution.ctx.draw(actor, amount);
                resolution.push(AppliedEffect::Drawn {
                    hand: actor,
                    count: drawn.len(),
                });
            }
            ComboBonus::Status { kind, magnitude } => {
                resolution.ctx.apply_status(
                    recipient,
                    StatusApplication::Status {
                        kind,
                        value: magnitude,
                    },
                );
                resolution.push(AppliedEffect::Status {
                    recipient,
                    kind,
                    magnitude,
                });
            }
        }
    }
}

impl Facet for CostModifierFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::CostModifier
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        // The human opponent's hand is only simulated on its own peer.
        if resolution.actor == Actor::Player && self.hand == HandRole::Opponent {
            resolution
                .ctx
                .replicator
                .send_to_opponent(PeerMessage::ApplyHandCostModifier {
                    amount: self.amount,
                    duration: self.duration,
                    count: self.card_count,
                });
            resolution.push(AppliedEffect::CostModifierSent {
                amount: self.amount,
                duration: self.duration,
                count: self.card_count,
            });
            return;
        }

        let hand = resolution.hand(self.hand);
        let ctx = &mut *resolution.ctx;
        let cards = ctx.piles[hand].hand.clone();
        let scope = ctx
            .costs
            .apply_cost_modifier_to_hand(
                self.amount,
                self.duration,
                self.card_count,
                hand,
                &cards,
                &mut ctx.rng,
            )
            .map(|modifier| modifier.scope.clone());

        if let Some(cards) = scope {
            ctx.push_ui(UiEvent::HandChanged(hand));
            resolution.push(AppliedEffect::CostModified {
                hand,
                amount: self.amount,
                duration: self.duration,
                cards,
            });
        }
    }
}

impl Facet for TemporaryUpgradeFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::TemporaryUpgrade
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let actor = resolution.actor;
        let ctx = &mut *resolution.ctx;
        let instances = ctx.upgrades[actor].apply(
            &mut ctx.piles[actor],
            &ctx.library,
            self.card_count,
            self.duration,
            self.rule,
            &mut ctx.rng,
        );

        if !instances.is_empty() {
            ctx.push_ui(UiEvent::HandChanged(actor));
        }
        resolution.push(AppliedEffect::Upgraded { instances });
    }
}

impl Facet for DiscardTriggerFacet {
    fn stage(&self) -> FacetStage {
        FacetStage::DiscardTrigger
    }

    fn apply(&self, resolution: &mut Resolution<'_>) {
        let instance = resolution.instance.instance_id;
        resolution
            .ctx
            .discard_triggers
            .register(instance, self.trigger);
        resolution.push(AppliedEffect::DiscardTriggerRegistered {
            instance,
            trigger: self.trigger,
        });
    }
}
