use crate::rules::cards::{CardInstance, InstanceId};
use crate::rules::Actor;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CostModifier {
    pub amount: i32,
    pub remaining_duration: u32,
    /// 0 means the whole hand, including cards drawn later.
    pub affected_card_count: u32,
    pub hand: Actor,
    /// The instances a card-scoped modifier was bound to. `None` for whole-hand modifiers.
    pub scope: Option<Vec<InstanceId>>,
}

impl CostModifier {
    fn applies_to(&self, hand: Actor, instance_id: InstanceId) -> bool {
        self.hand == hand
            && match &self.scope {
                None => true,
                Some(scope) => scope.contains(&instance_id),
            }
    }
}

/// Temporary cost deltas of both hands.
#[derive(Debug, Clone, Default)]
pub struct CostLedger {
    modifiers: Vec<CostModifier>,
}

impl CostLedger {
    /// Stores a modifier on `hand`. With a non-zero `card_count` a random subset of the cards
    /// currently in `cards` is chosen, and the modifier stays bound to those instances.
    pub fn apply_cost_modifier_to_hand(
        &mut self,
        amount: i32,
        duration: u32,
        card_count: u32,
        hand: Actor,
        cards: &[CardInstance],
        rng: &mut impl Rng,
    ) -> Option<&CostModifier> {
        if duration == 0 || amount == 0 {
            warn!(amount, duration, "ignoring a cost modifier that would have no effect");
            return None;
        }

        let scope = if card_count == 0 {
            None
        } else {
            let chosen: Vec<InstanceId> = cards
                .choose_multiple(rng, card_count as usize)
                .map(|card| card.instance_id)
                .collect();
            if chosen.is_empty() {
                debug!(?hand, "no card to bind a cost modifier to");
                return None;
            }
            Some(chosen)
        };

        self.modifiers.push(CostModifier {
            amount,
            remaining_duration: duration,
            affected_card_count: card_count,
            hand,
            scope,
        });
        self.modifiers.last()
    }

    pub fn effective_cost(&self, hand: Actor, card: &CardInstance, base_cost: i32) -> i32 {
        let delta: i32 = self
            .modifiers
            .iter()
            .filter(|modifier| modifier.applies_to(hand, card.instance_id))
            .map(|modifier| modifier.amount)
            .sum();
        (base_cost + delta).max(0)
    }

    /// Counts every modifier down by one turn. Returns true when any modifier expired.
    pub fn decrement_modifiers(&mut self) -> bool {
        for modifier in &mut self.modifiers {
            modifier.remaining_duration = modifier.remaining_duration.saturating_sub(1);
        }
        let before = self.modifiers.len();
        self.modifiers
            .retain(|modifier| modifier.remaining_duration > 0);
        self.modifiers.len() != before
    }

    /// Unbinds an instance that left the hand. Card-scoped modifiers left without any card are
    /// dropped. Returns true when the ledger changed.
    pub fn on_card_left_hand(&mut self, hand: Actor, instance_id: InstanceId) -> bool {
        let mut changed = false;
        for modifier in self.modifiers.iter_mut().filter(|m| m.hand == hand) {
            if let Some(scope) = &mut modifier.scope {
                let before = scope.len();
                scope.retain(|id| *id != instance_id);
                changed |= scope.len() != before;
            }
        }
        self.modifiers
            .retain(|modifier| !matches!(&modifier.scope, Some(scope) if scope.is_empty()));
        changed
    }

    pub fn force_revert(&mut self) {
        self.modifiers.clear();
    }

    pub fn modifiers(&self) -> &[CostModifier] {
        &self.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::cards::CardId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hand(n: u32) -> Vec<CardInstance> {
        (0..n)
            .map(|i| CardInstance {
                instance_id: InstanceId(i),
                card_id: CardId(1),
            })
            .collect()
    }

    #[test]
    fn whole_hand_modifier_lasts_its_duration() {
        let mut rng = StdRng::seed_from_u64(3);
        let cards = hand(4);
        let mut ledger = CostLedger::default();
        ledger.apply_cost_modifier_to_hand(2, 2, 0, Actor::Player, &cards, &mut rng);

        for card in &cards {
            assert_eq!(ledger.effective_cost(Actor::Player, card, 1), 3);
            assert_eq!(ledger.effective_cost(Actor::Pet, card, 1), 1);
        }

        assert!(!ledger.decrement_modifiers());
        assert_eq!(ledger.effective_cost(Actor::Player, &cards[0], 1), 3);
        assert!(ledger.decrement_modifiers());
        for card in &cards {
            assert_eq!(ledger.effective_cost(Actor::Player, card, 1), 1);
        }
    }

    #[test]
    fn effective_cost_is_floored_at_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let cards = hand(2);
        let mut ledger = CostLedger::default();
        ledger.apply_cost_modifier_to_hand(-3, 1, 0, Actor::Pet, &cards, &mut rng);
        assert_eq!(ledger.effective_cost(Actor::Pet, &cards[1], 2), 0);
    }

    #[test]
    fn scoped_modifier_follows_its_instances() {
        let mut rng = StdRng::seed_from_u64(11);
        let cards = hand(5);
        let mut ledger = CostLedger::default();
        let scope = ledger
            .apply_cost_modifier_to_hand(1, 3, 2, Actor::Player, &cards, &mut rng)
            .and_then(|modifier| modifier.scope.clone())
            .unwrap();
        assert_eq!(scope.len(), 2);

        let affected = cards
            .iter()
            .filter(|card| ledger.effective_cost(Actor::Player, card, 1) == 2)
            .count();
        assert_eq!(affected, 2);

        assert!(ledger.on_card_left_hand(Actor::Player, scope[0]));
        assert_eq!(ledger.modifiers().len(), 1);
        assert!(ledger.on_card_left_hand(Actor::Player, scope[1]));
        assert!(ledger.modifiers().is_empty());
    }

    #[test]
    fn count_larger_than_the_hand_binds_every_card() {
        let mut rng = StdRng::seed_from_u64(5);
        let cards = hand(2);
        let mut ledger = CostLedger::default();
        ledger.apply_cost_modifier_to_hand(1, 1, 9, Actor::Player, &cards, &mut rng);
        assert_eq!(ledger.modifiers()[0].scope.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn force_revert_restores_base_costs() {
        let mut rng = StdRng::seed_from_u64(5);
        let cards = hand(1);
        let mut ledger = CostLedger::default();
        ledger.apply_cost_modifier_to_hand(4, 5, 0, Actor::Player, &cards, &mut rng);
        ledger.force_revert();
        assert_eq!(ledger.effective_cost(Actor::Player, &cards[0], 1), 1);
    }
}
