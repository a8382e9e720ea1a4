use crate::rules::cards::{CardId, CardLibrary, InstanceId, SelectionRule};
use crate::rules::CardPiles;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
struct UpgradeEntry {
    instance_id: InstanceId,
    original: CardId,
    turns_remaining: u32,
}

/// Cards of one side that are temporarily swapped for their upgraded variant.
#[derive(Debug, Clone, Default)]
pub struct TemporaryUpgrades {
    entries: Vec<UpgradeEntry>,
}

impl TemporaryUpgrades {
    /// Upgrades up to `card_count` hand cards picked by `rule`. Only cards with an upgraded
    /// variant that are not upgraded already are eligible. Returns the upgraded instances.
    pub fn apply(
        &mut self,
        piles: &mut CardPiles,
        library: &CardLibrary,
        card_count: u32,
        duration: u32,
        rule: SelectionRule,
        rng: &mut impl Rng,
    ) -> Vec<InstanceId> {
        let duration = duration.max(1);

        let mut candidates: Vec<(usize, i32)> = piles
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| !self.is_upgraded(card.instance_id))
            .filter(|(_, card)| library.upgraded_of(card.card_id).is_some())
            .map(|(index, card)| (index, library.base_cost(card.card_id).unwrap_or(0)))
            .collect();

        match rule {
            SelectionRule::Random => candidates.shuffle(rng),
            // Stable sorts, so ties go to the leftmost card.
            SelectionRule::Cheapest => candidates.sort_by_key(|(_, cost)| *cost),
            SelectionRule::MostExpensive => candidates.sort_by_key(|(_, cost)| -*cost),
        }

        let mut upgraded = vec![];
        for (index, _) in candidates.into_iter().take(card_count as usize) {
            let card = &mut piles.hand[index];
            let Some(target) = library.get(card.card_id).and_then(|c| c.upgraded) else {
                continue;
            };

            self.entries.push(UpgradeEntry {
                instance_id: card.instance_id,
                original: card.card_id,
                turns_remaining: duration,
            });
            card.card_id = target;
            upgraded.push(card.instance_id);
        }
        upgraded
    }

    pub fn is_upgraded(&self, instance_id: InstanceId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.instance_id == instance_id)
    }

    /// Counts one end-of-turn down and reverts the upgrades that ran out.
    pub fn expire_end_of_turn(&mut self, piles: &mut CardPiles) -> Vec<InstanceId> {
        for entry in &mut self.entries {
            entry.turns_remaining = entry.turns_remaining.saturating_sub(1);
        }

        let (expired, kept): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.turns_remaining == 0);
        self.entries = kept;

        expired
            .into_iter()
            .map(|entry| Self::revert(piles, &entry))
            .collect()
    }

    /// Reverts everything, wherever the instances are now.
    pub fn force_revert(&mut self, piles: &mut CardPiles) -> Vec<InstanceId> {
        self.entries
            .drain(..)
            .map(|entry| Self::revert(piles, &entry))
            .collect()
    }

    fn revert(piles: &mut CardPiles, entry: &UpgradeEntry) -> InstanceId {
        if let Some(card) = piles.find_mut(entry.instance_id) {
            card.card_id = entry.original;
        }
        entry.instance_id
    }
}
