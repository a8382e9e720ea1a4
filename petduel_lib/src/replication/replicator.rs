use crate::replication::{
    EntityRecord, Outbound, OwnedRole, PeerMessage, PublishedValue, ReplicatedStats, SharedKey,
};
use crate::rules::cards::CardId;
use crate::rules::{CombatEntity, PeerId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What this peer last heard about the opponent's pet and the other peers.
#[derive(Debug, Clone, Default)]
pub struct ShadowKnowledge {
    pub record: Option<EntityRecord>,
    pub deck_manifest: Option<Vec<CardId>>,
    pub overview: HashMap<(PeerId, SharedKey), i64>,
}

/// Publishing side and inbound bookkeeping of the replication contract.
#[derive(Debug)]
pub struct Replicator {
    local_peer: PeerId,
    opponent_peer: Option<PeerId>,
    versions: HashMap<OwnedRole, u64>,
    last_published: HashMap<OwnedRole, ReplicatedStats>,
    last_shared: HashMap<SharedKey, i64>,
    outbox: Vec<Outbound>,
    shadow: ShadowKnowledge,
}

impl Replicator {
    pub fn new(local_peer: PeerId, opponent_peer: Option<PeerId>) -> Self {
        Self {
            local_peer,
            opponent_peer,
            versions: HashMap::new(),
            last_published: HashMap::new(),
            last_shared: HashMap::new(),
            outbox: vec![],
            shadow: ShadowKnowledge::default(),
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    pub fn opponent_peer(&self) -> Option<PeerId> {
        self.opponent_peer
    }

    pub fn set_opponent_peer(&mut self, peer: PeerId) {
        if self.opponent_peer != Some(peer) {
            self.opponent_peer = Some(peer);
            self.shadow.record = None;
            self.shadow.deck_manifest = None;
        }
    }

    pub fn shadow(&self) -> &ShadowKnowledge {
        &self.shadow
    }

    /// Publishes an owned entity unless nothing changed since the last publish.
    pub fn publish_entity(&mut self, entity: &CombatEntity) -> bool {
        let Some(role) = OwnedRole::of(entity.id()) else {
            warn!(entity = ?entity.id(), "refusing to publish an entity this peer does not own");
            return false;
        };

        let stats = ReplicatedStats::from(entity);
        if self.last_published.get(&role) == Some(&stats) {
            return false;
        }
        self.last_published.insert(role, stats);

        let version = self.versions.entry(role).or_default();
        *version += 1;
        self.outbox
            .push(Outbound::Publish(PublishedValue::Entity(EntityRecord {
                role,
                version: *version,
                stats,
            })));
        true
    }

    pub fn publish_shared(&mut self, key: SharedKey, value: i64) {
        if self.last_shared.get(&key) == Some(&value) {
            return;
        }
        self.last_shared.insert(key, value);
        self.outbox
            .push(Outbound::Publish(PublishedValue::Shared { key, value }));
    }

    pub fn publish_deck_manifest(&mut self, deck: &[CardId]) {
        self.outbox
            .push(Outbound::Publish(PublishedValue::DeckManifest(deck.to_vec())));
    }

    pub fn send_to_opponent(&mut self, message: PeerMessage) {
        match self.opponent_peer {
            Some(to) => self.outbox.push(Outbound::Send { to, message }),
            None => warn!(?message, "no opponent peer resolved, message dropped"),
        }
    }

    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        self.outbox.drain(..).collect()
    }

    /// Forgets what was published so the next publish goes out in full.
    pub fn reset_publish_cache(&mut self) {
        self.last_published.clear();
        self.last_shared.clear();
    }

    /// Records a published value. Returns the record to merge into the shadow pet, if any.
    pub fn observe(&mut self, from: PeerId, value: PublishedValue) -> Option<EntityRecord> {
        match value {
            PublishedValue::Shared { key, value } => {
                self.shadow.overview.insert((from, key), value);
                None
            }
            _ if Some(from) != self.opponent_peer => {
                debug!(%from, "ignoring a value from a peer this one is not fighting");
                None
            }
            PublishedValue::DeckManifest(deck) => {
                self.shadow.deck_manifest = Some(deck);
                None
            }
            PublishedValue::Entity(record) if record.role == OwnedRole::Pet => {
                if let Some(previous) = &self.shadow.record {
                    if record.version < previous.version {
                        debug!(
                            previous = previous.version,
                            received = record.version,
                            "pet record version went backwards"
                        );
                    }
                }
                self.shadow.record = Some(record);
                Some(record)
            }
            PublishedValue::Entity(_) => None,
        }
    }
}

/// In-combat merge: only the owner's persistent stats. Health, block and energy stay local.
pub(crate) fn merge_persistent(shadow: &mut CombatEntity, stats: &ReplicatedStats) {
    shadow.max_health = stats.max_health.max(1);
    shadow.current_health = shadow.current_health.min(shadow.max_health);

    let statuses = &mut shadow.statuses;
    statuses.weak_turns = stats.weak_turns;
    statuses.break_turns = stats.break_turns;
    statuses.thorns = stats.thorns.max(0);
    statuses.strength = stats.strength.max(0);
    statuses.dot.turns = stats.dot_turns;
    statuses.dot.amount = stats.dot_damage.max(0);
    statuses.hot.turns = stats.hot_turns;
    statuses.hot.amount = stats.hot_amount.max(0);

    // The owner's crit chance already includes its buffs.
    statuses.crit_buffs.clear();
    shadow.base_crit_chance = if stats.crit_chance.is_finite() {
        stats.crit_chance.clamp(0.0, 100.0)
    } else {
        0.0
    };
}

/// Combat-start recreation: the whole record, current health included.
pub(crate) fn merge_full(shadow: &mut CombatEntity, stats: &ReplicatedStats) {
    merge_persistent(shadow, stats);
    shadow.current_health = stats.health.clamp(0, shadow.max_health);
    shadow.block = stats.block.max(0);
    shadow.energy = stats.energy.max(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{EntityId, EntityStats, StatusKind};

    fn pet_record(version: u64, health: i32, weak_turns: u32) -> PublishedValue {
        PublishedValue::Entity(EntityRecord {
            role: OwnedRole::Pet,
            version,
            stats: ReplicatedStats {
                health,
                max_health: 40,
                weak_turns,
                ..Default::default()
            },
        })
    }

    #[test]
    fn unchanged_entities_are_not_republished() {
        let mut replicator = Replicator::new(PeerId(1), Some(PeerId(2)));
        let mut player = CombatEntity::new(EntityId::LocalPlayer, EntityStats::new(50, 3));

        assert!(replicator.publish_entity(&player));
        assert!(!replicator.publish_entity(&player));
        player.add_block(4);
        assert!(replicator.publish_entity(&player));

        let versions: Vec<u64> = replicator
            .drain_outbox()
            .into_iter()
            .filter_map(|outbound| match outbound {
                Outbound::Publish(PublishedValue::Entity(record)) => Some(record.version),
                _ => None,
            })
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn latest_record_wins_even_if_older() {
        let mut replicator = Replicator::new(PeerId(1), Some(PeerId(2)));
        replicator.observe(PeerId(2), pet_record(5, 30, 2));
        let merged = replicator.observe(PeerId(2), pet_record(3, 35, 0));

        assert_eq!(merged.map(|record| record.version), Some(3));
        assert_eq!(replicator.shadow().record.map(|r| r.stats.health), Some(35));
    }

    #[test]
    fn values_from_other_peers_only_reach_the_overview() {
        let mut replicator = Replicator::new(PeerId(1), Some(PeerId(2)));
        assert!(replicator.observe(PeerId(3), pet_record(1, 10, 0)).is_none());
        replicator.observe(
            PeerId(3),
            PublishedValue::Shared {
                key: SharedKey::CurrentTurn,
                value: 4,
            },
        );

        assert!(replicator.shadow().record.is_none());
        assert_eq!(
            replicator.shadow().overview.get(&(PeerId(3), SharedKey::CurrentTurn)),
            Some(&4)
        );
    }

    #[test]
    fn sends_without_an_opponent_are_dropped() {
        let mut replicator = Replicator::new(PeerId(1), None);
        replicator.send_to_opponent(PeerMessage::OpponentPlayedCard { cost: 1 });
        assert!(replicator.drain_outbox().is_empty());
    }

    #[test]
    fn persistent_merge_keeps_local_health() {
        let mut shadow = CombatEntity::new(EntityId::OpponentPet, EntityStats::new(40, 3));
        shadow.take_damage(15, false);
        shadow.apply_status_effect(StatusKind::Thorns, 4);

        let stats = ReplicatedStats {
            health: 40,
            max_health: 45,
            weak_turns: 2,
            crit_chance: 12.0,
            ..Default::default()
        };
        merge_persistent(&mut shadow, &stats);

        assert_eq!(shadow.current_health(), 25);
        assert_eq!(shadow.max_health(), 45);
        assert_eq!(shadow.statuses().thorns, 0);
        assert!(shadow.statuses().is_weak());
        assert_eq!(shadow.crit_chance(), 12.0);

        merge_full(&mut shadow, &stats);
        assert_eq!(shadow.current_health(), 40);
    }
}
