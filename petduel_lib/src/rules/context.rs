use crate::replication::{
    merge_full, EntityRecord, Outbound, PeerMessage, Replicator, SharedKey, StatusApplication,
};
use crate::rules::cards::{CardId, CardInstance, CardLibrary, DiscardTriggerKind, InstanceId};
use crate::rules::{
    Actor, ActorData, CardPiles, CombatConfig, CombatEntity, ComboState, CostLedger,
    DiscardTriggers, EntitiesData, EntityId, TemporaryUpgrades, UiEvent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Everything one combat mutates. Passed explicitly to the resolver and the turn flow.
#[derive(Debug)]
pub struct CombatContext {
    pub(crate) config: CombatConfig,
    pub(crate) library: CardLibrary,
    pub(crate) entities: EntitiesData<CombatEntity>,
    pub(crate) piles: ActorData<CardPiles>,
    pub(crate) combos: ActorData<ComboState>,
    pub(crate) upgrades: ActorData<TemporaryUpgrades>,
    pub(crate) costs: CostLedger,
    pub(crate) discard_triggers: DiscardTriggers,
    pub(crate) turn: u32,
    pub(crate) rng: StdRng,
    pub(crate) replicator: Replicator,
    /// The first entity that reached zero health this combat.
    pub(crate) pending_defeat: Option<EntityId>,
    play_counts: HashMap<(Actor, CardId), u32>,
    ui_events: Vec<UiEvent>,
    next_instance_id: u32,
}

impl CombatContext {
    pub fn new(config: CombatConfig, library: CardLibrary, replicator: Replicator) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let entities = EntitiesData::new(
            CombatEntity::new(EntityId::LocalPlayer, config.player),
            CombatEntity::new(EntityId::LocalPet, config.local_pet),
            CombatEntity::new(EntityId::OpponentPet, config.opponent_pet_fallback),
        );

        Self {
            config,
            library,
            entities,
            piles: ActorData::default(),
            combos: ActorData::default(),
            upgrades: ActorData::default(),
            costs: CostLedger::default(),
            discard_triggers: DiscardTriggers::default(),
            turn: 0,
            rng,
            replicator,
            pending_defeat: None,
            play_counts: HashMap::new(),
            ui_events: vec![],
            next_instance_id: 0,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn library(&self) -> &CardLibrary {
        &self.library
    }

    pub fn entity(&self, id: EntityId) -> &CombatEntity {
        &self.entities[id]
    }

    pub fn piles(&self, actor: Actor) -> &CardPiles {
        &self.piles[actor]
    }

    pub fn combo(&self, actor: Actor) -> &ComboState {
        &self.combos[actor]
    }

    pub fn costs(&self) -> &CostLedger {
        &self.costs
    }

    pub fn discard_triggers(&self) -> &DiscardTriggers {
        &self.discard_triggers
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn replicator(&self) -> &Replicator {
        &self.replicator
    }

    pub fn replicator_mut(&mut self) -> &mut Replicator {
        &mut self.replicator
    }

    /// Builds fresh entities, decks and ledgers for a new combat. The opponent pet is recreated
    /// from the last record and deck manifest its owner published.
    pub(crate) fn reset_for_combat(&mut self) {
        let config = &self.config;
        self.entities = EntitiesData::new(
            CombatEntity::new(EntityId::LocalPlayer, config.player),
            CombatEntity::new(EntityId::LocalPet, config.local_pet),
            CombatEntity::new(EntityId::OpponentPet, config.opponent_pet_fallback),
        );

        let shadow = self.replicator.shadow();
        let pet_record: Option<EntityRecord> = shadow.record;
        let pet_deck = match &shadow.deck_manifest {
            Some(manifest) => manifest.clone(),
            None => {
                warn!("no deck manifest for the opponent pet, using the configured pet deck");
                self.config.pet_deck.clone()
            }
        };
        match pet_record {
            Some(record) => merge_full(&mut self.entities.opponent_pet, &record.stats),
            None => debug!("no record for the opponent pet yet, using fallback stats"),
        }

        let player_deck = self.config.player_deck.clone();
        let player_deck = self.instantiate(&player_deck);
        let pet_deck = self.instantiate(&pet_deck);
        self.piles = ActorData::new(CardPiles::from_deck(player_deck), CardPiles::from_deck(pet_deck));
        self.piles.player_data.shuffle_deck(&mut self.rng);
        self.piles.pet_data.shuffle_deck(&mut self.rng);

        self.combos = ActorData::default();
        self.upgrades = ActorData::default();
        self.costs.force_revert();
        self.discard_triggers.clear();
        self.play_counts.clear();
        self.turn = 0;
        self.pending_defeat = None;

        self.announce();
        info!(
            player_deck = self.piles.player_data.deck.len(),
            pet_deck = self.piles.pet_data.deck.len(),
            "combat state prepared"
        );
    }

    /// Publishes everything this peer owns in full, the own pet's deck manifest included.
    pub fn announce(&mut self) {
        self.replicator.reset_publish_cache();
        self.replicator.publish_deck_manifest(&self.config.pet_deck);
        self.publish(EntityId::LocalPlayer);
        self.publish(EntityId::LocalPet);
        self.publish(EntityId::OpponentPet);
    }

    fn instantiate(&mut self, deck: &[CardId]) -> Vec<CardInstance> {
        let mut instances = Vec::with_capacity(deck.len());
        for card_id in deck {
            if self.library.get(*card_id).is_none() {
                warn!(card = %card_id, "skipping a deck entry missing from the card library");
                continue;
            }
            self.next_instance_id += 1;
            instances.push(CardInstance {
                instance_id: InstanceId(self.next_instance_id),
                card_id: *card_id,
            });
        }
        instances
    }

    /// A one-off instance for card effects that are not played from a pile.
    pub(crate) fn transient_instance(&mut self, card_id: CardId) -> CardInstance {
        self.next_instance_id += 1;
        CardInstance {
            instance_id: InstanceId(self.next_instance_id),
            card_id,
        }
    }

    /// Mutates one entity, then refreshes and replicates it. The first zero-health transition
    /// of the combat is kept as the pending defeat.
    pub(crate) fn mutate_entity<R>(
        &mut self,
        id: EntityId,
        mutate: impl FnOnce(&mut CombatEntity) -> R,
    ) -> R {
        let entity = &mut self.entities[id];
        let result = mutate(entity);

        entity.signal_defeat_if_dead();
        if !entity.is_alive() && self.pending_defeat.is_none() {
            info!(entity = ?id, "entity defeated");
            self.pending_defeat = Some(id);
        }

        self.ui_events.push(UiEvent::EntityChanged(id));
        self.publish(id);
        result
    }

    fn publish(&mut self, id: EntityId) {
        let entity = &self.entities[id];
        if id.is_owned() {
            self.replicator.publish_entity(entity);
        } else {
            self.replicator
                .publish_shared(SharedKey::OpponentPetHp, entity.current_health() as i64);
        }
    }

    /// Applies a status change. Changes to the opponent pet are replayed by its owner.
    pub(crate) fn apply_status(&mut self, id: EntityId, status: StatusApplication) {
        self.mutate_entity(id, |entity| match status {
            StatusApplication::Status { kind, value } => entity.apply_status_effect(kind, value),
            StatusApplication::DamageOverTime { amount, duration } => {
                entity.apply_dot(amount, duration)
            }
            StatusApplication::HealOverTime { amount, duration } => {
                entity.apply_hot(amount, duration)
            }
            StatusApplication::CritBuff { amount, duration } => {
                entity.apply_crit_buff(amount, duration)
            }
        });

        if id == EntityId::OpponentPet {
            self.replicator
                .send_to_opponent(PeerMessage::ApplyStatusToMyPet { status });
        }
    }

    pub(crate) fn draw(&mut self, actor: Actor, count: u32) -> Vec<CardInstance> {
        let drawn = self.piles[actor].draw(count, &mut self.rng);
        if !drawn.is_empty() {
            self.ui_events.push(UiEvent::HandChanged(actor));
        }
        drawn
    }

    /// Discards one hand card and fires its discard trigger, if any.
    pub(crate) fn discard_from_hand(&mut self, actor: Actor, hand_index: usize) -> Option<CardInstance> {
        let card = self.piles[actor].discard_from_hand(hand_index)?;
        self.ui_events.push(UiEvent::HandChanged(actor));
        self.on_left_hand(actor, card.instance_id);
        self.fire_discard_trigger(actor, card.instance_id);
        Some(card)
    }

    pub(crate) fn discard_hand(&mut self, actor: Actor) -> Vec<CardInstance> {
        let discarded = self.piles[actor].discard_hand();
        if !discarded.is_empty() {
            self.ui_events.push(UiEvent::HandChanged(actor));
        }
        for card in &discarded {
            self.on_left_hand(actor, card.instance_id);
            self.fire_discard_trigger(actor, card.instance_id);
        }
        discarded
    }

    pub(crate) fn on_left_hand(&mut self, actor: Actor, instance_id: InstanceId) {
        if self.costs.on_card_left_hand(actor, instance_id) {
            self.ui_events.push(UiEvent::HandChanged(actor));
        }
    }

    fn fire_discard_trigger(&mut self, actor: Actor, instance_id: InstanceId) {
        let Some(trigger) = self.discard_triggers.take(instance_id) else {
            return;
        };
        if self.pending_defeat.is_some() {
            return;
        }
        debug!(?actor, %instance_id, ?trigger, "discard trigger fired");

        let owner = actor.entity();
        match trigger.kind {
            DiscardTriggerKind::Damage => {
                self.mutate_entity(actor.other().entity(), |entity| {
                    entity.take_damage(trigger.value, false)
                });
            }
            DiscardTriggerKind::Block => {
                self.mutate_entity(owner, |entity| entity.add_block(trigger.value));
            }
            DiscardTriggerKind::Heal => {
                self.mutate_entity(owner, |entity| entity.heal(trigger.value));
            }
            DiscardTriggerKind::Energy => {
                self.mutate_entity(owner, |entity| entity.gain_energy(trigger.value));
            }
            DiscardTriggerKind::Draw => {
                self.draw(actor, trigger.value.max(0) as u32);
            }
        }
    }

    /// Cost of a hand card after cost modifiers. `None` for cards missing from the library.
    pub fn effective_cost(&self, actor: Actor, card: &CardInstance) -> Option<i32> {
        let base = self.library.base_cost(card.card_id)?;
        Some(self.costs.effective_cost(actor, card, base))
    }

    /// Counts a play and returns how often the card was played by `actor` before.
    pub(crate) fn record_play(&mut self, actor: Actor, card_id: CardId) -> u32 {
        let count = self.play_counts.entry((actor, card_id)).or_default();
        let previous = *count;
        *count += 1;
        previous
    }

    pub(crate) fn push_ui(&mut self, event: UiEvent) {
        self.ui_events.push(event);
    }

    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        self.ui_events.drain(..).collect()
    }

    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        self.replicator.drain_outbox()
    }
}
