use crate::replication::{
    merge_persistent, Inbound, Outbound, PeerMessage, ReplicatedStats, SharedKey,
};
use crate::rules::cards::{CardId, CardInstance};
use crate::rules::resolver::{resolve, AppliedEffects};
use crate::rules::{
    Actor, CombatContext, CombatOutcome, CombatPhase, CombatView, EntityId, HandCardView, PeerId,
    UiEvent,
};
use std::ops::ControlFlow;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Stops a pet turn that keeps finding affordable cards, e.g. through energy-gaining zero-cost cards.
const MAX_PET_PLAYS_PER_TURN: u32 = 30;

type TurnControlFlow = ControlFlow<CombatOutcome>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayRejected {
    #[error("Cards can only be played during the player's turn.")]
    NotPlayerTurn,
    #[error("There is no card at hand index {0}.")]
    NoSuchCard(usize),
    #[error("{0} is missing from the card library.")]
    UnknownCard(CardId),
    #[error("The card costs {cost} but only {energy} energy is left.")]
    NotEnoughEnergy { cost: i32, energy: i32 },
    #[error("The player cannot target {0:?}.")]
    InvalidTarget(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OpponentStep {
    Played {
        card: CardInstance,
        cost: i32,
        effects: AppliedEffects,
    },
    /// The pet's turn is over. The flow is in the next player turn or the combat has ended.
    Finished,
}

/// The phase machine of one peer's combat.
#[derive(Debug)]
pub struct TurnFlow {
    phase: CombatPhase,
    ctx: CombatContext,
    pet_plays_this_turn: u32,
}

impl TurnFlow {
    pub fn new(ctx: CombatContext) -> Self {
        Self {
            phase: CombatPhase::NotInCombat,
            ctx,
            pet_plays_this_turn: 0,
        }
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn context(&self) -> &CombatContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut CombatContext {
        &mut self.ctx
    }

    pub fn start_combat(&mut self) {
        if matches!(self.phase, CombatPhase::PlayerTurn | CombatPhase::OpponentTurn) {
            warn!(phase = ?self.phase, "a combat is already running");
            return;
        }

        self.ctx.reset_for_combat();
        self.pet_plays_this_turn = 0;
        info!(peer = %self.ctx.replicator.local_peer(), "combat started");
        self.set_phase(CombatPhase::NotInCombat);
        self.start_player_turn();
    }

    pub fn start_player_turn(&mut self) {
        if self.phase.is_ended() {
            warn!("start_player_turn after the combat ended");
            return;
        }
        if let ControlFlow::Break(outcome) = self.begin_player_turn() {
            self.finish(outcome);
        }
    }

    fn begin_player_turn(&mut self) -> TurnControlFlow {
        let ctx = &mut self.ctx;
        ctx.turn += 1;
        let turn_limit = ctx.config.turn_limit;
        if turn_limit > 0 && ctx.turn > turn_limit {
            info!(turn_limit, "turn limit reached");
            return ControlFlow::Break(CombatOutcome::Aborted);
        }
        debug!(turn = ctx.turn, "player turn starts");

        ctx.combos.player_data.reset();
        ctx.combos.pet_data.reset();
        if ctx.costs.decrement_modifiers() {
            ctx.push_ui(UiEvent::HandChanged(Actor::Player));
            ctx.push_ui(UiEvent::HandChanged(Actor::Pet));
        }

        // The player's strength and crit buffs decay when its turn ends.
        ctx.mutate_entity(EntityId::LocalPlayer, |entity| {
            entity.tick_over_time_effects()
        });
        ctx.mutate_entity(EntityId::LocalPet, |entity| {
            entity.process_turn_start_effects()
        });
        // Local guess for the shadow pet. Its owner's next record corrects the counters.
        ctx.mutate_entity(EntityId::OpponentPet, |entity| {
            entity.tick_over_time_effects()
        });
        self.check_defeat()?;

        let ctx = &mut self.ctx;
        ctx.mutate_entity(EntityId::LocalPlayer, |entity| entity.reset_energy());
        let pet_energy = ctx.mutate_entity(EntityId::OpponentPet, |entity| {
            entity.reset_energy();
            entity.energy()
        });
        ctx.replicator
            .send_to_opponent(PeerMessage::ResetOpponentPetEnergy { value: pet_energy });
        ctx.replicator
            .publish_shared(SharedKey::CurrentTurn, ctx.turn as i64);

        let pet_hand_size = ctx.config.pet_hand_size;
        let player_hand_size = ctx.config.player_hand_size;
        ctx.draw(Actor::Pet, pet_hand_size);
        ctx.draw(Actor::Player, player_hand_size);
        self.check_defeat()?;

        let turn = self.ctx.turn;
        self.ctx.push_ui(UiEvent::TurnStarted { turn });
        self.set_phase(CombatPhase::PlayerTurn);
        ControlFlow::Continue(())
    }

    /// Plays a card from the player's hand. A rejected play changes nothing.
    pub fn play_card(
        &mut self,
        hand_index: usize,
        target: EntityId,
    ) -> Result<AppliedEffects, PlayRejected> {
        if self.phase != CombatPhase::PlayerTurn {
            warn!(phase = ?self.phase, "play_card outside the player's turn");
            return Err(PlayRejected::NotPlayerTurn);
        }
        if target == EntityId::LocalPet {
            return Err(PlayRejected::InvalidTarget(target));
        }

        let ctx = &mut self.ctx;
        let card = *ctx
            .piles
            .player_data
            .hand
            .get(hand_index)
            .ok_or(PlayRejected::NoSuchCard(hand_index))?;
        let cost = ctx
            .effective_cost(Actor::Player, &card)
            .ok_or(PlayRejected::UnknownCard(card.card_id))?;
        let energy = ctx.entity(EntityId::LocalPlayer).energy();
        if cost > energy {
            return Err(PlayRejected::NotEnoughEnergy { cost, energy });
        }

        ctx.mutate_entity(EntityId::LocalPlayer, |entity| entity.consume_energy(cost));
        let effects = Self::play_from_hand(ctx, Actor::Player, hand_index, card, target);

        if let ControlFlow::Break(outcome) = self.check_defeat() {
            self.finish(outcome);
        }
        Ok(effects)
    }

    fn play_from_hand(
        ctx: &mut CombatContext,
        actor: Actor,
        hand_index: usize,
        card: CardInstance,
        target: EntityId,
    ) -> AppliedEffects {
        ctx.piles[actor].begin_play(hand_index);
        ctx.on_left_hand(actor, card.instance_id);
        ctx.push_ui(UiEvent::HandChanged(actor));

        let effects = resolve(ctx, card, actor, target);
        ctx.piles[actor].finish_play(card.instance_id);
        effects
    }

    pub fn end_player_turn(&mut self) {
        if self.phase != CombatPhase::PlayerTurn {
            warn!(phase = ?self.phase, "end_player_turn outside the player's turn");
            return;
        }

        let ctx = &mut self.ctx;
        let reverted = ctx.upgrades.player_data.expire_end_of_turn(&mut ctx.piles.player_data);
        if !reverted.is_empty() {
            ctx.push_ui(UiEvent::HandChanged(Actor::Player));
        }
        ctx.discard_hand(Actor::Player);
        ctx.mutate_entity(EntityId::OpponentPet, |entity| entity.reset_block());
        ctx.mutate_entity(EntityId::LocalPlayer, |entity| entity.decay_end_of_turn());

        if let ControlFlow::Break(outcome) = self.check_defeat() {
            self.finish(outcome);
            return;
        }
        self.pet_plays_this_turn = 0;
        self.set_phase(CombatPhase::OpponentTurn);
    }

    /// Runs one discrete step of the pet's turn: one card play, or the end of the turn.
    pub fn step_opponent_turn(&mut self) -> OpponentStep {
        if self.phase != CombatPhase::OpponentTurn {
            warn!(phase = ?self.phase, "step_opponent_turn outside the opponent's turn");
            return OpponentStep::Finished;
        }

        let Some((hand_index, card, cost)) = self.next_pet_play() else {
            self.finish_opponent_turn();
            return OpponentStep::Finished;
        };

        let ctx = &mut self.ctx;
        ctx.mutate_entity(EntityId::OpponentPet, |entity| entity.consume_energy(cost));
        ctx.replicator
            .send_to_opponent(PeerMessage::OpponentPlayedCard { cost });
        debug!(card = %card.card_id, cost, "pet plays a card");
        let effects =
            Self::play_from_hand(ctx, Actor::Pet, hand_index, card, EntityId::LocalPlayer);
        self.pet_plays_this_turn += 1;

        if let ControlFlow::Break(outcome) = self.check_defeat() {
            self.finish(outcome);
        }
        OpponentStep::Played {
            card,
            cost,
            effects,
        }
    }

    /// Steps the pet's turn to its end without pauses.
    pub fn run_opponent_turn(&mut self) -> Vec<OpponentStep> {
        let mut steps = vec![];
        while self.phase == CombatPhase::OpponentTurn {
            let step = self.step_opponent_turn();
            let finished = step == OpponentStep::Finished;
            steps.push(step);
            if finished {
                break;
            }
        }
        steps
    }

    /// The first affordable card in the pet's hand.
    fn next_pet_play(&self) -> Option<(usize, CardInstance, i32)> {
        if self.pet_plays_this_turn >= MAX_PET_PLAYS_PER_TURN {
            warn!("the pet hit the per-turn play cap");
            return None;
        }

        let energy = self.ctx.entity(EntityId::OpponentPet).energy();
        if energy <= 0 {
            return None;
        }
        self.ctx
            .piles
            .pet_data
            .hand
            .iter()
            .enumerate()
            .find_map(|(index, card)| {
                let cost = self.ctx.effective_cost(Actor::Pet, card)?;
                (cost <= energy).then_some((index, *card, cost))
            })
    }

    fn finish_opponent_turn(&mut self) {
        let ctx = &mut self.ctx;
        let reverted = ctx.upgrades.pet_data.expire_end_of_turn(&mut ctx.piles.pet_data);
        if !reverted.is_empty() {
            ctx.push_ui(UiEvent::HandChanged(Actor::Pet));
        }
        ctx.discard_hand(Actor::Pet);
        ctx.mutate_entity(EntityId::OpponentPet, |entity| {
            entity.statuses.decay_strength()
        });
        ctx.mutate_entity(EntityId::LocalPlayer, |entity| entity.reset_block());

        if let ControlFlow::Break(outcome) = self.check_defeat() {
            self.finish(outcome);
            return;
        }
        self.start_player_turn();
    }

    /// Ends the combat now. Aborted unless an entity was already defeated.
    pub fn end_combat(&mut self) {
        if self.phase.is_ended() {
            debug!("end_combat on an ended combat");
            return;
        }
        let outcome = self
            .ctx
            .pending_defeat
            .map_or(CombatOutcome::Aborted, CombatOutcome::from_defeated);
        self.finish(outcome);
    }

    fn check_defeat(&self) -> TurnControlFlow {
        match self.ctx.pending_defeat {
            Some(defeated) => ControlFlow::Break(CombatOutcome::from_defeated(defeated)),
            None => ControlFlow::Continue(()),
        }
    }

    fn finish(&mut self, outcome: CombatOutcome) {
        if self.phase.is_ended() {
            return;
        }

        let ctx = &mut self.ctx;
        ctx.upgrades.player_data.force_revert(&mut ctx.piles.player_data);
        ctx.upgrades.pet_data.force_revert(&mut ctx.piles.pet_data);
        ctx.costs.force_revert();
        ctx.discard_triggers.clear();

        info!(?outcome, turn = ctx.turn, "combat ended");
        ctx.push_ui(UiEvent::CombatEnded(outcome));
        self.set_phase(CombatPhase::CombatEnded(outcome));
    }

    fn set_phase(&mut self, phase: CombatPhase) {
        self.phase = phase;
        self.ctx.push_ui(UiEvent::PhaseChanged(phase));
    }

    /// Applies something another peer published or sent.
    pub fn ingest(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Published { from, value } => {
                let Some(record) = self.ctx.replicator.observe(from, value) else {
                    return;
                };
                if matches!(self.phase, CombatPhase::PlayerTurn | CombatPhase::OpponentTurn) {
                    merge_persistent(&mut self.ctx.entities.opponent_pet, &record.stats);
                    self.ctx.push_ui(UiEvent::EntityChanged(EntityId::OpponentPet));
                }
            }
            Inbound::Message { from, message } => self.handle_message(from, message),
        }
    }

    fn handle_message(&mut self, from: PeerId, message: PeerMessage) {
        if self.phase.is_ended() {
            debug!(%from, ?message, "ignoring a message after the combat ended");
            return;
        }
        debug!(%from, ?message, "message received");

        let ctx = &mut self.ctx;
        match message {
            PeerMessage::ResetOpponentPetEnergy { value } => {
                ctx.mutate_entity(EntityId::LocalPet, |entity| entity.set_energy(value));
            }
            PeerMessage::ApplyStatusToMyPet { status } => {
                ctx.apply_status(EntityId::LocalPet, status);
            }
            PeerMessage::OpponentPlayedCard { cost } => {
                ctx.mutate_entity(EntityId::LocalPet, |entity| entity.consume_energy(cost));
            }
            PeerMessage::ApplyHandCostModifier {
                amount,
                duration,
                count,
            } => {
                let cards = ctx.piles.player_data.hand.clone();
                let applied = ctx
                    .costs
                    .apply_cost_modifier_to_hand(
                        amount,
                        duration,
                        count,
                        Actor::Player,
                        &cards,
                        &mut ctx.rng,
                    )
                    .is_some();
                if applied {
                    ctx.push_ui(UiEvent::HandChanged(Actor::Player));
                }
            }
            PeerMessage::ApplyOpponentPetCardEffect { card_id } => {
                if self.phase == CombatPhase::NotInCombat {
                    warn!(card = %card_id, "pet card effect outside a combat");
                    return;
                }
                let instance = ctx.transient_instance(card_id);
                resolve(ctx, instance, Actor::Pet, EntityId::LocalPlayer);
                if let ControlFlow::Break(outcome) = self.check_defeat() {
                    self.finish(outcome);
                }
            }
        }
    }

    pub fn view(&self) -> CombatView {
        let ctx = &self.ctx;
        let energy = ctx.entity(EntityId::LocalPlayer).energy();
        let piles = ctx.piles(Actor::Player);

        let hand = piles
            .hand
            .iter()
            .enumerate()
            .filter_map(|(index, card)| {
                let descriptor = ctx.library.get(card.card_id)?;
                let effective_cost = ctx.effective_cost(Actor::Player, card)?;
                Some(HandCardView {
                    index,
                    instance: card.instance_id,
                    card_id: card.card_id,
                    name: descriptor.name.clone(),
                    effective_cost,
                    affordable: effective_cost <= energy,
                    targets_opponent: descriptor.is_offensive(),
                })
            })
            .collect();

        CombatView {
            turn: ctx.turn,
            phase: self.phase,
            player: ReplicatedStats::from(ctx.entity(EntityId::LocalPlayer)),
            local_pet: ReplicatedStats::from(ctx.entity(EntityId::LocalPet)),
            opponent_pet: ReplicatedStats::from(ctx.entity(EntityId::OpponentPet)),
            hand,
            pet_hand_size: ctx.piles(Actor::Pet).hand.len(),
            deck_size: piles.deck.len(),
            discard_size: piles.discard.len(),
        }
    }

    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        self.ctx.drain_ui_events()
    }

    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        self.ctx.drain_outbox()
    }
}
