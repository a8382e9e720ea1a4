use petduel_lib::net::MessageReceiver;
use petduel_lib::players::{PlayerAction, PlayerAgent};
use petduel_lib::replication::{Inbound, Transport};
use petduel_lib::rules::{CombatOutcome, CombatPhase, OpponentStep, TurnFlow};
use std::time::Duration;
use tracing::{debug, info, warn};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one combat on this peer: feeds inbound traffic into the turn flow, asks the agent
/// for player actions, paces the opponent pet and flushes the outbox after every step.
pub struct Session<TTransport> {
    flow: TurnFlow,
    agent: Box<dyn PlayerAgent + Send>,
    transport: TTransport,
    inbound: MessageReceiver<Inbound>,
    pet_delay: Duration,
}

impl<TTransport: Transport> Session<TTransport> {
    pub fn new(
        flow: TurnFlow,
        agent: Box<dyn PlayerAgent + Send>,
        transport: TTransport,
        inbound: MessageReceiver<Inbound>,
        pet_delay: Duration,
    ) -> Self {
        Self {
            flow,
            agent,
            transport,
            inbound,
            pet_delay,
        }
    }

    pub async fn run(mut self) -> CombatOutcome {
        self.handshake().await;
        self.flow.start_combat();
        self.flush();

        loop {
            self.drain_inbound();
            match self.flow.phase() {
                CombatPhase::PlayerTurn => self.player_step().await,
                CombatPhase::OpponentTurn => self.opponent_step().await,
                CombatPhase::CombatEnded(outcome) => {
                    self.flush();
                    return outcome;
                }
                CombatPhase::NotInCombat => {
                    warn!("combat did not start");
                    self.flow.end_combat();
                }
            }
            self.flush();
        }
    }

    /// Announces this peer and waits until the opponent's pet record and deck manifest are
    /// known, or the timeout passes.
    async fn handshake(&mut self) {
        self.flow.context_mut().announce();
        self.flush();

        let deadline = tokio::time::sleep(HANDSHAKE_TIMEOUT);
        tokio::pin!(deadline);

        while !self.knows_opponent() {
            tokio::select! {
                inbound = self.inbound.receive() => match inbound {
                    Ok(inbound) => self.accept(inbound),
                    Err(err) => {
                        warn!(%err, "connection lost during the handshake");
                        return;
                    }
                },
                _ = &mut deadline => {
                    warn!("the opponent did not announce itself in time, starting with fallbacks");
                    return;
                }
            }
        }
        info!("opponent pet known, starting combat");
    }

    fn knows_opponent(&self) -> bool {
        let shadow = self.flow.context().replicator().shadow();
        shadow.record.is_some() && shadow.deck_manifest.is_some()
    }

    /// The first peer heard from becomes the opponent.
    fn accept(&mut self, inbound: Inbound) {
        let from = inbound.sender();
        let replicator = self.flow.context_mut().replicator_mut();
        if replicator.opponent_peer().is_none() {
            info!(%from, "opponent peer resolved");
            replicator.set_opponent_peer(from);
        }
        self.flow.ingest(inbound);
    }

    fn drain_inbound(&mut self) {
        loop {
            match self.inbound.try_receive() {
                Ok(Some(inbound)) => self.accept(inbound),
                Ok(None) => break,
                Err(err) => {
                    if !self.flow.phase().is_ended() {
                        warn!(%err, "opponent disconnected, aborting combat");
                        self.flow.end_combat();
                    }
                    break;
                }
            }
        }
    }

    async fn player_step(&mut self) {
        let view = self.flow.view();
        match self.agent.choose_action(&view).await {
            PlayerAction::PlayCard { hand_index, target } => {
                if let Err(rejected) = self.flow.play_card(hand_index, target) {
                    warn!(%rejected, "play rejected, ending the turn");
                    self.flow.end_player_turn();
                }
            }
            PlayerAction::EndTurn => self.flow.end_player_turn(),
        }
    }

    async fn opponent_step(&mut self) {
        if let OpponentStep::Played { card, cost, .. } = self.flow.step_opponent_turn() {
            info!(card = %card.card_id, cost, "the opponent's pet played a card");
            self.flush();
            tokio::time::sleep(self.pet_delay).await;
        }
    }

    fn flush(&mut self) {
        for event in self.flow.drain_ui_events() {
            debug!(?event, "ui event");
            self.agent.notify_event(&event);
        }
        for outbound in self.flow.drain_outbox() {
            self.transport.deliver(outbound);
        }
    }
}
