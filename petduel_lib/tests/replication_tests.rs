//! How a peer's combat reacts to what its opponent publishes and sends.

mod common;

use common::*;
use petduel_lib::replication::{
    EntityRecord, Inbound, Outbound, OwnedRole, PeerMessage, PublishedValue, ReplicatedStats,
    SharedKey, StatusApplication,
};
use petduel_lib::rules::cards::starter::{GUARD, STRIKE};
use petduel_lib::rules::cards::CardId;
use petduel_lib::rules::{Actor, EntityId, PeerId, StatusKind};

fn pet_record(version: u64, stats: ReplicatedStats) -> Inbound {
    Inbound::Published {
        from: OPPONENT,
        value: PublishedValue::Entity(EntityRecord {
            role: OwnedRole::Pet,
            version,
            stats,
        }),
    }
}

#[test]
fn combat_start_recreates_the_opponent_pet_from_its_owner() {
    let mut flow = flow(config(&[STRIKE; 10], &[STRIKE; 6]), library());
    flow.ingest(Inbound::Published {
        from: OPPONENT,
        value: PublishedValue::DeckManifest(ids(&[GUARD; 4])),
    });
    flow.ingest(pet_record(
        3,
        ReplicatedStats {
            health: 12,
            max_health: 30,
            thorns: 2,
            ..Default::default()
        },
    ));

    flow.start_combat();

    let pet = flow.context().entity(EntityId::OpponentPet);
    assert_eq!(pet.current_health(), 12);
    assert_eq!(pet.max_health(), 30);
    assert_eq!(pet.statuses().thorns, 2);
    let pet_hand = &flow.context().piles(Actor::Pet).hand;
    assert_eq!(pet_hand.len(), 3);
    assert!(pet_hand.iter().all(|card| card.card_id == CardId(GUARD)));
}

#[test]
fn in_combat_records_leave_health_alone() {
    let mut flow = started(config(&[STRIKE; 10], &[STRIKE; 6]), library());
    flow.play_card(0, EntityId::OpponentPet).unwrap();
    assert_eq!(flow.context().entity(EntityId::OpponentPet).current_health(), 34);

    flow.ingest(pet_record(
        7,
        ReplicatedStats {
            health: 40,
            max_health: 50,
            strength: 2,
            weak_turns: 1,
            ..Default::default()
        },
    ));

    let pet = flow.context().entity(EntityId::OpponentPet);
    assert_eq!(pet.current_health(), 34);
    assert_eq!(pet.max_health(), 50);
    assert_eq!(pet.statuses().strength, 2);
    assert!(pet.statuses().is_weak());
}

#[test]
fn values_from_other_peers_only_reach_the_overview() {
    let mut flow = started(config(&[STRIKE; 10], &[STRIKE; 6]), library());
    let stranger = PeerId(9);

    flow.ingest(Inbound::Published {
        from: stranger,
        value: PublishedValue::Entity(EntityRecord {
            role: OwnedRole::Pet,
            version: 1,
            stats: ReplicatedStats {
                health: 1,
                max_health: 1,
                ..Default::default()
            },
        }),
    });
    flow.ingest(Inbound::Published {
        from: stranger,
        value: PublishedValue::Shared {
            key: SharedKey::CurrentTurn,
            value: 4,
        },
    });

    assert_eq!(flow.context().entity(EntityId::OpponentPet).max_health(), 40);
    let shadow = flow.context().replicator().shadow();
    assert!(shadow.record.is_none());
    assert_eq!(shadow.overview.get(&(stranger, SharedKey::CurrentTurn)), Some(&4));
}

#[test]
fn status_sent_to_my_pet_is_applied_and_republished() {
    let mut flow = started(config(&[STRIKE; 10], &[STRIKE; 6]), library());
    flow.drain_outbox();

    flow.ingest(Inbound::Message {
        from: OPPONENT,
        message: PeerMessage::ApplyStatusToMyPet {
            status: StatusApplication::Status {
                kind: StatusKind::Weak,
                value: 2,
            },
        },
    });

    assert_eq!(flow.context().entity(EntityId::LocalPet).statuses().weak_turns, 2);
    let republished = flow.drain_outbox().into_iter().any(|outbound| {
        matches!(
            outbound,
            Outbound::Publish(PublishedValue::Entity(EntityRecord {
                role: OwnedRole::Pet,
                stats: ReplicatedStats { weak_turns: 2, .. },
                ..
            }))
        )
    });
    assert!(republished);
}

#[test]
fn energy_messages_drive_my_pet_energy() {
    let mut flow = started(config(&[STRIKE; 10], &[STRIKE; 6]), library());

    flow.ingest(Inbound::Message {
        from: OPPONENT,
        message: PeerMessage::ResetOpponentPetEnergy { value: 3 },
    });
    flow.ingest(Inbound::Message {
        from: OPPONENT,
        message: PeerMessage::OpponentPlayedCard { cost: 2 },
    });

    assert_eq!(flow.context().entity(EntityId::LocalPet).energy(), 1);
}

#[test]
fn cost_modifier_from_the_opponent_binds_to_my_hand() {
    let mut flow = started(config(&[STRIKE; 10], &[STRIKE; 6]), library());

    flow.ingest(Inbound::Message {
        from: OPPONENT,
        message: PeerMessage::ApplyHandCostModifier {
            amount: 1,
            duration: 2,
            count: 2,
        },
    });

    let taxed = flow
        .view()
        .hand
        .iter()
        .filter(|card| card.effective_cost == 2)
        .count();
    assert_eq!(taxed, 2);
}

#[test]
fn opponent_pet_card_effect_hits_the_local_player() {
    let mut flow = started(config(&[GUARD; 10], &[STRIKE; 6]), library());

    flow.ingest(Inbound::Message {
        from: OPPONENT,
        message: PeerMessage::ApplyOpponentPetCardEffect {
            card_id: CardId(STRIKE),
        },
    });

    assert_eq!(flow.context().entity(EntityId::LocalPlayer).current_health(), 24);
}
