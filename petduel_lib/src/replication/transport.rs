use crate::replication::{EntityRecord, PeerMessage, SharedKey};
use crate::rules::cards::CardId;
use crate::rules::PeerId;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PublishedValue {
    Entity(EntityRecord),
    Shared { key: SharedKey, value: i64 },
    DeckManifest(Vec<CardId>),
}

/// What the combat core wants delivered. Drained from the context by the runtime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Outbound {
    Publish(PublishedValue),
    Send { to: PeerId, message: PeerMessage },
}

/// What arrived from another peer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Inbound {
    Published { from: PeerId, value: PublishedValue },
    Message { from: PeerId, message: PeerMessage },
}

impl Inbound {
    pub fn sender(&self) -> PeerId {
        match self {
            Inbound::Published { from, .. } | Inbound::Message { from, .. } => *from,
        }
    }
}

/// Publish/deliver primitives of the messaging substrate.
pub trait Transport {
    fn publish(&mut self, value: PublishedValue);
    fn send(&mut self, to: PeerId, message: PeerMessage);

    fn deliver(&mut self, outbound: Outbound) {
        match outbound {
            Outbound::Publish(value) => self.publish(value),
            Outbound::Send { to, message } => self.send(to, message),
        }
    }
}
