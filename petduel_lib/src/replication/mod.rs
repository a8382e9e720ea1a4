mod keys;
mod messages;
mod record;
mod replicator;
mod transport;

pub use {
    keys::SharedKey, keys::StatKey, messages::PeerMessage, messages::StatusApplication,
    record::EntityRecord, record::OwnedRole, record::ReplicatedStats, replicator::Replicator,
    replicator::ShadowKnowledge, transport::Inbound, transport::Outbound,
    transport::PublishedValue, transport::Transport,
};

pub(crate) use replicator::{merge_full, merge_persistent};
