use petduel_lib::net::frames::PeerFrame;
use petduel_lib::net::MessageSender;
use petduel_lib::replication::{Outbound, PeerMessage, PublishedValue, Transport};
use petduel_lib::rules::PeerId;
use tracing::warn;

/// Hands frames to the post office. The link is direct, so every message reaches the one
/// remote peer whoever it is addressed to.
pub struct ChannelTransport<TSender> {
    local: PeerId,
    sender: TSender,
}

impl<TSender: MessageSender<PeerFrame>> ChannelTransport<TSender> {
    pub fn new(local: PeerId, sender: TSender) -> Self {
        Self { local, sender }
    }

    fn post(&self, outbound: Outbound) {
        let frame = PeerFrame::from_outbound(self.local, outbound);
        if let Err(err) = self.sender.send_message(frame) {
            warn!(%err, "dropping an outgoing frame");
        }
    }
}

impl<TSender: MessageSender<PeerFrame>> Transport for ChannelTransport<TSender> {
    fn publish(&mut self, value: PublishedValue) {
        self.post(Outbound::Publish(value));
    }

    fn send(&mut self, to: PeerId, message: PeerMessage) {
        self.post(Outbound::Send { to, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petduel_lib::net::connection;
    use petduel_lib::net::with_send_callback::WithCallback;
    use petduel_lib::net::frames::FrameBody;
    use petduel_lib::replication::SharedKey;
    use tokio::sync::mpsc;

    #[test]
    fn outbound_items_become_frames_from_the_local_peer() {
        let (tx, mut rx) = mpsc::channel::<WithCallback<PeerFrame, connection::WriteError>>(4);
        let mut transport = ChannelTransport::new(PeerId(7), tx);

        transport.deliver(Outbound::Publish(PublishedValue::Shared {
            key: SharedKey::OpponentPetHp,
            value: 12,
        }));
        transport.deliver(Outbound::Send {
            to: PeerId(2),
            message: PeerMessage::ResetOpponentPetEnergy { value: 3 },
        });

        let first = rx.try_recv().unwrap().data;
        assert_eq!(first.from, PeerId(7));
        assert!(matches!(first.body, FrameBody::Publish(_)));
        let second = rx.try_recv().unwrap().data;
        assert_eq!(
            second.body,
            FrameBody::Message {
                message: PeerMessage::ResetOpponentPetEnergy { value: 3 }
            }
        );
    }
}
