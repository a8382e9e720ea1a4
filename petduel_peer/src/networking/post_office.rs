use crate::networking::{PeerConnectionReader, PeerConnectionWriter};
use petduel_lib::net::connection;
use petduel_lib::net::frames::PeerFrame;
use petduel_lib::net::with_send_callback::WithCallback;
use petduel_lib::replication::Inbound;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ReceivePostsError {
    #[error("The inbound channel has been closed.")]
    ChannelSendError,
    #[error("Failed to read a frame: {0}")]
    FrameReadError(#[from] connection::ReadError),
}

/// Forwards every frame read from the remote peer until the connection closes.
/// Unparsable lines are skipped.
pub async fn receive_posts<TRead: AsyncRead + Unpin>(
    mut reader: PeerConnectionReader<TRead>,
    inbound_tx: mpsc::Sender<Inbound>,
) -> Result<(), ReceivePostsError> {
    loop {
        match reader.read_frame().await {
            Ok(frame) => {
                debug!(from = %frame.from, "frame received");
                inbound_tx
                    .send(frame.into_inbound())
                    .await
                    .map_err(|_| ReceivePostsError::ChannelSendError)?;
            }
            Err(connection::ReadError::ParseError(message)) => {
                warn!(%message, "skipping an invalid frame");
            }
            Err(connection::ReadError::ConnectionClosed { is_clean_shutdown }) => {
                info!(is_clean_shutdown, "the remote peer closed the connection");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn handle_send_requests<TWrite: AsyncWrite + Unpin + Send>(
    mut mailbox: mpsc::Receiver<WithCallback<PeerFrame, connection::WriteError>>,
    mut writer: PeerConnectionWriter<TWrite>,
) {
    while let Some(request) = mailbox.recv().await {
        let res = writer.write_frame(&request.data).await;
        if let Err(err) = &res {
            warn!(%err, "failed to write a frame");
        }
        WithCallback::<PeerFrame, connection::WriteError>::complete(request.callback, res);
    }

    debug!("'handle_send_requests' has ended.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use petduel_lib::net::frames::FrameBody;
    use petduel_lib::replication::{PeerMessage, SharedKey};
    use petduel_lib::replication::PublishedValue;
    use petduel_lib::rules::PeerId;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn frames_travel_between_two_post_offices() {
        let (left, right) = tokio::io::duplex(1024);
        let (_, left_write) = tokio::io::split(left);
        let (right_read, _right_write) = tokio::io::split(right);

        let (mailbox_tx, mailbox_rx) = mpsc::channel(4);
        let (inbound_tx, mut inbound_rx) = mpsc::channel(4);
        tokio::spawn(handle_send_requests(
            mailbox_rx,
            PeerConnectionWriter::new(left_write),
        ));
        tokio::spawn(receive_posts(
            PeerConnectionReader::new(right_read),
            inbound_tx,
        ));

        let (callback_tx, callback_rx) = oneshot::channel();
        let frame = PeerFrame {
            from: PeerId(3),
            body: FrameBody::Publish(PublishedValue::Shared {
                key: SharedKey::CurrentTurn,
                value: 2,
            }),
        };
        mailbox_tx
            .send(WithCallback::new(callback_tx, frame.clone()))
            .await
            .unwrap();
        assert!(callback_rx.await.unwrap().is_ok());
        assert_eq!(inbound_rx.recv().await.unwrap(), frame.into_inbound());

        let message = PeerFrame {
            from: PeerId(3),
            body: FrameBody::Message {
                message: PeerMessage::ResetOpponentPetEnergy { value: 3 },
            },
        };
        mailbox_tx
            .send(WithCallback::without_callback(message.clone()))
            .await
            .unwrap();
        assert_eq!(inbound_rx.recv().await.unwrap(), message.into_inbound());
    }
}
