use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

#[derive(Error, Debug, PartialEq)]
pub enum RecvError {
    #[error("Channel has been closed.")]
    ChannelClosed,
}

pub struct MessageReceiver<TMessage> {
    message_rx: mpsc::Receiver<TMessage>,
}

impl<TMessage> MessageReceiver<TMessage> {
    pub fn new(message_rx: mpsc::Receiver<TMessage>) -> MessageReceiver<TMessage> {
        MessageReceiver { message_rx }
    }

    pub async fn receive(&mut self) -> Result<TMessage, RecvError> {
        self.message_rx.recv().await.ok_or(RecvError::ChannelClosed)
    }

    /// Returns `Ok(None)` when nothing is queued right now.
    pub fn try_receive(&mut self) -> Result<Option<TMessage>, RecvError> {
        match self.message_rx.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError::ChannelClosed),
        }
    }
}
