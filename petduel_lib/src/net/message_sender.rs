use crate::net::connection;
use crate::net::with_send_callback::WithCallback;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

#[derive(Error, Debug, PartialEq)]
pub enum SendError {
    #[error("The outgoing channel has been closed.")]
    ChannelClosed,
    #[error("The outgoing channel is full.")]
    ChannelFull,
}

pub trait MessageSender<TMessage> {
    fn send_message(&self, message: TMessage) -> Result<(), SendError>;
}

pub struct MessageMap<TInnerSender, F> {
    sender: TInnerSender,
    f: F,
}

impl<TInnerSender, F> MessageMap<TInnerSender, F> {
    fn new(sender: TInnerSender, f: F) -> Self {
        Self { sender, f }
    }
}

impl<TMessageIn, TMessageOut, TInnerSender: MessageSender<TMessageOut>, F> MessageSender<TMessageIn>
    for MessageMap<TInnerSender, F>
where
    F: Fn(TMessageIn) -> TMessageOut,
{
    fn send_message(&self, message: TMessageIn) -> Result<(), SendError> {
        self.sender.send_message((self.f)(message))
    }
}

pub trait IntoMessageMap<TM> {
    fn with_map<F>(self, f: F) -> MessageMap<Self, F>
    where
        Self: Sized;
}

impl<T, TM> IntoMessageMap<TM> for T
where
    T: MessageSender<TM>,
{
    fn with_map<F>(self, f: F) -> MessageMap<Self, F>
    where
        Self: Sized,
    {
        MessageMap::new(self, f)
    }
}

/// Non-blocking so the combat loop can send between logic steps without awaiting.
impl<TMessage> MessageSender<TMessage>
    for mpsc::Sender<WithCallback<TMessage, connection::WriteError>>
{
    fn send_message(&self, message: TMessage) -> Result<(), SendError> {
        self.try_send(WithCallback::without_callback(message))
            .map_err(|e| match e {
                TrySendError::Full(_) => SendError::ChannelFull,
                TrySendError::Closed(_) => SendError::ChannelClosed,
            })
    }
}

impl<TMessage, TSender: MessageSender<TMessage>> MessageSender<TMessage> for std::sync::Arc<TSender> {
    fn send_message(&self, message: TMessage) -> Result<(), SendError> {
        (**self).send_message(message)
    }
}
