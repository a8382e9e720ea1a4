pub mod connection;
pub mod frames;

mod message_sender;
pub use {
    message_sender::IntoMessageMap, message_sender::MessageSender,
    message_sender::SendError as MessageSendError,
};

mod message_receiver;
pub use {message_receiver::MessageReceiver, message_receiver::RecvError as MessageRecvError};

pub mod with_send_callback;
