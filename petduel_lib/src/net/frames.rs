use crate::replication::{Inbound, Outbound, PeerMessage, PublishedValue};
use crate::rules::PeerId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::string::FromUtf8Error;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum ParseError {
    /// Not enough data is buffered to parse a frame.
    #[error("Incomplete frame.")]
    Incomplete,
    #[error("Invalid frame: {0}")]
    InvalidMessage(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidMessage(err.to_string())
    }
}

impl From<FromUtf8Error> for ParseError {
    fn from(err: FromUtf8Error) -> Self {
        Self::InvalidMessage(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Writing a frame failed: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Serializing a frame failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[async_trait]
pub trait OutputFrame {
    async fn write_to(
        &self,
        writer: &mut (impl AsyncWriteExt + Unpin + Send),
    ) -> Result<(), WriteError>;
}

pub trait InputFrame {
    fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, ParseError>
    where
        Self: Sized;
}

pub trait Frame: OutputFrame + InputFrame {}
impl<T> Frame for T where T: OutputFrame + InputFrame {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum FrameBody {
    Publish(PublishedValue),
    Message { message: PeerMessage },
}

/// Everything two peers say to each other travels as one of these, one JSON line each.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PeerFrame {
    pub from: PeerId,
    pub body: FrameBody,
}

impl PeerFrame {
    /// On a direct link a send reaches the single remote peer, so the addressee is dropped.
    pub fn from_outbound(from: PeerId, outbound: Outbound) -> Self {
        let body = match outbound {
            Outbound::Publish(value) => FrameBody::Publish(value),
            Outbound::Send { message, .. } => FrameBody::Message { message },
        };
        Self { from, body }
    }

    pub fn into_inbound(self) -> Inbound {
        match self.body {
            FrameBody::Publish(value) => Inbound::Published {
                from: self.from,
                value,
            },
            FrameBody::Message { message } => Inbound::Message {
                from: self.from,
                message,
            },
        }
    }
}

#[async_trait]
impl OutputFrame for PeerFrame {
    async fn write_to(
        &self,
        writer: &mut (impl AsyncWriteExt + Unpin + Send),
    ) -> Result<(), WriteError> {
        write_serialized(writer, &self).await
    }
}

impl InputFrame for PeerFrame {
    fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, ParseError> {
        parse::<Self>(src)
    }
}

fn parse<T: for<'a> Deserialize<'a>>(src: &mut Cursor<&[u8]>) -> Result<T, ParseError> {
    let line = get_line(src)?.to_vec();
    let str = String::from_utf8(line)?;
    let deserialized = serde_json::from_str::<T>(&str)?;
    Ok(deserialized)
}

async fn write_serialized(
    writer: &mut (impl AsyncWriteExt + Unpin),
    data: impl Serialize,
) -> Result<(), WriteError> {
    let serialized = serde_json::to_string(&data)?;
    writer.write_all(serialized.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    Ok(())
}

fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], ParseError> {
    let start = src.position() as usize;
    let buf = *src.get_ref();

    // A line needs at least the `\r\n` terminator after the start.
    if buf.len() < start + 2 {
        return Err(ParseError::Incomplete);
    }

    for i in start..buf.len() - 1 {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            src.set_position((i + 2) as u64);
            return Ok(&buf[start..i]);
        }
    }

    Err(ParseError::Incomplete)
}
