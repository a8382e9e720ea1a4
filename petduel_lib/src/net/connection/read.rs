use crate::net::frames;
use crate::net::frames::InputFrame;
use bytes::{Buf, BytesMut};
use std::io::Cursor;
use std::marker::PhantomData;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Longest line the reader buffers before giving up on it.
pub const MAX_FRAME_LENGTH: usize = 64 * 1024;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Reading from the connection failed: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Received an invalid frame: {0}")]
    ParseError(String),
    #[error("The connection was closed.")]
    ConnectionClosed { is_clean_shutdown: bool },
}

/// Buffers a byte stream and splits it into frames.
pub struct ConnectionReader<TRead, TInput>
where
    TInput: InputFrame,
    TRead: AsyncRead + Unpin,
{
    stream: TRead,
    buffer: BytesMut,
    phantom: PhantomData<TInput>,
}

impl<TRead: AsyncRead + Unpin, TInput: InputFrame> ConnectionReader<TRead, TInput> {
    pub fn new(stream: TRead) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            phantom: Default::default(),
        }
    }

    pub async fn read_frame(&mut self) -> Result<TInput, Error> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(frame);
            }

            // `0` means the remote closed the stream. Leftover bytes mean it did so mid-frame.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return Err(Error::ConnectionClosed {
                    is_clean_shutdown: self.buffer.is_empty(),
                });
            }
        }
    }

    fn parse_frame(&mut self) -> Result<Option<TInput>, Error> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match TInput::parse(&mut buf) {
            Ok(frame) => {
                self.buffer.advance(buf.position() as usize);
                Ok(Some(frame))
            }
            Err(frames::ParseError::Incomplete) if self.buffer.len() > MAX_FRAME_LENGTH => {
                let buffered = self.buffer.len();
                self.buffer.clear();
                Err(Error::ParseError(format!(
                    "no line break within {} bytes ({} buffered)",
                    MAX_FRAME_LENGTH, buffered
                )))
            }
            Err(frames::ParseError::Incomplete) => Ok(None),
            Err(frames::ParseError::InvalidMessage(message)) => {
                // The cursor is already past the broken line.
                self.buffer.advance(buf.position() as usize);
                Err(Error::ParseError(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::frames::{FrameBody, PeerFrame};
    use crate::replication::PeerMessage;
    use crate::rules::PeerId;

    #[tokio::test]
    async fn reads_frames_split_across_writes() {
        let (client, mut server) = tokio::io::duplex(64);
        let mut reader = ConnectionReader::<_, PeerFrame>::new(client);

        let line = serde_json::to_string(&PeerFrame {
            from: PeerId(9),
            body: FrameBody::Message {
                message: PeerMessage::OpponentPlayedCard { cost: 1 },
            },
        })
        .unwrap();
        let (head, tail) = line.split_at(line.len() / 2);

        use tokio::io::AsyncWriteExt;
        server.write_all(head.as_bytes()).await.unwrap();
        let write = async {
            server.write_all(tail.as_bytes()).await.unwrap();
            server.write_all(b"\r\n").await.unwrap();
            drop(server);
        };
        let (frame, _) = tokio::join!(reader.read_frame(), write);

        assert_eq!(frame.unwrap().from, PeerId(9));
        assert!(matches!(
            reader.read_frame().await,
            Err(Error::ConnectionClosed {
                is_clean_shutdown: true
            })
        ));
    }

    #[tokio::test]
    async fn a_broken_line_does_not_poison_the_stream() {
        let (client, mut server) = tokio::io::duplex(256);
        let mut reader = ConnectionReader::<_, PeerFrame>::new(client);

        use tokio::io::AsyncWriteExt;
        server.write_all(b"oops\r\n").await.unwrap();
        let line = serde_json::to_string(&PeerFrame {
            from: PeerId(2),
            body: FrameBody::Message {
                message: PeerMessage::ResetOpponentPetEnergy { value: 3 },
            },
        })
        .unwrap();
        server.write_all(line.as_bytes()).await.unwrap();
        server.write_all(b"\r\n").await.unwrap();

        assert!(matches!(reader.read_frame().await, Err(Error::ParseError(_))));
        assert_eq!(reader.read_frame().await.unwrap().from, PeerId(2));
    }

    #[tokio::test]
    async fn an_endless_line_is_dropped_once_it_outgrows_the_limit() {
        let (client, mut server) = tokio::io::duplex(4096);
        let mut reader = ConnectionReader::<_, PeerFrame>::new(client);

        use tokio::io::AsyncWriteExt;
        let endless = vec![b'x'; MAX_FRAME_LENGTH + 1];
        let (result, _) = tokio::join!(reader.read_frame(), async {
            server.write_all(&endless).await.unwrap();
        });
        assert!(matches!(result, Err(Error::ParseError(_))));

        let line = serde_json::to_string(&PeerFrame {
            from: PeerId(4),
            body: FrameBody::Message {
                message: PeerMessage::OpponentPlayedCard { cost: 2 },
            },
        })
        .unwrap();
        server.write_all(line.as_bytes()).await.unwrap();
        server.write_all(b"\r\n").await.unwrap();
        assert_eq!(reader.read_frame().await.unwrap().from, PeerId(4));
    }
}
