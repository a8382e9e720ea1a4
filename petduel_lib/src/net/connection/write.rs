use crate::net::frames;
use crate::net::frames::OutputFrame;
use std::marker::PhantomData;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Writing to the connection failed: {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    FrameWriteError(#[from] frames::WriteError),
}

pub struct ConnectionWriter<TWrite, TOutput>
where
    TWrite: AsyncWrite + Unpin + Send,
    TOutput: OutputFrame,
{
    stream: TWrite,
    phantom: PhantomData<TOutput>,
}

impl<TWrite: AsyncWrite + Unpin + Send, TOutput: OutputFrame> ConnectionWriter<TWrite, TOutput> {
    pub fn new(stream: TWrite) -> Self {
        Self {
            stream,
            phantom: Default::default(),
        }
    }

    pub async fn write_frame(&mut self, frame: &TOutput) -> Result<(), Error> {
        frame.write_to(&mut self.stream).await?;
        self.stream.flush().await?;

        Ok(())
    }
}
