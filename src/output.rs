use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use cirrus_models::Envelope;
use exn::ResultExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Final destination of a run's envelopes.
#[async_trait]
pub trait Sink: Send {
    async fn write(&mut self, envelope: &Envelope) -> Result<()>;

    /// Called once, after the last envelope.
    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps every envelope in memory.
#[async_trait]
impl Sink for Vec<Envelope> {
    async fn write(&mut self, envelope: &Envelope) -> Result<()> {
        self.push(envelope.clone());
        Ok(())
    }
}

/// Writes one JSON envelope per line.
pub struct JsonLinesSink<W> {
    writer: W,
    line: Vec<u8>,
}

impl<W> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, line: Vec::new() }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Sink for JsonLinesSink<W> {
    async fn write(&mut self, envelope: &Envelope) -> Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, envelope).or_raise(|| ErrorKind::Sink)?;
        self.line.push(b'\n');
        self.writer.write_all(&self.line).await.or_raise(|| ErrorKind::Io)
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer.flush().await.or_raise(|| ErrorKind::Io)
    }
}
