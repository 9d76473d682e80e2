use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{ProtocolError, Result};
use crate::message::BridgeMessage;

/// Default maximum message size: 16MB (configurable via max_message_size)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Extension trait for byte streams to read/write BridgeMessages
///
/// Format: [4 bytes big-endian length][bincode message bytes]
pub trait BridgeStream {
    /// Read a BridgeMessage with the default max size
    async fn read_message(&mut self) -> Result<BridgeMessage>;

    /// Read a BridgeMessage, rejecting frames above `max_size`
    async fn read_message_with_max_size(&mut self, max_size: usize) -> Result<BridgeMessage>;

    /// Write a BridgeMessage with the default max size
    async fn write_message(&mut self, message: &BridgeMessage) -> Result<()>;

    /// Write a BridgeMessage, refusing to send frames above `max_size`
    async fn write_message_with_max_size(&mut self, message: &BridgeMessage, max_size: usize) -> Result<()>;
}

impl<S> BridgeStream for S
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_message(&mut self) -> Result<BridgeMessage> {
        self.read_message_with_max_size(DEFAULT_MAX_MESSAGE_SIZE).await
    }

    async fn read_message_with_max_size(&mut self, max_size: usize) -> Result<BridgeMessage> {
        // A peer that hangs up between frames is a normal close, not an IO failure
        let len = match self.read_u32().await {
            Ok(len) => len as usize,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtocolError::ConnectionClosed);
            }
            Err(e) => return Err(e.into()),
        };

        if len > max_size {
            return Err(ProtocolError::MessageTooLarge(len, max_size));
        }

        if len == 0 {
            return Err(ProtocolError::ConnectionClosed);
        }

        let mut buffer = vec![0u8; len];
        self.read_exact(&mut buffer).await?;

        BridgeMessage::from_bytes(&buffer).map_err(Into::into)
    }

    async fn write_message(&mut self, message: &BridgeMessage) -> Result<()> {
        self.write_message_with_max_size(message, DEFAULT_MAX_MESSAGE_SIZE).await
    }

    async fn write_message_with_max_size(&mut self, message: &BridgeMessage, max_size: usize) -> Result<()> {
        let data = message.to_bytes()?;

        if data.len() > max_size {
            return Err(ProtocolError::MessageTooLarge(data.len(), max_size));
        }

        self.write_u32(data.len() as u32).await?;
        self.write_all(&data).await?;

        // Request/response traffic: flush every frame
        self.flush().await?;

        Ok(())
    }
}
