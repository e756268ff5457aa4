// mfulmap-rs/mfulmap/src/protocol/commands/write.rs

use crate::Result;
use crate::protocol::frame::CommandBuffer;

/// Encode a 4-byte WRITE payload: address byte followed by the block data.
pub fn encode_write(block: u8, data: &[u8; 4]) -> Result<CommandBuffer> {
    let mut buf = CommandBuffer::new();
    buf.push(block)?;
    buf.extend(data)?;
    Ok(buf)
}
