// mfulmap-rs/mfulmap/src/protocol/commands/read.rs

use crate::Result;
use crate::protocol::frame::CommandBuffer;

/// Encode a READ payload: the start block address only.
pub fn encode_read(block: u8) -> Result<CommandBuffer> {
    let mut buf = CommandBuffer::new();
    buf.push(block)?;
    Ok(buf)
}
