// mfulmap-rs/mfulmap/src/protocol/commands/sector.rs
//! SECTOR_SELECT is a two packet exchange sent as raw frames. Both packets
//! carry a two byte raw header that is excluded from the CRC.

use crate::Result;
use crate::constants::{RAW_HEADER, SECTOR_SELECT_CMD};
use crate::protocol::frame::CommandBuffer;

/// Packet 1: `[00 00 C2 FF] + CRC-A(C2 FF)`.
pub fn encode_sector_select_intent() -> Result<CommandBuffer> {
    let mut buf = CommandBuffer::new();
    buf.extend(&RAW_HEADER)?;
    buf.extend(&SECTOR_SELECT_CMD)?;
    buf.append_crc_a(RAW_HEADER.len())?;
    Ok(buf)
}

/// Packet 2: `[00 00 sector 00 00 00] + CRC-A(sector 00 00 00)`.
pub fn encode_sector_select_target(sector: u8) -> Result<CommandBuffer> {
    let mut buf = CommandBuffer::new();
    buf.extend(&RAW_HEADER)?;
    buf.extend(&[sector, 0x00, 0x00, 0x00])?;
    buf.append_crc_a(RAW_HEADER.len())?;
    Ok(buf)
}
