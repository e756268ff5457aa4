// mfulmap-rs/mfulmap/src/map/address.rs
//! Offsets inside the TLV area are counted from block 4 of sector 0. The
//! helpers here turn them into sector/block/byte coordinates.

use crate::constants::{BLOCK_SIZE, DATA_AREA_START, READ_RESPONSE_LEN, SECTOR_SIZE};

/// Physical location of a TLV-area byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagAddress {
    pub sector: u8,
    /// Sector-relative block number.
    pub block: u8,
    /// Byte inside the block.
    pub byte: u8,
}

impl TagAddress {
    pub fn of(offset: usize) -> Self {
        let absolute = DATA_AREA_START + offset;
        let in_sector = absolute % SECTOR_SIZE;
        Self {
            sector: (absolute / SECTOR_SIZE) as u8,
            block: (in_sector / BLOCK_SIZE) as u8,
            byte: (in_sector % BLOCK_SIZE) as u8,
        }
    }
}

/// Start of the 16-byte read window containing `offset`. Windows never
/// straddle a sector.
pub fn window_start(offset: usize) -> usize {
    offset - offset % READ_RESPONSE_LEN
}

/// Start of the block containing `offset`.
pub fn block_start(offset: usize) -> usize {
    offset - offset % BLOCK_SIZE
}
