// mfulmap-rs/mfulmap/src/card/info.rs

use crate::types::{CardState, LengthForm};

/// Snapshot of the NDEF container located by the last check or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NdefInfo {
    pub card_state: CardState,
    /// Usable TLV area in bytes.
    pub memory_size: usize,
    /// Sector holding the first value byte.
    pub sector: u8,
    /// Sector-relative block holding the first value byte.
    pub block: u8,
    /// Offset of the first value byte inside its block.
    pub byte: u8,
    /// Declared NDEF message length.
    pub length: usize,
    pub length_form: LengthForm,
    /// Bytes left in the TLV area after the NDEF value.
    pub free_size: usize,
}

impl NdefInfo {
    /// Largest message the container can hold with the current header.
    pub fn capacity(&self) -> usize {
        self.length + self.free_size
    }
}
