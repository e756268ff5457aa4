// mfulmap-rs/mfulmap/src/protocol/crc.rs

use crate::constants::{CRC_A_PRESET, CRC_B_PRESET};

/// Feed `data` through the ITU-V.41 register starting from `preset`.
fn update(preset: u16, data: &[u8]) -> u16 {
    data.iter().fold(preset, |crc, &byte| {
        let mut ch = byte ^ (crc & 0x00ff) as u8;
        ch ^= ch << 4;
        let ch = ch as u16;
        (crc >> 8) ^ (ch << 8) ^ (ch << 3) ^ (ch >> 4)
    })
}

/// Compute the ISO/IEC 14443-3 Type A CRC over `data`.
/// Returns the two transmit bytes, least significant first.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    update(CRC_A_PRESET, data).to_le_bytes()
}

/// Same register preset to 0xFFFF (ISO/IEC 13239). The result is not
/// complemented, so this is not the Type B frame CRC; a frame carrying it
/// checks to a zero residue like CRC-A. Not used by the Ultralight commands.
pub fn crc_b(data: &[u8]) -> [u8; 2] {
    update(CRC_B_PRESET, data).to_le_bytes()
}
