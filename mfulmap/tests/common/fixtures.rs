// fixtures.rs: tag layouts used across the integration tests

use mfulmap::constants::{TLV_LOCK_CONTROL, TLV_MEMORY_CONTROL, TLV_PROPRIETARY};

/// Size byte of a 48-byte TLV area (MF0ICU1).
pub const SMALL: u8 = 0x06;

/// Size byte of a 2030-byte TLV area spanning two sectors.
pub const LARGE: u8 = 0xFE;

/// Lock Control TLV followed by a Memory Control TLV (10 bytes).
pub fn control_tlvs() -> Vec<u8> {
    vec![
        TLV_LOCK_CONTROL, 0x03, 0xA0, 0x10, 0x44, TLV_MEMORY_CONTROL, 0x03, 0x80, 0x02, 0x22,
    ]
}

/// Lock Control TLV only, leaving the NDEF TLV at an unaligned offset.
pub fn lock_control_tlv() -> Vec<u8> {
    vec![TLV_LOCK_CONTROL, 0x03, 0xA0, 0x10, 0x44]
}

/// Proprietary TLV (3-byte length form) with a `len`-byte value.
pub fn proprietary_tlv(len: usize) -> Vec<u8> {
    let mut tlv = vec![TLV_PROPRIETARY, 0xFF, (len >> 8) as u8, len as u8];
    tlv.extend(std::iter::repeat_n(0x5A, len));
    tlv
}

/// Layouts to run round trips against: NDEF TLV at offset 0, 4, 5, 10
/// and after NULL padding.
pub fn prefixes() -> Vec<Vec<u8>> {
    vec![
        vec![],
        vec![TLV_LOCK_CONTROL, 0x02, 0xA0, 0x10],
        lock_control_tlv(),
        control_tlvs(),
        vec![0x00, 0x00],
    ]
}
