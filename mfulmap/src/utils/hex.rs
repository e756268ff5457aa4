// mfulmap-rs/mfulmap/src/utils/hex.rs
//! Hex formatting for trace logs and tag dumps.

use std::fmt::Write;

use crate::constants::BLOCK_SIZE;

/// Lowercase hex without separators: `[0xe1, 0x10]` -> `"e110"`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{:02x}", b);
        s
    })
}

/// Lowercase hex with one space between bytes: `"e1 10"`.
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// One line per 4-byte block, prefixed with the block number counted from
/// `first_block`: `"04: 03 05 d1 01"`.
pub fn block_dump(bytes: &[u8], first_block: usize) -> String {
    let mut s = String::new();
    for (i, chunk) in bytes.chunks(BLOCK_SIZE).enumerate() {
        if i > 0 {
            s.push('\n');
        }
        let _ = write!(s, "{:02x}: {}", first_block + i, bytes_to_hex_spaced(chunk));
    }
    s
}
