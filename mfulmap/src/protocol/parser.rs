// mfulmap-rs/mfulmap/src/protocol/parser.rs

use crate::constants::{ACK, READ_RESPONSE_LEN};
use crate::types::BlockData;
use crate::{Error, Result};

/// Ensure the reply has exactly `expected` bytes.
pub fn ensure_exact_len(data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(Error::InvalidReceiveLength {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    if data.len() < idx + len {
        return Err(Error::InvalidLength {
            expected: idx + len,
            actual: data.len(),
        });
    }
    Ok(&data[idx..idx + len])
}

/// Read a single byte at `idx` with bounds checking.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    Ok(slice_at(data, idx, 1)?[0])
}

/// Parse a READ reply into its 16 bytes.
pub fn read_block(data: &[u8]) -> Result<BlockData> {
    ensure_exact_len(data, READ_RESPONSE_LEN)?;
    BlockData::try_from(data)
}

/// Check a one byte positive acknowledgement.
pub fn expect_ack(data: &[u8]) -> Result<()> {
    ensure_exact_len(data, 1)?;
    let actual = byte_at(data, 0)?;
    if actual != ACK {
        return Err(Error::InvalidFormat(format!(
            "expected ack {:#04x}, got {:#04x}",
            ACK, actual
        )));
    }
    Ok(())
}
