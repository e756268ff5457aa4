// mfulmap-rs/mfulmap/src/card/tool.rs
//! Version and card-state rules used by the NDEF mappings.

use crate::constants::MAPPING_MAJOR_VERSION;
use crate::types::CardState;
use crate::{Error, Result};

/// Validate the CC mapping version byte (`major << 4 | minor`).
pub fn check_spec_version(version: u8) -> Result<()> {
    if version == 0 {
        return Err(Error::InvalidFormat("mapping version 0".into()));
    }
    let major = version >> 4;
    if major != MAPPING_MAJOR_VERSION {
        return Err(Error::InvalidFormat(format!(
            "unsupported mapping version {}.{}",
            major,
            version & 0x0f
        )));
    }
    Ok(())
}

/// Derive the card state after parsing an NDEF TLV of length `len`.
///
/// A zero length means an empty container: Initialized, unless the tag is
/// read-only or already invalid. A non-zero length promotes Initialized to
/// ReadWrite and leaves ReadOnly/ReadWrite unchanged. Invalid is sticky and
/// reported as `NoNdefSupport`.
pub fn set_card_state(current: CardState, len: usize) -> Result<CardState> {
    let next = match (current, len) {
        (CardState::Invalid, _) => CardState::Invalid,
        (CardState::ReadOnly, 0) => CardState::Invalid,
        (_, 0) => CardState::Initialized,
        (CardState::ReadOnly, _) => CardState::ReadOnly,
        (CardState::Initialized | CardState::ReadWrite, _) => CardState::ReadWrite,
    };
    if next == CardState::Invalid {
        return Err(Error::NoNdefSupport);
    }
    Ok(next)
}
