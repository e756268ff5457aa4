// mfulmap-rs/mfulmap/src/card/mod.rs
//! Tag-level metadata: the Capability Container, the static lock bytes and
//! the card state rules shared by every operation.

use crate::constants::{
    CC_ACCESS_READ_ONLY, CC_ACCESS_READ_WRITE, CC_MAGIC, LOCK_BYTE2_MAX_UNLOCKED, RESERVED_BYTES,
    RESERVED_SIZE_THRESHOLD,
};
use crate::protocol::parser;
use crate::types::{BlockData, CardState};
use crate::{Error, Result};

mod info;
pub mod tool;

pub use info::NdefInfo;
pub use tool::{check_spec_version, set_card_state};

/// Capability Container (block 3): `[magic, version, size / 8, access]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapabilityContainer {
    pub magic: u8,
    pub version: u8,
    pub size: u8,
    pub access: u8,
}

impl CapabilityContainer {
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            magic: bytes[0],
            version: bytes[1],
            size: bytes[2],
            access: bytes[3],
        }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.magic, self.version, self.size, self.access]
    }

    /// Card state implied by the access byte alone.
    pub fn access_state(&self) -> CardState {
        match self.access {
            CC_ACCESS_READ_WRITE => CardState::Initialized,
            CC_ACCESS_READ_ONLY => CardState::ReadOnly,
            _ => CardState::Invalid,
        }
    }

    /// Usable TLV area in bytes.
    pub fn memory_size(&self) -> usize {
        let size = self.size as usize * 8;
        if size > RESERVED_SIZE_THRESHOLD {
            size - RESERVED_BYTES
        } else {
            size
        }
    }
}

impl TryFrom<&[u8]> for CapabilityContainer {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 4 {
            return Err(Error::InvalidLength {
                expected: 4,
                actual: bytes.len(),
            });
        }
        Ok(Self::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Static lock bytes (bytes 2 and 3 of block 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockBytes(pub [u8; 2]);

impl LockBytes {
    /// Any page beyond the OTP/CC lock bits is locked.
    pub fn is_locked(&self) -> bool {
        self.0[0] > LOCK_BYTE2_MAX_UNLOCKED || self.0[1] != 0
    }
}

/// Outcome of a successful compliance check on the CC read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compliance {
    pub cc: CapabilityContainer,
    pub state: CardState,
    pub memory_size: usize,
}

/// Validate the CC read reply. With `lock_bits_check` the reply starts at
/// block 2 so the lock bytes precede the CC.
pub fn check_compliance(reply: &BlockData, lock_bits_check: bool) -> Result<Compliance> {
    let bytes = reply.as_bytes();
    let (cc_offset, locked) = if lock_bits_check {
        let lock = parser::slice_at(bytes, 2, 2)?;
        (4, LockBytes([lock[0], lock[1]]).is_locked())
    } else {
        (0, false)
    };
    let cc = CapabilityContainer::try_from(parser::slice_at(bytes, cc_offset, 4)?)?;

    let mut state = cc.access_state();
    if locked && state != CardState::Invalid {
        state = CardState::ReadOnly;
    }

    if cc.magic != CC_MAGIC || state == CardState::Invalid {
        log::warn!(
            "capability container rejected: {}",
            crate::utils::bytes_to_hex_spaced(&cc.to_bytes())
        );
        return Err(Error::NoNdefSupport);
    }
    check_spec_version(cc.version)?;

    Ok(Compliance {
        cc,
        state,
        memory_size: cc.memory_size(),
    })
}
