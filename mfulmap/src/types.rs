// mfulmap-rs/mfulmap/src/types.rs

use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// NDEF lifecycle state of the attached tag, derived from the Capability
/// Container and the NDEF TLV length.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardState {
    #[default]
    #[display(fmt = "invalid")]
    Invalid,
    #[display(fmt = "initialized")]
    Initialized,
    #[display(fmt = "read-write")]
    ReadWrite,
    #[display(fmt = "read-only")]
    ReadOnly,
}

impl CardState {
    /// A container with NDEF data that may be read.
    pub fn is_readable(self) -> bool {
        matches!(self, CardState::ReadWrite | CardState::ReadOnly)
    }

    /// A container that accepts writes.
    pub fn is_writable(self) -> bool {
        matches!(self, CardState::Initialized | CardState::ReadWrite)
    }
}

/// Public operation currently (or last) driven by the session.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    #[default]
    #[display(fmt = "none")]
    None,
    #[display(fmt = "check")]
    Check,
    #[display(fmt = "read")]
    Read,
    #[display(fmt = "write")]
    Write,
}

/// Where a read or write starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SeekMode {
    /// Continue from where the previous call of the same kind stopped.
    Current,
    /// Restart from the beginning of the NDEF container.
    Begin,
}

/// Immediate outcome of a public entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A command is outstanding; the completion routine fires later.
    Pending,
    /// Finished without touching the tag. Carries the byte count.
    Complete(usize),
}

/// Encoding of an NDEF TLV length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LengthForm {
    /// One length byte, values 0..=254.
    Short,
    /// 0xFF followed by a big-endian 16-bit length.
    Long,
}

impl LengthForm {
    /// Form required to encode `len`.
    pub fn for_length(len: usize) -> Self {
        if len > crate::constants::TLV_SHORT_LENGTH_MAX {
            LengthForm::Long
        } else {
            LengthForm::Short
        }
    }

    /// Size of the length field in bytes.
    pub fn field_len(self) -> usize {
        match self {
            LengthForm::Short => 1,
            LengthForm::Long => 3,
        }
    }

    /// Encode `len` into the length field bytes.
    pub fn encode(self, len: usize) -> ([u8; 3], usize) {
        match self {
            LengthForm::Short => ([len as u8, 0, 0], 1),
            LengthForm::Long => (
                [
                    crate::constants::TLV_LONG_LENGTH_MARKER,
                    (len >> 8) as u8,
                    (len & 0xff) as u8,
                ],
                3,
            ),
        }
    }
}

/// BlockData: the 16 bytes returned by one READ command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData([u8; 16]);

impl BlockData {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != 16 {
            return Err(Error::InvalidReceiveLength {
                expected: 16,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// Anticollision data of the attached ISO 14443-A target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoteDevice {
    pub atqa: [u8; 2],
    pub sak: u8,
}

impl RemoteDevice {
    /// ATQA/SAK reported by a Mifare Ultralight (0x0044 / 0x00).
    pub const ULTRALIGHT: Self = Self {
        atqa: [0x44, 0x00],
        sak: 0x00,
    };

    pub fn new(atqa: [u8; 2], sak: u8) -> Self {
        Self { atqa, sak }
    }
}
