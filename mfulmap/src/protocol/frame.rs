// mfulmap-rs/mfulmap/src/protocol/frame.rs

use crate::constants::SEND_BUFFER_SIZE;
use crate::protocol::crc::crc_a;
use crate::{Error, Result};

/// Fixed-capacity outgoing command buffer. Every append is bounds checked
/// so command builders never index into raw arrays.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: [u8; SEND_BUFFER_SIZE],
    len: usize,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; SEND_BUFFER_SIZE],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        SEND_BUFFER_SIZE
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Append one byte.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len >= SEND_BUFFER_SIZE {
            return Err(Error::BufferOverflow {
                capacity: SEND_BUFFER_SIZE,
            });
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a slice; nothing is written when it does not fit.
    pub fn extend(&mut self, data: &[u8]) -> Result<()> {
        if self.len + data.len() > SEND_BUFFER_SIZE {
            return Err(Error::BufferOverflow {
                capacity: SEND_BUFFER_SIZE,
            });
        }
        self.bytes[self.len..self.len + data.len()].copy_from_slice(data);
        self.len += data.len();
        Ok(())
    }

    /// Append the CRC-A of everything written after the first `skip` bytes.
    pub fn append_crc_a(&mut self, skip: usize) -> Result<()> {
        let start = skip.min(self.len);
        let crc = crc_a(&self.bytes[start..self.len]);
        self.extend(&crc)
    }
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CommandBuffer[{}]",
            crate::utils::bytes_to_hex_spaced(self.as_slice())
        )
    }
}

impl TryFrom<&[u8]> for CommandBuffer {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let mut buf = Self::new();
        buf.extend(bytes)?;
        Ok(buf)
    }
}
