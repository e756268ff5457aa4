// mfulmap-rs/mfulmap/src/protocol/commands/mod.rs

pub mod read;
pub mod sector;
pub mod write;

pub use read::encode_read;
pub use sector::{encode_sector_select_intent, encode_sector_select_target};
pub use write::encode_write;

use crate::Result;
use crate::constants::READ_RESPONSE_LEN;
use crate::protocol::frame::CommandBuffer;

/// Command class handed to the transport. The transport prepends the
/// opcode for `Read`/`Write` and forwards `Raw` frames untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MifareCmd {
    Read,
    Write,
    Raw,
}

/// Low-level Ultralight commands issued by the mapping. New commands
/// should be added here with their encoder in `protocol::commands::<name>.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// READ: returns blocks `block..block + 4`
    Read { block: u8 },
    /// WRITE (4 bytes) to `block`
    Write { block: u8, data: [u8; 4] },
    /// SECTOR_SELECT packet 1
    SectorSelectIntent,
    /// SECTOR_SELECT packet 2
    SectorSelectTarget { sector: u8 },
}

impl Command {
    pub fn mifare_cmd(&self) -> MifareCmd {
        match self {
            Self::Read { .. } => MifareCmd::Read,
            Self::Write { .. } => MifareCmd::Write,
            Self::SectorSelectIntent | Self::SectorSelectTarget { .. } => MifareCmd::Raw,
        }
    }

    /// Number of bytes the tag is expected to answer with.
    pub fn response_len(&self) -> usize {
        match self {
            Self::Read { .. } => READ_RESPONSE_LEN,
            Self::Write { .. } | Self::SectorSelectIntent => 1,
            Self::SectorSelectTarget { .. } => 0,
        }
    }

    /// Encode the command payload.
    pub fn encode(&self) -> Result<CommandBuffer> {
        match self {
            Self::Read { block } => encode_read(*block),
            Self::Write { block, data } => encode_write(*block, data),
            Self::SectorSelectIntent => encode_sector_select_intent(),
            Self::SectorSelectTarget { sector } => encode_sector_select_target(*sector),
        }
    }

    /// Build the transport request for this command.
    pub fn to_request(&self) -> Result<Request> {
        Ok(Request {
            command: *self,
            cmd: self.mifare_cmd(),
            payload: self.encode()?,
            response_len: self.response_len(),
        })
    }
}

/// One transceive request as seen by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub cmd: MifareCmd,
    pub payload: CommandBuffer,
    pub response_len: usize,
}

impl Request {
    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }
}
