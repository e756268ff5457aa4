// mfulmap-rs/mfulmap/src/prelude.rs

pub use crate::card::{CapabilityContainer, NdefInfo};
pub use crate::config::MapConfig;
pub use crate::map::{CompletionRoutine, NdefMap, NdefMapBuilder, State};
pub use crate::protocol::{Command, Request};
pub use crate::transport::Transport;
pub use crate::{
    BlockData, CardState, Error, LengthForm, Operation, Progress, RemoteDevice, Result, SeekMode,
};

pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced};
