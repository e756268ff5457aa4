// mfulmap-rs/mfulmap/src/protocol/mod.rs

pub mod commands;
pub mod crc;
pub mod frame;
pub mod parser;

pub use commands::*;
pub use crc::{crc_a, crc_b};
pub use frame::CommandBuffer;
