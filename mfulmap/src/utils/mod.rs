// mfulmap-rs/mfulmap/src/utils/mod.rs
//! Small helpers shared by logging, the mock tag and the tests.

pub mod hex;

pub use hex::*;
