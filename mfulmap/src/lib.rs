// mfulmap-rs/mfulmap/src/lib.rs

//! mfulmap
//!
//! NDEF mapping for Mifare Ultralight tags (NFC Forum Type 2): checks the
//! Capability Container, locates the NDEF TLV and reads or writes NDEF
//! messages through a callback-driven state machine that works on top of
//! any asynchronous transceive primitive.

pub mod card;
pub mod config;
pub mod constants;
pub mod error;
pub mod map;
pub mod prelude;
pub mod protocol;
#[doc(hidden)]
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`
// and the types in `types` are available to consumers.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
