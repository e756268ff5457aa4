// mfulmap-rs/mfulmap/src/transport/traits.rs

use crate::Result;
use crate::protocol::Request;

/// Transport trait abstracts the asynchronous transceive primitive away
/// from the mapping logic.
///
/// `transceive` only submits the request and returns. The reply (or the
/// transport failure) is handed back later by calling
/// [`NdefMap::process`](crate::map::NdefMap::process). An `Err` from
/// `transceive` itself means the request was never submitted.
pub trait Transport {
    /// Submit one request to the tag.
    fn transceive(&mut self, request: &Request) -> Result<()>;

    /// Drop any transport-level state tied to the previous tag.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}
