// mfulmap-rs/mfulmap/src/error.rs

use thiserror::Error;

/// Status vocabulary shared by the public entry points, the state handlers
/// and the completion notifier.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("no NDEF support on this tag")]
    NoNdefSupport,

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("invalid receive length: expected {expected}, got {actual}")]
    InvalidReceiveLength { expected: usize, actual: usize },

    #[error("remote device is not a Mifare Ultralight")]
    InvalidRemoteDevice,

    #[error("end of NDEF container reached")]
    EofNdefContainerReached,

    #[error("read failed")]
    ReadFailed,

    #[error("invalid device request")]
    InvalidDeviceRequest,

    #[error("buffer overflow: capacity {capacity} bytes")]
    BufferOverflow { capacity: usize },

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("operation timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// True for failures reported by the transport rather than detected by
    /// the mapping itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Timeout | Error::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
