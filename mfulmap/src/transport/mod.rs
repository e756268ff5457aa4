// mfulmap-rs/mfulmap/src/transport/mod.rs

#[cfg(feature = "async")]
pub mod channel;
pub mod mock;
pub mod traits;

#[cfg(feature = "async")]
pub use channel::{AsyncCard, ChannelTransport};
pub use mock::{MockTag, MockTransport};
pub use traits::Transport;
