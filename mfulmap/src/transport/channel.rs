// mfulmap-rs/mfulmap/src/transport/channel.rs
//! Bridge from the callback-driven mapping to async card I/O.
//!
//! [`ChannelTransport`] forwards each submitted request into a tokio
//! channel. [`drive`] drains that channel, performs the exchange on an
//! [`AsyncCard`] and feeds the reply back into the map.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::map::NdefMap;
use crate::protocol::Request;
use crate::transport::mock::MockTag;
use crate::transport::traits::Transport;
use crate::{Error, Result};

/// A tag reachable through async I/O (reader task, network relay, ...).
#[async_trait]
pub trait AsyncCard {
    /// Send one request and wait for the tag's answer.
    async fn exchange(&mut self, request: &Request) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: UnboundedSender<Request>,
}

impl ChannelTransport {
    pub fn new(tx: UnboundedSender<Request>) -> Self {
        Self { tx }
    }
}

/// Transport plus the receiving end [`drive`] consumes.
pub fn channel() -> (ChannelTransport, UnboundedReceiver<Request>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTransport::new(tx), rx)
}

impl Transport for ChannelTransport {
    fn transceive(&mut self, request: &Request) -> Result<()> {
        self.tx
            .send(*request)
            .map_err(|_| Error::Transport("request channel closed".into()))
    }
}

/// Run queued exchanges until the map has nothing outstanding. Returns the
/// number of exchanges performed.
pub async fn drive<C>(
    map: &mut NdefMap,
    rx: &mut UnboundedReceiver<Request>,
    card: &mut C,
) -> Result<usize>
where
    C: AsyncCard + Send,
{
    let mut exchanges = 0;
    while let Ok(request) = rx.try_recv() {
        let reply = card.exchange(&request).await;
        map.process(reply)?;
        exchanges += 1;
    }
    Ok(exchanges)
}

#[async_trait]
impl AsyncCard for MockTag {
    async fn exchange(&mut self, request: &Request) -> Result<Vec<u8>> {
        self.submit(request)?;
        self.take_reply()
            .unwrap_or_else(|| Err(Error::Transport("mock tag gave no reply".into())))
    }
}
