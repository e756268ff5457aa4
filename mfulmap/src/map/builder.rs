// mfulmap-rs/mfulmap/src/map/builder.rs

use super::{CompletionRoutine, NdefMap};
use crate::config::MapConfig;
use crate::transport::Transport;
use crate::types::{Operation, RemoteDevice};
use crate::{Error, Result};

/// Helper to construct an [`NdefMap`] with optional configuration.
pub struct NdefMapBuilder {
    transport: Option<Box<dyn Transport>>,
    remote: RemoteDevice,
    config: MapConfig,
    completion: Option<CompletionRoutine>,
}

impl NdefMapBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            remote: RemoteDevice::ULTRALIGHT,
            config: MapConfig::default(),
            completion: None,
        }
    }

    /// Provide the transport the mapping submits its commands to.
    pub fn transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Anticollision data of the attached tag. Defaults to an Ultralight.
    pub fn remote_device(mut self, remote: RemoteDevice) -> Self {
        self.remote = remote;
        self
    }

    pub fn config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the completion routine.
    pub fn completion<F>(mut self, routine: F) -> Self
    where
        F: FnMut(Operation, Result<usize>) + 'static,
    {
        self.completion = Some(Box::new(routine));
        self
    }

    /// Consume the builder. A transport is required.
    pub fn build(self) -> Result<NdefMap> {
        let transport = self
            .transport
            .ok_or(Error::InvalidParameter("no transport configured"))?;
        Ok(NdefMap::new(
            transport,
            self.remote,
            self.config,
            self.completion,
        ))
    }
}

impl Default for NdefMapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
