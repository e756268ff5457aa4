// mfulmap-rs/mfulmap/src/map/mod.rs
//! NDEF mapping session for Mifare Ultralight tags.
//!
//! [`NdefMap`] owns one tag session. Every public operation validates its
//! arguments, submits the first command through the [`Transport`] and
//! returns [`Progress::Pending`]. Each reply is fed back through
//! [`NdefMap::process`], which dispatches on the recorded [`State`] and
//! either submits the next command or finishes the operation by invoking
//! the completion routine exactly once.

mod address;
mod builder;
mod check;
mod read;
mod scanner;
mod sector;
pub mod state;
mod write;

pub use address::{TagAddress, block_start, window_start};
pub use builder::NdefMapBuilder;
pub use read::ReadBuffer;
pub use scanner::{Scan, TlvLocation, TlvScanner};
pub use state::{Resume, SelectPhase, State};

use crate::card::NdefInfo;
use crate::config::MapConfig;
use crate::transport::Transport;
use crate::types::{CardState, LengthForm, Operation, Progress, RemoteDevice, SeekMode};
use crate::utils::bytes_to_hex_spaced;
use crate::{Error, Result};

use read::ReadSession;
use write::WriteSession;

/// Callback invoked once per asynchronous operation with the operation and
/// its outcome (a byte count on success).
pub type CompletionRoutine = Box<dyn FnMut(Operation, Result<usize>)>;

pub struct NdefMap {
    transport: Box<dyn Transport>,
    remote: RemoteDevice,
    config: MapConfig,
    completion: Option<CompletionRoutine>,

    state: State,
    operation: Operation,
    card_state: CardState,
    memory_size: usize,
    /// Sector the tag has selected; `None` after a select failed midway.
    current_sector: Option<u8>,
    /// TLV offset of the outstanding read window.
    window: usize,

    scanner: TlvScanner,
    tlv: Option<TlvLocation>,
    read: ReadSession,
    write: WriteSession,
}

impl NdefMap {
    pub fn builder() -> NdefMapBuilder {
        NdefMapBuilder::new()
    }

    pub(crate) fn new(
        transport: Box<dyn Transport>,
        remote: RemoteDevice,
        config: MapConfig,
        completion: Option<CompletionRoutine>,
    ) -> Self {
        Self {
            transport,
            remote,
            config,
            completion,
            state: State::Idle,
            operation: Operation::None,
            card_state: CardState::Invalid,
            memory_size: 0,
            current_sector: Some(0),
            window: 0,
            scanner: TlvScanner::new(0),
            tlv: None,
            read: ReadSession::default(),
            write: WriteSession::default(),
        }
    }

    /// Register or replace the completion routine.
    pub fn set_completion_routine<F>(&mut self, routine: F)
    where
        F: FnMut(Operation, Result<usize>) + 'static,
    {
        self.completion = Some(Box::new(routine));
    }

    /// Point the session at a newly activated tag.
    pub fn set_remote_device(&mut self, remote: RemoteDevice) {
        self.remote = remote;
    }

    /// Return to Idle with every cursor, buffer and the card state
    /// defaulted. Transport, configuration and completion routine stay.
    pub fn reset(&mut self) -> Result<()> {
        log::debug!("resetting mapping session");
        self.state = State::Idle;
        self.operation = Operation::None;
        self.card_state = CardState::Invalid;
        self.memory_size = 0;
        self.current_sector = Some(0);
        self.window = 0;
        self.scanner = TlvScanner::new(0);
        self.tlv = None;
        self.read = ReadSession::default();
        self.write = WriteSession::default();
        self.transport.reset()
    }

    /// Validate the Capability Container and locate the NDEF TLV. The
    /// completion value is the declared NDEF message length.
    pub fn check_ndef(&mut self) -> Result<Progress> {
        self.ensure_idle()?;
        if !self.config.accepts_atqa(self.remote.atqa) {
            log::warn!(
                "ATQA {} is not a Mifare Ultralight",
                bytes_to_hex_spaced(&self.remote.atqa)
            );
            return Err(Error::InvalidRemoteDevice);
        }
        self.ensure_completion()?;
        log::debug!("check_ndef");

        self.operation = Operation::Check;
        self.read.located = false;
        self.kick_off(|map| map.ensure_sector(0, Resume::Check))
    }

    /// Read up to `capacity` bytes of the NDEF message. The bytes are
    /// available through [`read_data`](Self::read_data) once the operation
    /// completes.
    pub fn read_ndef(&mut self, capacity: usize, seek: SeekMode) -> Result<Progress> {
        self.ensure_idle()?;
        if capacity == 0 {
            return Err(Error::InvalidParameter("read capacity is zero"));
        }
        self.ensure_completion()?;
        if !self.card_state.is_readable() {
            return Err(Error::InvalidParameter("card holds no readable NDEF message"));
        }

        let begin =
            seek == SeekMode::Begin || self.operation != Operation::Read || !self.read.located;
        if !begin && self.read.complete {
            return Err(Error::EofNdefContainerReached);
        }
        log::debug!("read_ndef: capacity {}, {:?}", capacity, seek);

        self.operation = Operation::Read;
        self.read.start_call(capacity);
        if begin {
            self.read.located = false;
            self.read.complete = false;
            self.read.staged.clear();
            self.kick_off(|map| map.begin_scan())
        } else {
            self.kick_off(|map| map.continue_read())
        }
    }

    /// Write `data` as the NDEF message (`Begin`) or append it to the
    /// message written by the previous call (`Current`). The completion
    /// value is the number of bytes of `data` written.
    pub fn write_ndef(&mut self, data: &[u8], seek: SeekMode) -> Result<Progress> {
        self.ensure_idle()?;
        if data.is_empty() {
            return Err(Error::InvalidParameter("write data is empty"));
        }
        self.ensure_completion()?;
        if !self.card_state.is_writable() {
            return Err(Error::InvalidParameter("card is not writable"));
        }
        let tlv = self
            .tlv
            .ok_or(Error::InvalidParameter("NDEF TLV not located, check the tag first"))?;

        let begin =
            seek == SeekMode::Begin || self.operation != Operation::Write || !self.write.started;
        if !begin {
            if self.write.complete {
                return Err(Error::EofNdefContainerReached);
            }
            if self.write.form == LengthForm::Short
                && self.write.total + data.len() > crate::constants::TLV_SHORT_LENGTH_MAX
            {
                return Err(Error::InvalidParameter(
                    "append would outgrow the 1-byte length field",
                ));
            }
        }
        log::debug!("write_ndef: {} bytes, {:?}", data.len(), seek);

        self.operation = Operation::Write;
        self.write.bytes_written = 0;
        if begin {
            self.kick_off(|map| map.begin_write(tlv, data))
        } else {
            self.kick_off(|map| map.continue_write(data))
        }
    }

    /// Feed the reply (or transport failure) of the outstanding command.
    ///
    /// Returns `InvalidDeviceRequest` without touching the completion
    /// routine when no command is outstanding.
    pub fn process(&mut self, reply: Result<Vec<u8>>) -> Result<()> {
        if self.state == State::Idle {
            log::warn!("reply received with no command outstanding");
            return Err(Error::InvalidDeviceRequest);
        }
        let progress = match reply {
            Ok(bytes) => {
                log::trace!("<- {:?} [{}]", self.state, bytes_to_hex_spaced(&bytes));
                self.dispatch(&bytes)
            }
            Err(e) => Err(e),
        };
        match progress {
            Ok(Progress::Pending) => {}
            Ok(Progress::Complete(n)) => self.complete(Ok(n)),
            Err(e) => self.complete(Err(e)),
        }
        Ok(())
    }

    fn dispatch(&mut self, reply: &[u8]) -> Result<Progress> {
        match self.state {
            State::Idle => Err(Error::InvalidDeviceRequest),
            State::CheckCompliance => self.on_check_compliance(reply),
            State::FindTlv => self.on_find_tlv(reply),
            State::SelectSector {
                phase,
                sector,
                resume,
            } => self.on_select_sector(phase, sector, resume, reply),
            State::Read => self.on_read(reply),
            State::WriteReadBack => self.on_write_read_back(reply),
            State::Write => self.on_block_written(reply),
            State::WriteTerminator => self.on_terminator_written(reply),
            State::UpdateLength => self.on_length_written(reply),
        }
    }

    /// Completion notifier: back to Idle, then one callback.
    fn complete(&mut self, result: Result<usize>) {
        match &result {
            Ok(n) => log::debug!("{} complete: {}", self.operation, n),
            Err(e) => self.abort(e),
        }
        self.state = State::Idle;
        if let Some(routine) = self.completion.as_mut() {
            routine(self.operation, result);
        }
    }

    /// Session cleanup after a failed operation.
    fn abort(&mut self, err: &Error) {
        log::warn!("{} failed in {:?}: {}", self.operation, self.state, err);
        if matches!(self.state, State::SelectSector { .. }) {
            self.current_sector = None;
        }
        match self.operation {
            Operation::Write => {
                self.write.bytes_written = 0;
                self.write.started = false;
            }
            Operation::Read => self.read.located = false,
            Operation::Check if self.config.invalidate_on_check_failure => {
                self.card_state = CardState::Invalid;
            }
            _ => {}
        }
        self.state = State::Idle;
    }

    /// Run the synchronous part of an operation. Anything but `Pending`
    /// leaves the session Idle and skips the completion routine.
    fn kick_off<F>(&mut self, start: F) -> Result<Progress>
    where
        F: FnOnce(&mut Self) -> Result<Progress>,
    {
        let result = start(self);
        match &result {
            Ok(Progress::Pending) => {}
            Ok(Progress::Complete(_)) => self.state = State::Idle,
            Err(e) => self.abort(e),
        }
        result
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state != State::Idle {
            return Err(Error::InvalidDeviceRequest);
        }
        Ok(())
    }

    fn ensure_completion(&self) -> Result<()> {
        if self.completion.is_none() {
            return Err(Error::InvalidParameter("no completion routine registered"));
        }
        Ok(())
    }

    pub fn card_state(&self) -> CardState {
        self.card_state
    }

    /// Usable TLV area in bytes, from the CC.
    pub fn card_memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Sector the tag is known to have selected.
    pub fn current_sector(&self) -> Option<u8> {
        self.current_sector
    }

    /// Snapshot of the NDEF TLV located by the last check, read or write.
    pub fn ndef_info(&self) -> Option<NdefInfo> {
        let tlv = self.tlv?;
        let at = TagAddress::of(tlv.value_offset);
        Some(NdefInfo {
            card_state: self.card_state,
            memory_size: self.memory_size,
            sector: at.sector,
            block: at.block,
            byte: at.byte,
            length: tlv.length,
            length_form: tlv.form,
            free_size: self.memory_size.saturating_sub(tlv.value_end()),
        })
    }

    /// The last read delivered the end of the message, or the last write
    /// filled the container.
    pub fn is_read_write_complete(&self) -> bool {
        match self.operation {
            Operation::Read => self.read.complete,
            Operation::Write => self.write.complete,
            _ => false,
        }
    }

    /// Bytes delivered by the last read call.
    pub fn read_data(&self) -> &[u8] {
        &self.read.output
    }

    /// Bytes written by the last write call; zero after a failed write.
    pub fn bytes_written(&self) -> usize {
        self.write.bytes_written
    }
}

impl std::fmt::Debug for NdefMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdefMap")
            .field("state", &self.state)
            .field("operation", &self.operation)
            .field("card_state", &self.card_state)
            .field("memory_size", &self.memory_size)
            .field("current_sector", &self.current_sector)
            .field("tlv", &self.tlv)
            .finish()
    }
}
