// mfulmap-rs/mfulmap/src/map/read.rs
//! Read session: stages NDEF value bytes window by window and hands them to
//! the caller up to the requested capacity.

use super::NdefMap;
use super::address::{TagAddress, window_start};
use super::scanner::TlvLocation;
use super::state::{Resume, State};
use crate::constants::{READ_BUFFER_SIZE, READ_RESPONSE_LEN};
use crate::protocol::{Command, parser};
use crate::types::{BlockData, Progress};
use crate::{Error, Result};

/// Fixed-capacity FIFO holding value bytes read from the tag but not yet
/// delivered.
#[derive(Clone)]
pub struct ReadBuffer {
    bytes: [u8; READ_BUFFER_SIZE],
    head: usize,
    tail: usize,
}

impl ReadBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0u8; READ_BUFFER_SIZE],
            head: 0,
            tail: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    pub fn push(&mut self, data: &[u8]) -> Result<()> {
        if self.head > 0 {
            self.bytes.copy_within(self.head..self.tail, 0);
            self.tail -= self.head;
            self.head = 0;
        }
        if self.tail + data.len() > READ_BUFFER_SIZE {
            return Err(Error::BufferOverflow {
                capacity: READ_BUFFER_SIZE,
            });
        }
        self.bytes[self.tail..self.tail + data.len()].copy_from_slice(data);
        self.tail += data.len();
        Ok(())
    }

    /// Move up to `max` bytes to the end of `out`. Returns the count moved.
    pub fn drain_into(&mut self, out: &mut Vec<u8>, max: usize) -> usize {
        let n = max.min(self.len());
        out.extend_from_slice(&self.bytes[self.head..self.head + n]);
        self.head += n;
        if self.is_empty() {
            self.clear();
        }
        n
    }
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReadBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ReadBuffer([{}])",
            crate::utils::bytes_to_hex_spaced(&self.bytes[self.head..self.tail])
        )
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct ReadSession {
    /// The NDEF value position is known for this session.
    pub(super) located: bool,
    /// Next value byte to fetch from the tag.
    pub(super) fetch: usize,
    /// One past the last value byte.
    pub(super) end: usize,
    /// Value bytes not yet delivered to the caller.
    pub(super) remaining: usize,
    pub(super) complete: bool,
    pub(super) capacity: usize,
    pub(super) staged: ReadBuffer,
    pub(super) output: Vec<u8>,
}

impl ReadSession {
    pub(super) fn locate(&mut self, loc: &TlvLocation) {
        self.located = true;
        self.fetch = loc.value_offset;
        self.end = loc.value_end();
        self.remaining = loc.length;
        self.complete = false;
        self.staged.clear();
    }

    /// Start a call that delivers at most `capacity` bytes.
    pub(super) fn start_call(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.output.clear();
    }
}

impl NdefMap {
    /// Deliver staged bytes and fetch more until the call is satisfied or
    /// the value is exhausted.
    pub(super) fn continue_read(&mut self) -> Result<Progress> {
        let r = &mut self.read;
        let want = r.capacity.saturating_sub(r.output.len());
        let moved = r.staged.drain_into(&mut r.output, want);
        r.remaining = r.remaining.saturating_sub(moved);

        if r.remaining == 0 {
            r.complete = true;
            log::debug!("NDEF message fully read ({} bytes this call)", r.output.len());
            return Ok(Progress::Complete(r.output.len()));
        }
        if r.output.len() == r.capacity {
            return Ok(Progress::Complete(r.output.len()));
        }
        let sector = TagAddress::of(r.fetch).sector;
        self.ensure_sector(sector, Resume::Read)
    }

    pub(super) fn issue_value_read(&mut self) -> Result<Progress> {
        if self.read.fetch >= self.read.end {
            return Err(Error::ReadFailed);
        }
        self.window = window_start(self.read.fetch);
        let block = TagAddress::of(self.window).block;
        self.send(Command::Read { block }, State::Read)
    }

    pub(super) fn on_read(&mut self, reply: &[u8]) -> Result<Progress> {
        let block = parser::read_block(reply)?;
        self.stage_window(&block)?;
        self.continue_read()
    }

    /// Stage the value bytes of the window just read.
    pub(super) fn stage_window(&mut self, block: &BlockData) -> Result<()> {
        let window = self.window;
        let r = &mut self.read;
        let start = r.fetch.saturating_sub(window);
        let end = (window + READ_RESPONSE_LEN).min(r.end).saturating_sub(window);
        if start < end {
            r.staged.push(parser::slice_at(block.as_bytes(), start, end - start)?)?;
            r.fetch += end - start;
        }
        Ok(())
    }
}
