// mfulmap-rs/mfulmap/src/map/write.rs
//! Write session.
//!
//! The NDEF TLV is rewritten block by block starting at its type byte. The
//! length field is first written as zero and patched with the cumulative
//! length once the data blocks (and a terminator, when space is left) are
//! on the tag. Blocks holding the length field are kept as snapshots so the
//! patch preserves whatever shares those blocks.

use std::collections::VecDeque;

use super::NdefMap;
use super::address::{TagAddress, block_start};
use super::scanner::TlvLocation;
use super::state::{Resume, State};
use crate::constants::{
    BLOCK_SIZE, TLV_LONG_LENGTH_MAX, TLV_NDEF, TLV_NULL, TLV_SHORT_LENGTH_MAX, TLV_TERMINATOR,
};
use crate::protocol::{Command, parser};
use crate::types::{CardState, LengthForm, Progress};
use crate::{Error, Result};

/// Length field blocks: the field spans at most two blocks.
const LENGTH_BLOCKS: usize = 2;

/// One 4-byte block being assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct BlockBuf {
    bytes: [u8; BLOCK_SIZE],
    len: usize,
}

impl BlockBuf {
    pub(super) fn from_prefix(prefix: &[u8]) -> Self {
        let mut b = Self::default();
        for &byte in prefix.iter().take(BLOCK_SIZE) {
            b.push(byte);
        }
        b
    }

    pub(super) fn push(&mut self, byte: u8) {
        if self.len < BLOCK_SIZE {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    pub(super) fn is_full(&self) -> bool {
        self.len == BLOCK_SIZE
    }

    pub(super) fn len(&self) -> usize {
        self.len
    }

    pub(super) fn pad(&mut self, byte: u8) {
        while !self.is_full() {
            self.push(byte);
        }
    }

    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(super) fn bytes(&self) -> [u8; BLOCK_SIZE] {
        self.bytes
    }
}

#[derive(Debug, Clone)]
pub(super) struct WriteSession {
    /// A write from the TLV start has finished, so Seek-Current may append.
    pub(super) started: bool,
    /// The container is full.
    pub(super) complete: bool,
    pub(super) form: LengthForm,
    pub(super) type_offset: usize,
    /// Free bytes left after the value written so far.
    pub(super) remaining: usize,
    /// Cumulative value length.
    pub(super) total: usize,
    pub(super) data: Vec<u8>,
    /// Next byte of `data` to write.
    pub(super) index: usize,
    /// Header bytes not yet placed in a block.
    pub(super) header: VecDeque<u8>,
    /// TLV offset of the block being written.
    pub(super) block_offset: usize,
    pub(super) block: BlockBuf,
    /// Leading bytes of the last, partially filled block.
    pub(super) carry: BlockBuf,
    /// The block being written is the last one of this call.
    pub(super) partial: bool,
    pub(super) terminated: bool,
    /// Last written content of the length field blocks.
    pub(super) snapshots: [Option<[u8; BLOCK_SIZE]>; LENGTH_BLOCKS],
    pub(super) update_index: usize,
    pub(super) pending_update: [u8; BLOCK_SIZE],
    pub(super) bytes_written: usize,
}

impl Default for WriteSession {
    fn default() -> Self {
        Self {
            started: false,
            complete: false,
            form: LengthForm::Short,
            type_offset: 0,
            remaining: 0,
            total: 0,
            data: Vec::new(),
            index: 0,
            header: VecDeque::new(),
            block_offset: 0,
            block: BlockBuf::default(),
            carry: BlockBuf::default(),
            partial: false,
            terminated: false,
            snapshots: [None; LENGTH_BLOCKS],
            update_index: 0,
            pending_update: [0u8; BLOCK_SIZE],
            bytes_written: 0,
        }
    }
}

impl WriteSession {
    /// Fresh session writing a TLV of `form` at `type_offset`.
    fn begin(form: LengthForm, type_offset: usize, remaining: usize, data: &[u8]) -> Self {
        let mut header = VecDeque::with_capacity(1 + form.field_len());
        header.push_back(TLV_NDEF);
        let (field, n) = form.encode(0);
        header.extend(field[..n].iter().copied());
        Self {
            form,
            type_offset,
            remaining,
            data: data.to_vec(),
            header,
            block_offset: block_start(type_offset),
            ..Self::default()
        }
    }

    fn length_offset(&self) -> usize {
        self.type_offset + 1
    }

    pub(super) fn value_offset(&self) -> usize {
        self.length_offset() + self.form.field_len()
    }

    fn first_length_block(&self) -> usize {
        block_start(self.length_offset())
    }

    fn length_block_count(&self) -> usize {
        let last = block_start(self.length_offset() + self.form.field_len() - 1);
        (last - self.first_length_block()) / BLOCK_SIZE + 1
    }

    fn length_block(&self, i: usize) -> usize {
        self.first_length_block() + i * BLOCK_SIZE
    }

    /// Slot of the length field block at `offset`, if it is one.
    fn length_slot(&self, offset: usize) -> Option<usize> {
        let first = self.first_length_block();
        if offset < first {
            return None;
        }
        let slot = (offset - first) / BLOCK_SIZE;
        (slot < self.length_block_count()).then_some(slot)
    }

    fn data_pending(&self) -> bool {
        self.index < self.data.len() && self.remaining > 0
    }

    /// Place header bytes, then data, into the current block. A block left
    /// short is closed with a terminator (if space remains) and NULL padding.
    fn fill(&mut self) {
        self.partial = false;
        while !self.block.is_full() {
            match self.header.pop_front() {
                Some(byte) => self.block.push(byte),
                None => break,
            }
        }
        while !self.block.is_full() && self.data_pending() {
            self.block.push(self.data[self.index]);
            self.index += 1;
            self.total += 1;
            self.remaining -= 1;
        }

        if self.block.is_full() {
            self.carry.clear();
            return;
        }
        self.carry = self.block;
        self.partial = true;
        if self.remaining > 0 {
            self.block.push(TLV_TERMINATOR);
            self.terminated = true;
        }
        self.block.pad(TLV_NULL);
    }

    /// The length field block at slot `i` with the current total patched in.
    fn patched_length_block(&self, i: usize) -> Result<[u8; BLOCK_SIZE]> {
        let offset = self.length_block(i);
        let mut bytes = self.snapshots[i]
            .ok_or_else(|| Error::InvalidFormat(format!("length block {} never written", offset)))?;
        let (field, n) = self.form.encode(self.total);
        for (k, &byte) in field[..n].iter().enumerate() {
            let pos = self.length_offset() + k;
            if (offset..offset + BLOCK_SIZE).contains(&pos) {
                bytes[pos - offset] = byte;
            }
        }
        Ok(bytes)
    }
}

impl NdefMap {
    /// Rewrite the NDEF TLV from its type byte with `data`, truncated to
    /// what the container holds.
    ///
    /// The length form follows the truncated length, so a message cut down
    /// to 254 bytes or less keeps the 1-byte form.
    pub(super) fn begin_write(&mut self, tlv: TlvLocation, data: &[u8]) -> Result<Progress> {
        let short_space = self
            .memory_size
            .checked_sub(tlv.type_offset + 1 + LengthForm::Short.field_len())
            .ok_or(Error::NoNdefSupport)?;
        let long_space = self
            .memory_size
            .saturating_sub(tlv.type_offset + 1 + LengthForm::Long.field_len());
        let form = LengthForm::for_length(data.len().min(long_space));
        let (space, max) = match form {
            LengthForm::Short => (short_space, TLV_SHORT_LENGTH_MAX),
            LengthForm::Long => (long_space, TLV_LONG_LENGTH_MAX),
        };
        let data = &data[..data.len().min(space).min(max)];

        self.write = WriteSession::begin(form, tlv.type_offset, space, data);
        log::debug!(
            "writing {} bytes ({:?} length) at {}, {} bytes free",
            data.len(),
            form,
            tlv.type_offset,
            self.write.remaining
        );

        if tlv.type_offset % BLOCK_SIZE != 0 {
            let sector = TagAddress::of(self.write.block_offset).sector;
            return self.ensure_sector(sector, Resume::WriteInit);
        }
        self.fill_block()
    }

    /// Append `data` after the value written by the previous call.
    pub(super) fn continue_write(&mut self, data: &[u8]) -> Result<Progress> {
        let w = &mut self.write;
        w.data = data.to_vec();
        w.index = 0;
        w.terminated = false;
        w.header.clear();
        w.block = w.carry;
        log::debug!("appending {} bytes at value byte {}", data.len(), w.total);
        self.fill_block()
    }

    pub(super) fn issue_read_back(&mut self) -> Result<Progress> {
        let block = TagAddress::of(self.write.block_offset).block;
        self.send(Command::Read { block }, State::WriteReadBack)
    }

    pub(super) fn on_write_read_back(&mut self, reply: &[u8]) -> Result<Progress> {
        let read = parser::read_block(reply)?;
        let keep = self.write.type_offset - self.write.block_offset;
        self.write.block = BlockBuf::from_prefix(parser::slice_at(read.as_bytes(), 0, keep)?);
        self.fill_block()
    }

    fn fill_block(&mut self) -> Result<Progress> {
        self.write.fill();
        let sector = TagAddress::of(self.write.block_offset).sector;
        self.ensure_sector(sector, Resume::Write)
    }

    pub(super) fn issue_block_write(&mut self) -> Result<Progress> {
        let block = TagAddress::of(self.write.block_offset).block;
        let data = self.write.block.bytes();
        self.send(Command::Write { block, data }, State::Write)
    }

    pub(super) fn on_block_written(&mut self, reply: &[u8]) -> Result<Progress> {
        parser::expect_ack(reply)?;
        let w = &mut self.write;
        if let Some(slot) = w.length_slot(w.block_offset) {
            w.snapshots[slot] = Some(w.block.bytes());
        }
        if w.partial {
            return self.start_length_update();
        }

        w.block_offset += BLOCK_SIZE;
        w.block.clear();
        if !w.header.is_empty() || w.data_pending() {
            return self.fill_block();
        }
        w.carry.clear();
        if w.remaining > 0 && !w.terminated {
            let sector = TagAddress::of(w.block_offset).sector;
            return self.ensure_sector(sector, Resume::WriteTerminator);
        }
        self.start_length_update()
    }

    pub(super) fn issue_terminator_write(&mut self) -> Result<Progress> {
        let block = TagAddress::of(self.write.block_offset).block;
        let data = [TLV_TERMINATOR, TLV_NULL, TLV_NULL, TLV_NULL];
        self.send(Command::Write { block, data }, State::WriteTerminator)
    }

    pub(super) fn on_terminator_written(&mut self, reply: &[u8]) -> Result<Progress> {
        parser::expect_ack(reply)?;
        self.write.terminated = true;
        self.start_length_update()
    }

    fn start_length_update(&mut self) -> Result<Progress> {
        self.write.update_index = 0;
        let sector = TagAddress::of(self.write.length_block(0)).sector;
        self.ensure_sector(sector, Resume::UpdateLength)
    }

    pub(super) fn issue_length_write(&mut self) -> Result<Progress> {
        let i = self.write.update_index;
        let data = self.write.patched_length_block(i)?;
        self.write.pending_update = data;
        let block = TagAddress::of(self.write.length_block(i)).block;
        self.send(Command::Write { block, data }, State::UpdateLength)
    }

    pub(super) fn on_length_written(&mut self, reply: &[u8]) -> Result<Progress> {
        parser::expect_ack(reply)?;
        let w = &mut self.write;
        let i = w.update_index;
        w.snapshots[i] = Some(w.pending_update);
        if w.partial && w.length_block(i) == w.block_offset {
            w.carry = BlockBuf::from_prefix(&w.pending_update[..w.carry.len()]);
        }

        w.update_index += 1;
        if w.update_index < w.length_block_count() {
            let sector = TagAddress::of(w.length_block(w.update_index)).sector;
            return self.ensure_sector(sector, Resume::UpdateLength);
        }
        self.finish_write()
    }

    fn finish_write(&mut self) -> Result<Progress> {
        let w = &mut self.write;
        w.started = true;
        w.complete = w.remaining == 0;
        w.bytes_written = w.index;
        let written = w.index;
        let location = TlvLocation {
            type_offset: w.type_offset,
            value_offset: w.value_offset(),
            length: w.total,
            form: w.form,
        };

        // ready for a Seek-Current continuation
        w.block = w.carry;
        w.data.clear();
        w.index = 0;

        if self.card_state == CardState::Initialized && location.length > 0 {
            self.card_state = CardState::ReadWrite;
        }
        self.tlv = Some(location);
        log::debug!(
            "write done: {} bytes this call, length now {}, {} free",
            written,
            location.length,
            self.write.remaining
        );
        Ok(Progress::Complete(written))
    }
}
