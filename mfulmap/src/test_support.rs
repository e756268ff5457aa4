// mfulmap-rs/mfulmap/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! They build formatted tag images and drive an [`NdefMap`] against a
//! [`MockTag`] until the session is idle again.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::MapConfig;
use crate::constants::{
    CC_ACCESS_READ_WRITE, CC_MAGIC, DATA_AREA_START, SECTOR_SIZE, TLV_LONG_LENGTH_MARKER,
    TLV_NDEF, TLV_SHORT_LENGTH_MAX, TLV_TERMINATOR,
};
use crate::map::NdefMap;
use crate::transport::{MockTag, MockTransport};
use crate::types::{Operation, Progress, RemoteDevice, SeekMode};
use crate::{Error, Result};

/// CC bytes for a read/write tag with the given size byte (size / 8).
#[doc(hidden)]
pub fn cc_bytes(size_byte: u8) -> [u8; 4] {
    [CC_MAGIC, 0x10, size_byte, CC_ACCESS_READ_WRITE]
}

/// Tag image with `cc` in block 3 and `tlv_area` starting at block 4. The
/// tag gets enough sectors to back the whole declared data area.
#[doc(hidden)]
pub fn tag_with_cc(cc: [u8; 4], tlv_area: &[u8]) -> MockTag {
    let declared = DATA_AREA_START + cc[2] as usize * 8;
    let needed = declared.max(DATA_AREA_START + tlv_area.len());
    let mut tag = MockTag::new(needed.div_ceil(SECTOR_SIZE));
    let mem = tag.memory_mut();
    mem[12..16].copy_from_slice(&cc);
    mem[DATA_AREA_START..DATA_AREA_START + tlv_area.len()].copy_from_slice(tlv_area);
    tag
}

/// Read/write tag with `tlv_area` at block 4.
#[doc(hidden)]
pub fn formatted_tag(size_byte: u8, tlv_area: &[u8]) -> MockTag {
    tag_with_cc(cc_bytes(size_byte), tlv_area)
}

/// Freshly formatted tag: an empty NDEF TLV followed by a terminator.
#[doc(hidden)]
pub fn empty_ndef_tag(size_byte: u8) -> MockTag {
    formatted_tag(size_byte, &[TLV_NDEF, 0x00, TLV_TERMINATOR])
}

/// Encode `message` as an NDEF TLV (short or long length form).
#[doc(hidden)]
pub fn ndef_tlv(message: &[u8]) -> Vec<u8> {
    let mut tlv = vec![TLV_NDEF];
    if message.len() > TLV_SHORT_LENGTH_MAX {
        tlv.push(TLV_LONG_LENGTH_MARKER);
        tlv.extend_from_slice(&(message.len() as u16).to_be_bytes());
    } else {
        tlv.push(message.len() as u8);
    }
    tlv.extend_from_slice(message);
    tlv
}

/// Tag holding `message` after the optional `prefix` TLVs.
#[doc(hidden)]
pub fn ndef_tag(size_byte: u8, prefix: &[u8], message: &[u8]) -> MockTag {
    let mut area = prefix.to_vec();
    area.extend(ndef_tlv(message));
    area.push(TLV_TERMINATOR);
    formatted_tag(size_byte, &area)
}

/// Deterministic test payload.
#[doc(hidden)]
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

/// Completion calls recorded by a [`Harness`].
pub type Completions = Rc<RefCell<Vec<(Operation, Result<usize>)>>>;

/// An [`NdefMap`] wired to a [`MockTag`], recording every completion.
#[doc(hidden)]
pub struct Harness {
    pub map: NdefMap,
    pub mock: MockTransport,
    pub completions: Completions,
}

impl Harness {
    pub fn new(tag: MockTag) -> Self {
        Self::with_config(tag, MapConfig::default())
    }

    pub fn with_config(tag: MockTag, config: MapConfig) -> Self {
        let mock = MockTransport::new(tag);
        let completions: Completions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&completions);
        let map = NdefMap::new(
            Box::new(mock.clone()),
            RemoteDevice::ULTRALIGHT,
            config,
            Some(Box::new(move |op: Operation, result: Result<usize>| {
                sink.borrow_mut().push((op, result));
            })),
        );
        Self {
            map,
            mock,
            completions,
        }
    }

    /// Feed queued replies back until the session goes idle. Returns the
    /// number of replies processed.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while let Some(reply) = self.mock.take_reply() {
            if self.map.process(reply).is_err() {
                break;
            }
            steps += 1;
        }
        steps
    }

    /// Settle an operation: drive it if pending and return the value its
    /// completion reported.
    pub fn settle(&mut self, started: Result<Progress>) -> Result<usize> {
        match started? {
            Progress::Complete(n) => Ok(n),
            Progress::Pending => {
                self.run();
                let (_, result) = self
                    .completions
                    .borrow_mut()
                    .pop()
                    .ok_or(Error::InvalidDeviceRequest)?;
                result
            }
        }
    }

    pub fn check(&mut self) -> Result<usize> {
        let started = self.map.check_ndef();
        self.settle(started)
    }

    pub fn read(&mut self, capacity: usize, seek: SeekMode) -> Result<Vec<u8>> {
        let started = self.map.read_ndef(capacity, seek);
        self.settle(started)?;
        Ok(self.map.read_data().to_vec())
    }

    /// Read the whole message from the start.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.read(usize::MAX, SeekMode::Begin)
    }

    pub fn write(&mut self, data: &[u8], seek: SeekMode) -> Result<usize> {
        let started = self.map.write_ndef(data, seek);
        self.settle(started)
    }

    /// Number of requests sent so far.
    pub fn sent(&self) -> usize {
        self.mock.sent_count()
    }

    /// Sector select handshakes since request index `from`.
    pub fn selects_since(&self, from: usize) -> usize {
        self.mock.tag().sector_selects_since(from)
    }
}
