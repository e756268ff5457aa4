// mfulmap-rs/mfulmap/src/map/scanner.rs
//! Incremental TLV scanner.
//!
//! The scanner is fed one 16-byte read window at a time and keeps its
//! position as an offset into the TLV area, so a header split across two
//! windows (or two sectors) resumes exactly at the next unread byte. Values
//! of non-NDEF TLVs are skipped without being read.

use crate::constants::{TLV_LONG_LENGTH_MARKER, TLV_NDEF, TLV_NULL, TLV_TERMINATOR};
use crate::types::LengthForm;
use crate::{Error, Result};

/// Where the NDEF TLV sits in the TLV area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvLocation {
    /// Offset of the 0x03 type byte.
    pub type_offset: usize,
    /// Offset of the first value byte.
    pub value_offset: usize,
    /// Declared value length.
    pub length: usize,
    pub form: LengthForm,
}

impl TlvLocation {
    pub fn length_offset(&self) -> usize {
        self.type_offset + 1
    }

    pub fn value_end(&self) -> usize {
        self.value_offset + self.length
    }
}

/// Result of feeding one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// The window was consumed; continue at this offset.
    NeedMore(usize),
    Found(TlvLocation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Type,
    Length { tlv_type: u8 },
    LengthHigh { tlv_type: u8 },
    LengthLow { tlv_type: u8, high: u8 },
}

#[derive(Debug, Clone)]
pub struct TlvScanner {
    phase: Phase,
    offset: usize,
    limit: usize,
    type_offset: usize,
}

impl TlvScanner {
    /// Scanner over a TLV area of `limit` bytes, starting at offset 0.
    pub fn new(limit: usize) -> Self {
        Self {
            phase: Phase::Type,
            offset: 0,
            limit,
            type_offset: 0,
        }
    }

    /// Next byte the scanner needs.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// TLV area bytes not yet consumed.
    pub fn remaining_free(&self) -> usize {
        self.limit.saturating_sub(self.offset)
    }

    /// Length field bytes still expected for the TLV being parsed.
    pub fn pending_length_bytes(&self) -> usize {
        match self.phase {
            Phase::Type => 0,
            Phase::Length { .. } => 1,
            Phase::LengthHigh { .. } => 2,
            Phase::LengthLow { .. } => 1,
        }
    }

    /// Consume the window `bytes` that starts at TLV-area offset `start`.
    pub fn feed(&mut self, start: usize, bytes: &[u8]) -> Result<Scan> {
        if self.offset < start {
            return Err(Error::InvalidFormat(format!(
                "scan window at {} skips offset {}",
                start, self.offset
            )));
        }
        if self.offset >= start + bytes.len() {
            return Err(Error::InvalidFormat(format!(
                "scan window {}..{} ends before offset {}",
                start,
                start + bytes.len(),
                self.offset
            )));
        }

        while let Some(&byte) = bytes.get(self.offset - start) {
            if self.remaining_free() == 0 {
                return Err(Error::NoNdefSupport);
            }
            self.offset += 1;

            match self.phase {
                Phase::Type => match byte {
                    TLV_NULL => {
                        if self.remaining_free() == 0 {
                            return Err(Error::NoNdefSupport);
                        }
                    }
                    TLV_TERMINATOR => {
                        log::debug!("terminator at {} before any NDEF TLV", self.offset - 1);
                        return Err(Error::NoNdefSupport);
                    }
                    tlv_type => {
                        self.type_offset = self.offset - 1;
                        self.phase = Phase::Length { tlv_type };
                    }
                },
                Phase::Length { tlv_type } => {
                    if byte == TLV_LONG_LENGTH_MARKER {
                        self.phase = Phase::LengthHigh { tlv_type };
                    } else if let Some(found) =
                        self.finish_tlv(tlv_type, byte as usize, LengthForm::Short)?
                    {
                        return Ok(Scan::Found(found));
                    }
                }
                Phase::LengthHigh { tlv_type } => {
                    self.phase = Phase::LengthLow {
                        tlv_type,
                        high: byte,
                    };
                }
                Phase::LengthLow { tlv_type, high } => {
                    let length = (high as usize) << 8 | byte as usize;
                    if let Some(found) = self.finish_tlv(tlv_type, length, LengthForm::Long)? {
                        return Ok(Scan::Found(found));
                    }
                }
            }
        }

        if self.remaining_free() == 0 {
            return Err(Error::NoNdefSupport);
        }
        Ok(Scan::NeedMore(self.offset))
    }

    fn finish_tlv(
        &mut self,
        tlv_type: u8,
        length: usize,
        form: LengthForm,
    ) -> Result<Option<TlvLocation>> {
        if length > self.remaining_free() {
            log::debug!(
                "TLV {:#04x} claims {} bytes, {} left",
                tlv_type,
                length,
                self.remaining_free()
            );
            return Err(Error::NoNdefSupport);
        }
        self.phase = Phase::Type;

        if tlv_type == TLV_NDEF {
            return Ok(Some(TlvLocation {
                type_offset: self.type_offset,
                value_offset: self.offset,
                length,
                form,
            }));
        }
        log::trace!(
            "skipping TLV {:#04x} ({} bytes) at {}",
            tlv_type,
            length,
            self.type_offset
        );
        self.offset += length;
        Ok(None)
    }
}
