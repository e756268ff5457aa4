// mfulmap-rs/mfulmap/src/map/check.rs
//! CC compliance check and the NDEF TLV search.

use super::NdefMap;
use super::address::{TagAddress, window_start};
use super::scanner::{Scan, TlvLocation, TlvScanner};
use super::state::{Resume, State};
use crate::card::{self, check_compliance};
use crate::protocol::{Command, parser};
use crate::types::{BlockData, CardState, Operation, Progress};
use crate::{Error, Result};

impl NdefMap {
    pub(super) fn issue_cc_read(&mut self) -> Result<Progress> {
        let block = self.config.cc_read_block();
        self.send(Command::Read { block }, State::CheckCompliance)
    }

    pub(super) fn on_check_compliance(&mut self, reply: &[u8]) -> Result<Progress> {
        let block = parser::read_block(reply)?;
        let compliance = match check_compliance(&block, self.config.lock_bits_check) {
            Ok(c) => c,
            Err(e) => {
                self.card_state = CardState::Invalid;
                return Err(e);
            }
        };
        log::debug!(
            "CC ok: version {:#04x}, {} bytes, {}",
            compliance.cc.version,
            compliance.memory_size,
            compliance.state
        );
        self.card_state = compliance.state;
        self.memory_size = compliance.memory_size;
        self.begin_scan()
    }

    /// Restart the TLV search from the first data byte.
    pub(super) fn begin_scan(&mut self) -> Result<Progress> {
        self.scanner = TlvScanner::new(self.memory_size);
        self.tlv = None;
        self.ensure_sector(TagAddress::of(0).sector, Resume::FindTlv)
    }

    pub(super) fn issue_scan_read(&mut self) -> Result<Progress> {
        self.window = window_start(self.scanner.offset());
        let block = TagAddress::of(self.window).block;
        self.send(Command::Read { block }, State::FindTlv)
    }

    pub(super) fn on_find_tlv(&mut self, reply: &[u8]) -> Result<Progress> {
        let block = parser::read_block(reply)?;
        match self.scanner.feed(self.window, block.as_bytes())? {
            Scan::NeedMore(next) => {
                log::trace!("TLV scan continues at {}", next);
                self.ensure_sector(TagAddress::of(next).sector, Resume::FindTlv)
            }
            Scan::Found(loc) => self.on_tlv_found(loc, &block),
        }
    }

    fn on_tlv_found(&mut self, loc: TlvLocation, block: &BlockData) -> Result<Progress> {
        self.card_state = match card::set_card_state(self.card_state, loc.length) {
            Ok(state) => state,
            Err(e) => {
                self.card_state = CardState::Invalid;
                return Err(e);
            }
        };
        self.tlv = Some(loc);
        log::debug!(
            "NDEF TLV at {} ({:?} length {}), card {}",
            loc.type_offset,
            loc.form,
            loc.length,
            self.card_state
        );

        match self.operation {
            Operation::Read => {
                if loc.length == 0 {
                    return Err(Error::NoNdefSupport);
                }
                self.read.locate(&loc);
                self.stage_window(block)?;
                self.continue_read()
            }
            _ => Ok(Progress::Complete(loc.length)),
        }
    }
}
