// mfulmap-rs/mfulmap/src/map/sector.rs
//! Two-phase SECTOR_SELECT and the command send primitive.

use super::NdefMap;
use super::state::{Resume, SelectPhase, State};
use crate::protocol::{Command, parser};
use crate::types::Progress;
use crate::utils::bytes_to_hex_spaced;
use crate::Result;

impl NdefMap {
    /// Tag the resumption state, then submit `command`.
    pub(super) fn send(&mut self, command: Command, next: State) -> Result<Progress> {
        let request = command.to_request()?;
        log::trace!(
            "-> {:?} [{}] awaiting {:?}",
            command,
            bytes_to_hex_spaced(request.payload()),
            next
        );
        self.state = next;
        self.transport.transceive(&request)?;
        Ok(Progress::Pending)
    }

    /// Make sure the tag has `sector` selected, then issue `resume`.
    ///
    /// The selected sector is tracked, so nothing is sent when the tag is
    /// already there.
    pub(super) fn ensure_sector(&mut self, sector: u8, resume: Resume) -> Result<Progress> {
        if self.current_sector == Some(sector) {
            return self.resume(resume);
        }
        log::debug!(
            "selecting sector {} (current {:?}) before {:?}",
            sector,
            self.current_sector,
            resume
        );
        self.send(
            Command::SectorSelectIntent,
            State::SelectSector {
                phase: SelectPhase::Intent,
                sector,
                resume,
            },
        )
    }

    pub(super) fn on_select_sector(
        &mut self,
        phase: SelectPhase,
        sector: u8,
        resume: Resume,
        reply: &[u8],
    ) -> Result<Progress> {
        match phase {
            SelectPhase::Intent => {
                parser::expect_ack(reply)?;
                self.send(
                    Command::SectorSelectTarget { sector },
                    State::SelectSector {
                        phase: SelectPhase::Target,
                        sector,
                        resume,
                    },
                )
            }
            SelectPhase::Target => {
                // passive ACK, the reply carries nothing
                self.current_sector = Some(sector);
                self.resume(resume)
            }
        }
    }

    fn resume(&mut self, resume: Resume) -> Result<Progress> {
        match resume {
            Resume::Check => self.issue_cc_read(),
            Resume::FindTlv => self.issue_scan_read(),
            Resume::Read => self.issue_value_read(),
            Resume::WriteInit => self.issue_read_back(),
            Resume::Write => self.issue_block_write(),
            Resume::WriteTerminator => self.issue_terminator_write(),
            Resume::UpdateLength => self.issue_length_write(),
        }
    }
}
