// mfulmap-rs/mfulmap/src/map/state.rs

/// Resumption tag: which handler runs when the outstanding command's reply
/// arrives through [`NdefMap::process`](super::NdefMap::process).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    /// CC read outstanding.
    CheckCompliance,
    /// TLV area read outstanding for the scanner.
    FindTlv,
    /// One of the two SECTOR_SELECT packets outstanding.
    SelectSector {
        phase: SelectPhase,
        sector: u8,
        resume: Resume,
    },
    /// NDEF value read outstanding.
    Read,
    /// Read of the block the NDEF TLV header starts in, before rewriting it.
    WriteReadBack,
    /// Data block write outstanding.
    Write,
    /// Terminator block write outstanding.
    WriteTerminator,
    /// Length field rewrite outstanding.
    UpdateLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPhase {
    /// Packet 1, answered with an ACK.
    Intent,
    /// Packet 2 with the target sector, passive ACK.
    Target,
}

/// What to issue once a sector select has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    /// Read the CC (back in sector 0 before a check).
    Check,
    /// Continue the TLV scan.
    FindTlv,
    /// Continue reading NDEF value bytes.
    Read,
    /// Read back the first block of the TLV header.
    WriteInit,
    /// Write the pending data block.
    Write,
    /// Write the terminator block.
    WriteTerminator,
    /// Rewrite a length field block.
    UpdateLength,
}
