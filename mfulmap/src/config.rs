// mfulmap-rs/mfulmap/src/config.rs
//! Policy switches for protocol details that differ between tag vendors
//! and host stacks.

use crate::constants::ULTRALIGHT_ATQA_MASK;

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Read the CC together with the static lock bytes (block 2) and treat
    /// locked tags as read-only.
    pub lock_bits_check: bool,
    /// Leave the card state Invalid whenever a compliance check fails.
    pub invalidate_on_check_failure: bool,
    /// Bits of ATQA byte 0 that must be present.
    pub atqa_mask: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            lock_bits_check: false,
            invalidate_on_check_failure: true,
            atqa_mask: ULTRALIGHT_ATQA_MASK,
        }
    }
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lock_bits_check(mut self, enabled: bool) -> Self {
        self.lock_bits_check = enabled;
        self
    }

    pub fn with_invalidate_on_check_failure(mut self, enabled: bool) -> Self {
        self.invalidate_on_check_failure = enabled;
        self
    }

    pub fn with_atqa_mask(mut self, mask: u8) -> Self {
        self.atqa_mask = mask;
        self
    }

    /// Whether the anticollision answer identifies an Ultralight.
    pub fn accepts_atqa(&self, atqa: [u8; 2]) -> bool {
        atqa[0] & self.atqa_mask == self.atqa_mask
    }

    /// Block read to obtain the CC.
    pub fn cc_read_block(&self) -> u8 {
        if self.lock_bits_check {
            crate::constants::LOCK_BLOCK
        } else {
            crate::constants::CC_BLOCK
        }
    }
}
