//! Quantity stepper and mint button state. Everything here is plain data
//! the host renders; no chain access.

use crate::constants::MAX_MINT_DISPLAY;
use crate::guards::MintEligibility;

/// Requested mint quantity, clamped on every change to
/// `[1, min(limit, MAX_MINT_DISPLAY)]` so an out-of-range value can never be
/// submitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintCount {
    value: u32,
    limit: u32,
}

impl MintCount {
    pub fn new(limit: u32) -> Self {
        let mut count = MintCount { value: 1, limit };
        count.set(1);
        count
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Highest selectable quantity. Never below 1, so the control always
    /// holds a well-formed value even when minting is blocked.
    pub fn max(&self) -> u32 {
        self.limit.min(MAX_MINT_DISPLAY).max(1)
    }

    pub fn set(&mut self, value: u32) {
        self.value = value.clamp(1, self.max());
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.set(self.value);
    }

    pub fn increment(&mut self) {
        self.set(self.value.saturating_add(1));
    }

    pub fn decrement(&mut self) {
        self.set(self.value.saturating_sub(1));
    }
}

/// Input state for the mint call-to-action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintButton {
    pub machine_loaded: bool,
    pub loading: bool,
    pub minting: bool,
    pub sold_out: bool,
    pub active: bool,
    pub ended: bool,
}

impl MintButton {
    pub fn disabled(&self, count: &MintCount) -> bool {
        self.loading
            || self.sold_out
            || self.minting
            || self.ended
            || !self.active
            || count.value() > count.limit()
    }

    /// Button caption, in the order the storefront resolves it.
    pub fn label(&self, eligibility: &MintEligibility, count: &MintCount) -> String {
        if !self.machine_loaded {
            return "CONNECTING...".to_string();
        }
        if self.sold_out {
            return "SOLD OUT".to_string();
        }
        if self.active {
            if let Some(message) = eligibility.messages.first() {
                return message.clone();
            }
            if count.value() > count.limit() {
                return "LIMIT REACHED".to_string();
            }
            if self.minting || self.loading {
                return "MINTING...".to_string();
            }
            return "MINT".to_string();
        }
        if self.ended {
            return "ENDED".to_string();
        }
        "UNAVAILABLE".to_string()
    }
}
