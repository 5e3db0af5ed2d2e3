//! Slip accounting: earned credit from attendance, and guarded consumption.

use tracing::debug;

use super::PersonRecord;
use crate::error::{Result, SlipError};

/// Confirmed attendances required to earn one slip day.
pub const ATTENDANCES_PER_SLIP: u32 = 5;

/// Slip days earned by `count` confirmed attendances at the default rate.
#[must_use]
pub const fn earned(count: u32) -> u32 {
    earned_at_rate(count, ATTENDANCES_PER_SLIP)
}

/// Slip days earned at an explicit rate. A zero rate earns nothing.
#[must_use]
pub const fn earned_at_rate(count: u32, attendances_per_slip: u32) -> u32 {
    match count.checked_div(attendances_per_slip) {
        Some(value) => value,
        None => 0,
    }
}

impl PersonRecord {
    #[must_use]
    pub const fn available(&self) -> u32 {
        self.earned.saturating_sub(self.used)
    }

    /// Spend `n` slip days. Refused for dropped records and when fewer than `n`
    /// are available; the record is untouched on failure.
    pub fn consume(&mut self, n: u32) -> Result<()> {
        if self.dropped {
            return Err(SlipError::InsufficientCredit(format!(
                "{} is marked dropped; undrop to track usage",
                self.name
            )));
        }
        let available = self.available();
        if n > available {
            return Err(SlipError::InsufficientCredit(format!(
                "{} requested {n}, available {available}",
                self.name
            )));
        }
        self.used += n;
        debug!(key = %self.key, n, used = self.used, "consumed slip days");
        Ok(())
    }

    /// Give back `n` slip days, flooring `used` at zero.
    pub const fn refund(&mut self, n: u32) {
        self.used = self.used.saturating_sub(n);
    }

    /// Dropping clamps `used` to what was earned.
    pub fn set_dropped(&mut self, dropped: bool) {
        self.dropped = dropped;
        if dropped {
            self.used = self.used.min(self.earned);
        }
    }

    /// Flip the dropped flag, returning the new value.
    pub fn toggle_dropped(&mut self) -> bool {
        self.set_dropped(!self.dropped);
        self.dropped
    }

    pub fn set_notes(&mut self, notes: &str) {
        notes.trim().clone_into(&mut self.notes);
    }
}
