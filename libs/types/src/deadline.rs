//! Call deadlines
//!
//! The relative form resolves to `now +
//! seconds` computed from the same clock read that it is checked against, so
//! it only fails if that sum overflows. The absolute form is a real expiry.

use crate::common::errors::PoolError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    /// Duration in seconds measured from the call's clock read
    Within(u64),
    /// Absolute unix timestamp in seconds
    At(u64),
}

impl Deadline {
    /// Resolve to an absolute timestamp given the call-time clock read
    pub fn resolve(&self, now: u64) -> Result<u64, PoolError> {
        match *self {
            Deadline::Within(seconds) => now
                .checked_add(seconds)
                .ok_or(PoolError::ArithmeticOverflow("deadline")),
            Deadline::At(timestamp) => Ok(timestamp),
        }
    }

    /// Reject with `Expired` when `now` is past the resolved deadline
    pub fn check(&self, now: u64) -> Result<(), PoolError> {
        let deadline = self.resolve(now)?;
        if now > deadline {
            return Err(PoolError::Expired { now, deadline });
        }
        Ok(())
    }
}
