use core::time::Duration;
use std::time::SystemTime;

use crate::{DEFAULT_EPOCH, TimeSource};

/// A time source that reads the system wall clock on every call.
///
/// Wall-clock time can jump backward (NTP steps, manual changes). How a
/// generator reacts to that is governed by [`RollbackPolicy`]. Readings
/// earlier than the epoch saturate to zero.
///
/// [`RollbackPolicy`]: crate::RollbackPolicy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallClock {
    epoch_millis: u64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock whose zero-point is `epoch`, a [`Duration`]
    /// since 1970-01-01 UTC.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }

    /// Returns the configured epoch in milliseconds since the Unix epoch.
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        // A system clock before 1970 reads as zero as well
        let unix_millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
