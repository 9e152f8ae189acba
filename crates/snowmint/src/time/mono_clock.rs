use core::time::Duration;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Instant, SystemTime},
};

use crate::{DEFAULT_EPOCH, Error, Result, TimeSource};

/// Shared tick counter updated by the ticker thread.
struct Ticker {
    elapsed: AtomicU64,
}

/// A time source that never moves backward.
///
/// The epoch offset is sampled from the wall clock once, at construction.
/// After that a background thread advances a shared counter once per
/// millisecond using [`Instant`], so wall-clock steps (NTP, manual changes)
/// after construction are not observed. Reads are a single atomic load.
///
/// Clones share the same ticker. The thread exits once every clone has been
/// dropped.
#[derive(Clone)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    epoch_offset: u64,
}

impl MonotonicClock {
    /// Constructs a monotonic clock aligned to [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than the epoch.
    pub fn new() -> Result<Self> {
        Self::with_epoch(DEFAULT_EPOCH)
    }

    /// Constructs a monotonic clock whose zero-point is `epoch`, a
    /// [`Duration`] since 1970-01-01 UTC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{MonotonicClock, TimeSource, DEFAULT_EPOCH};
    ///
    /// let clock = MonotonicClock::with_epoch(DEFAULT_EPOCH)?;
    /// let first = clock.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(5));
    /// assert!(clock.current_millis() > first);
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    pub fn with_epoch(epoch: Duration) -> Result<Self> {
        let system_now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_err(|_| Error::ClockBeforeEpoch)?;
        let epoch_offset = system_now
            .checked_sub(epoch)
            .ok_or(Error::ClockBeforeEpoch)?
            .as_millis() as u64;

        let ticker = Arc::new(Ticker {
            elapsed: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&ticker);
        thread::spawn(move || {
            let start = Instant::now();
            let mut tick = 0;

            while let Some(ticker) = weak.upgrade() {
                // Absolute target of the next tick, so sleeps don't drift
                let target = start + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                let elapsed = start.elapsed().as_millis() as u64;
                ticker.elapsed.store(elapsed, Ordering::Release);
                tick = elapsed + 1;
            }
        });

        Ok(Self {
            ticker,
            epoch_offset,
        })
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.ticker.elapsed.load(Ordering::Acquire)
    }
}
