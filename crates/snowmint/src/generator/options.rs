use core::time::Duration;
use std::thread;

/// What a generator does when the clock reads earlier than the timestamp of
/// the last issued ID.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RollbackPolicy {
    /// Report [`IdGenStatus::Pending`] until the clock catches up to the last
    /// issued timestamp. IDs stay unique and strictly increasing.
    ///
    /// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
    #[default]
    Wait,
    /// Fail with [`Error::ClockMovedBackwards`].
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    Reject,
    /// Adopt the earlier timestamp and reset the sequence to zero.
    ///
    /// The next ID is numerically smaller than the previous one, and IDs
    /// already issued in that earlier millisecond can be minted again. Only
    /// for fleets that tolerate both.
    Reset,
}

/// How [`SnowflakeGenerator::generate`] waits between attempts while the
/// generator reports [`IdGenStatus::Pending`].
///
/// [`SnowflakeGenerator::generate`]: crate::SnowflakeGenerator::generate
/// [`IdGenStatus::Pending`]: crate::IdGenStatus::Pending
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Backoff {
    /// Busy-poll the clock. Lowest latency, burns a core while waiting.
    Spin,
    /// Yield the thread to the scheduler between polls.
    Yield,
    /// Sleep for the reported wait, yielding when it is zero.
    #[default]
    Sleep,
}

impl Backoff {
    /// Blocks the current thread according to the strategy. `Sleep` blocks
    /// for at most `wait`.
    pub fn wait(self, wait: Duration) {
        match self {
            Self::Spin => core::hint::spin_loop(),
            Self::Yield => thread::yield_now(),
            Self::Sleep if wait.is_zero() => thread::yield_now(),
            Self::Sleep => thread::sleep(wait),
        }
    }
}

/// Runtime knobs shared by all generators.
///
/// ```
/// use core::time::Duration;
/// use snowmint::{Backoff, GeneratorOptions, RollbackPolicy};
///
/// let options = GeneratorOptions::default()
///     .with_rollback(RollbackPolicy::Reject)
///     .with_backoff(Backoff::Yield)
///     .with_timeout(Duration::from_millis(50));
/// assert_eq!(options.timeout, Some(Duration::from_millis(50)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeneratorOptions {
    pub rollback: RollbackPolicy,
    pub backoff: Backoff,
    /// Upper bound on how long one `generate` call may wait for the clock.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl GeneratorOptions {
    #[must_use]
    pub const fn with_rollback(mut self, rollback: RollbackPolicy) -> Self {
        self.rollback = rollback;
        self
    }

    #[must_use]
    pub const fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
