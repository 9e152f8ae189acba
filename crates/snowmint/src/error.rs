use core::time::Duration;

/// A result type defaulting to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowmint` can produce.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The identity handed to a generator does not fit the layout's identity
    /// field.
    #[error("identity {identity} is outside the valid range [0, {max}]")]
    InvalidIdentity {
        /// The rejected value.
        identity: i128,
        /// The largest identity the layout can encode.
        max: u64,
    },

    /// The clock reported a millisecond earlier than the last one used.
    ///
    /// Only returned under [`RollbackPolicy::Reject`].
    ///
    /// [`RollbackPolicy::Reject`]: crate::RollbackPolicy::Reject
    #[error("clock moved backwards: last issued at {last}ms, clock reads {now}ms")]
    ClockMovedBackwards {
        /// Timestamp of the most recently issued identifier.
        last: u64,
        /// Timestamp the clock reported.
        now: u64,
    },

    /// The clock did not admit a new millisecond before the configured
    /// timeout elapsed.
    #[error("clock did not advance within {waited:?}")]
    ClockStalled {
        /// How long the generator waited before giving up.
        waited: Duration,
    },

    /// The clock reading does not fit the layout's timestamp field, either
    /// because the layout's range is exhausted or because the clock's epoch
    /// is too far in the past for the layout.
    #[error("clock reads {now}ms, beyond the largest encodable timestamp {max}ms")]
    TimestampOverflow {
        /// Timestamp the clock reported.
        now: u64,
        /// The largest timestamp the layout can encode.
        max: u64,
    },

    /// A clock was constructed with an epoch later than the current system
    /// time.
    #[error("system clock is earlier than the configured epoch")]
    ClockBeforeEpoch,

    /// The generator state lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant is absent when
    /// the `parking-lot` feature is enabled.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// [`crate::global::generate`] was called before a default generator was
    /// installed.
    #[error("no process-wide default generator has been installed")]
    DefaultNotInstalled,

    /// A process-wide default generator was already installed.
    #[error("a process-wide default generator is already installed")]
    DefaultAlreadyInstalled,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};

// Collapse all poisoned lock errors to `LockPoisoned`
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
