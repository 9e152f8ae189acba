use core::marker::PhantomData;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::interface::advance;
use crate::{GeneratorOptions, IdGenStatus, Result, Snowflake, SnowflakeGenerator, TimeSource};

/// A lock-free Snowflake ID generator for multi-threaded use.
///
/// The `(timestamp, sequence)` state is the last issued ID, kept in a single
/// [`AtomicU64`] and advanced with compare-and-swap. A caller that loses the
/// race gets [`IdGenStatus::Pending`] with `yield_for == 0` and retries.
///
/// ## Recommended When
/// - Throughput under contention matters more than fairness
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    identity: u64,
    time: T,
    options: GeneratorOptions,
    _id: PhantomData<ID>,
}

impl<ID, T> AtomicSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    /// Creates a generator for `identity` with default [`GeneratorOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` is negative or does
    /// not fit the layout of `ID`.
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    pub fn new(identity: impl Into<i128>, time: T) -> Result<Self> {
        Self::with_options(identity, time, GeneratorOptions::default())
    }

    /// Creates a generator for `identity` with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` is out of range.
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    pub fn with_options(
        identity: impl Into<i128>,
        time: T,
        options: GeneratorOptions,
    ) -> Result<Self> {
        Self::from_components(0, identity, 0, time, options)
    }

    /// Creates a generator preloaded with an explicit last-issued state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` is out of range.
    ///
    /// [`Error::InvalidIdentity`]: crate::Error::InvalidIdentity
    pub fn from_components(
        timestamp: u64,
        identity: impl Into<i128>,
        sequence: u64,
        time: T,
        options: GeneratorOptions,
    ) -> Result<Self> {
        let identity = ID::validate_identity(identity)?;
        let raw = ID::from_components(timestamp, identity, sequence).to_raw();
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(raw)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(raw),
            identity,
            time,
            options,
            _id: PhantomData,
        })
    }

    /// Attempts to mint the next ID without blocking.
    ///
    /// The state is loaded before the clock is read, so a concurrent winner
    /// can only make the loaded state stale (caught by the CAS), never make
    /// the clock look behind.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] under [`RollbackPolicy::Reject`]
    /// - [`Error::TimestampOverflow`] if the clock reading does not fit `ID`
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    /// [`RollbackPolicy::Reject`]: crate::RollbackPolicy::Reject
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(identity = self.identity))
    )]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let current_raw = self.state.load(Ordering::Acquire);
        let now = self.time.current_millis();

        let status = advance(ID::from_raw(current_raw), now, self.options.rollback)?;
        let IdGenStatus::Ready { id: next } = status else {
            return Ok(status);
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next.to_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            Ok(status)
        } else {
            // Another thread won the race. Yield 0 to retry immediately.
            Ok(IdGenStatus::Pending { yield_for: 0 })
        }
    }
}

impl<ID, T> SnowflakeGenerator<ID> for AtomicSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    fn identity(&self) -> u64 {
        self.identity
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        self.try_poll_id()
    }
}
