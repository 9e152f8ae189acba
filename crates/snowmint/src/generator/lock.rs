use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use super::interface::advance;
use crate::{
    GeneratorOptions, IdGenStatus, Mutex, Result, Snowflake, SnowflakeGenerator, TimeSource,
};

/// A lock-based Snowflake ID generator for multi-threaded use.
///
/// The `(timestamp, sequence)` state is stored as the last issued ID inside an
/// [`Arc<Mutex<_>>`]. The clock is read while the lock is held, so the
/// read-modify-write of the pair is serialized across callers and concurrent
/// calls can never observe each other's timestamps out of order.
///
/// Cloning shares the state: clones are the same generator.
///
/// ## Recommended When
/// - Fair access across threads matters
/// - [`RollbackPolicy::Reject`] or [`RollbackPolicy::Reset`] is in use and
///   must only react to real clock rollbacks
///
/// ## See Also
/// - [`AtomicSnowflakeGenerator`]
///
/// [`RollbackPolicy::Reject`]: crate::RollbackPolicy::Reject
/// [`RollbackPolicy::Reset`]: crate::RollbackPolicy::Reset
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct LockSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<ID>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<ID>>,
    identity: u64,
    time: T,
    options: GeneratorOptions,
}

impl<ID, T> LockSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource,
{
    /// Creates a generator for `identity` with default [`GeneratorOptions`].
    ///
    /// The state starts at timestamp zero and sequence zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` is negative or does
    /// not fit the layout of `ID`.
    ///
    /// # Example
    /// ```
    /// use snowmint::{Error, LockSnowflakeGenerator, SnowflakeGenerator, SnowflakeId, WallClock};
    ///
    /// let generator = LockSnowflakeGenerator::<SnowflakeId, _>::new(1023, WallClock::default())?;
    /// assert_eq!(generator.generate()?.identity(), 1023);
    ///
    /// let err = LockSnowflakeGenerator::<SnowflakeId, _>::new(1024, WallClock::default());
    /// assert!(matches!(err, Err(Error::InvalidIdentity { .. })));
    /// # Ok::<(), snowmint::Error>(())
    /// ```
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
    /// Useful to resume after a known timestamp. In typical use prefer
    /// [`Self::new`].
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
        let id = ID::from_components(timestamp, identity, sequence);
        Ok(Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            identity,
            time,
            options,
        })
    }

    /// Attempts to mint the next ID without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] under [`RollbackPolicy::Reject`]
    /// - [`Error::TimestampOverflow`] if the clock reading does not fit `ID`
    /// - [`Error::LockPoisoned`] if the state lock was poisoned (std mutex
    ///   only)
    ///
    /// [`Error::ClockMovedBackwards`]: crate::Error::ClockMovedBackwards
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    /// [`Error::LockPoisoned`]: crate::Error
    /// [`RollbackPolicy::Reject`]: crate::RollbackPolicy::Reject
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(identity = self.identity))
    )]
    pub fn try_poll_id(&self) -> Result<IdGenStatus<ID>> {
        let mut id = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = self.time.current_millis();
        let status = advance(*id, now, self.options.rollback)?;
        if let IdGenStatus::Ready { id: next } = status {
            *id = next;
        }
        Ok(status)
    }
}

impl<ID, T> Clone for LockSnowflakeGenerator<ID, T>
where
    ID: Snowflake,
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            identity: self.identity,
            time: self.time.clone(),
            options: self.options,
        }
    }
}

impl<ID, T> SnowflakeGenerator<ID> for LockSnowflakeGenerator<ID, T>
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
