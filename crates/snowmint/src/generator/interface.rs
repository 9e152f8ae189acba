use core::{cmp::Ordering, time::Duration};
use std::time::Instant;

use crate::{Error, GeneratorOptions, IdGenStatus, Result, RollbackPolicy, Snowflake};

/// A concurrency-safe Snowflake ID generator.
///
/// Implementors provide the non-blocking [`try_poll_id`] step. The provided
/// [`generate`] drives it to completion, waiting according to the
/// generator's [`GeneratorOptions`].
///
/// [`try_poll_id`]: SnowflakeGenerator::try_poll_id
/// [`generate`]: SnowflakeGenerator::generate
pub trait SnowflakeGenerator<ID: Snowflake> {
    /// The identity encoded into every ID this generator mints.
    fn identity(&self) -> u64;

    /// The options this generator was built with.
    fn options(&self) -> &GeneratorOptions;

    /// Attempts to mint the next ID without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockMovedBackwards`] under [`RollbackPolicy::Reject`].
    /// - [`Error::TimestampOverflow`] if the clock reading does not fit the
    ///   layout's timestamp field.
    /// - [`Error::LockPoisoned`] if a lock-based generator's state lock was
    ///   poisoned.
    fn try_poll_id(&self) -> Result<IdGenStatus<ID>>;

    /// Mints the next ID, blocking until the clock admits one.
    ///
    /// Successive IDs from one generator are strictly increasing unless the
    /// clock moves backward under [`RollbackPolicy::Reset`].
    ///
    /// # Errors
    ///
    /// - [`Error::ClockStalled`] if a timeout is configured and the clock did
    ///   not advance in time. Waits never run past the timeout, even after a
    ///   large backward clock jump.
    /// - Any error from [`Self::try_poll_id`].
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{AtomicSnowflakeGenerator, SnowflakeGenerator, SnowflakeId, WallClock};
    ///
    /// let generator = AtomicSnowflakeGenerator::<SnowflakeId, _>::new(3, WallClock::default())?;
    /// let a = generator.generate()?;
    /// let b = generator.generate()?;
    /// assert!(a < b);
    /// # Ok::<(), snowmint::Error>(())
    /// ```
    fn generate(&self) -> Result<ID> {
        let options = *self.options();
        let mut stall = StallTimer::new(options.timeout);

        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_for } => {
                    options.backoff.wait(stall.next_wait(yield_for)?);
                }
            }
        }
    }
}

/// Bounds how long one generation call may wait on the clock.
///
/// The timer starts at the first pending state that asks for a real wait. A
/// lost compare-and-swap race (`yield_for == 0`) retries at once and does not
/// start it.
pub(crate) struct StallTimer {
    timeout: Option<Duration>,
    since: Option<Instant>,
}

impl StallTimer {
    pub(crate) const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            since: None,
        }
    }

    /// Returns how long to wait before polling again, never past the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockStalled`] once the timeout has elapsed.
    pub(crate) fn next_wait(&mut self, yield_for: u64) -> Result<Duration> {
        let wait = Duration::from_millis(yield_for);
        let Some(timeout) = self.timeout else {
            return Ok(wait);
        };
        if yield_for == 0 && self.since.is_none() {
            return Ok(wait);
        }

        let waited = self.since.get_or_insert_with(Instant::now).elapsed();
        if waited >= timeout {
            #[cfg(feature = "tracing")]
            tracing::warn!(?waited, ?timeout, "clock stalled");
            return Err(Error::ClockStalled { waited });
        }
        Ok(wait.min(timeout - waited))
    }
}

/// Computes the state that follows `current` when the clock reads `now`.
///
/// `Ready` carries the new state, which is also the ID to hand out. `Pending`
/// leaves the state untouched.
///
/// A clock reading that does not fit the timestamp field is an error: masking
/// it would alias an earlier millisecond and mint duplicates.
pub(crate) fn advance<ID: Snowflake>(
    current: ID,
    now: u64,
    rollback: RollbackPolicy,
) -> Result<IdGenStatus<ID>> {
    if now > ID::max_timestamp() {
        return Err(cold_timestamp_overflow::<ID>(now));
    }

    let current_ts = current.timestamp();
    match now.cmp(&current_ts) {
        Ordering::Equal => {
            if current.has_sequence_room() {
                Ok(IdGenStatus::Ready {
                    id: current.increment_sequence(),
                })
            } else {
                Ok(IdGenStatus::Pending { yield_for: 1 })
            }
        }
        Ordering::Greater => Ok(IdGenStatus::Ready {
            id: current.rollover_to_timestamp(now),
        }),
        Ordering::Less => cold_clock_behind(current, now, rollback),
    }
}

#[cold]
#[inline(never)]
fn cold_timestamp_overflow<ID: Snowflake>(now: u64) -> Error {
    let max = ID::max_timestamp();
    #[cfg(feature = "tracing")]
    tracing::error!(now, max, "clock reading exceeds the timestamp field");
    Error::TimestampOverflow { now, max }
}

#[cold]
#[inline(never)]
fn cold_clock_behind<ID: Snowflake>(
    current: ID,
    now: u64,
    rollback: RollbackPolicy,
) -> Result<IdGenStatus<ID>> {
    let last = current.timestamp();
    match rollback {
        RollbackPolicy::Wait => {
            #[cfg(feature = "tracing")]
            tracing::debug!(last, now, "clock behind last issued timestamp, waiting");
            Ok(IdGenStatus::Pending {
                yield_for: last - now,
            })
        }
        RollbackPolicy::Reject => {
            #[cfg(feature = "tracing")]
            tracing::warn!(last, now, "clock moved backwards, rejecting");
            Err(Error::ClockMovedBackwards { last, now })
        }
        RollbackPolicy::Reset => {
            #[cfg(feature = "tracing")]
            tracing::warn!(last, now, "clock moved backwards, resetting sequence");
            Ok(IdGenStatus::Ready {
                id: current.rollover_to_timestamp(now),
            })
        }
    }
}
