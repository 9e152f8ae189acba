use crate::Snowflake;

/// The outcome of one non-blocking generation attempt.
///
/// - [`IdGenStatus::Ready`] carries a freshly minted ID.
/// - [`IdGenStatus::Pending`] means no ID can be minted until the clock
///   advances by `yield_for` milliseconds. This happens when the sequence
///   for the current millisecond is exhausted, when the clock reads behind
///   the last issued timestamp under [`RollbackPolicy::Wait`], or (with
///   `yield_for == 0`) when a lock-free update lost a race and should be
///   retried immediately.
///
/// # Example
///
/// ```
/// use snowmint::{IdGenStatus, LockSnowflakeGenerator, Snowflake, SnowflakeGenerator, SnowflakeId, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1
///     }
/// }
///
/// let generator = LockSnowflakeGenerator::<SnowflakeId, _>::new(0, FixedTime)?;
/// match generator.try_poll_id()? {
///     IdGenStatus::Ready { id } => println!("ID: {}", id.timestamp()),
///     IdGenStatus::Pending { yield_for } => println!("Back off for {yield_for}ms"),
/// }
/// # Ok::<(), snowmint::Error>(())
/// ```
///
/// [`RollbackPolicy::Wait`]: crate::RollbackPolicy::Wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<ID: Snowflake> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: ID,
    },
    /// No ID could be generated yet.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
