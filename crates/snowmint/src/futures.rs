use core::future::Future;

use crate::{IdGenStatus, Result, Snowflake, SnowflakeGenerator, generator::StallTimer};

/// Extension trait for minting IDs from inside the
/// [`tokio`](https://docs.rs/tokio) runtime without blocking a worker thread.
///
/// Pending states are awaited with [`tokio::time::sleep`], or
/// [`tokio::task::yield_now`] when the generator asks for an immediate retry.
/// The generator's [`Backoff`] is ignored here; its rollback policy and
/// timeout still apply.
///
/// [`Backoff`]: crate::Backoff
pub trait SnowflakeGeneratorAsyncExt<ID: Snowflake> {
    /// Returns a future that resolves to the next available ID.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockStalled`] if a timeout is configured and the clock did
    ///   not advance in time.
    /// - [`Error::TimestampOverflow`] if the clock reading does not fit the
    ///   layout.
    /// - Any error from [`SnowflakeGenerator::try_poll_id`].
    ///
    /// [`Error::ClockStalled`]: crate::Error::ClockStalled
    /// [`Error::TimestampOverflow`]: crate::Error::TimestampOverflow
    fn generate_async(&self) -> impl Future<Output = Result<ID>> + Send;
}

impl<G, ID> SnowflakeGeneratorAsyncExt<ID> for G
where
    G: SnowflakeGenerator<ID> + Sync,
    ID: Snowflake,
{
    fn generate_async(&self) -> impl Future<Output = Result<ID>> + Send {
        async move {
            let mut stall = StallTimer::new(self.options().timeout);

            loop {
                let yield_for = match self.try_poll_id()? {
                    IdGenStatus::Ready { id } => return Ok(id),
                    IdGenStatus::Pending { yield_for } => yield_for,
                };

                let wait = stall.next_wait(yield_for)?;
                if wait.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}
