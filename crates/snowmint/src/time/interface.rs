use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Sunday, January 1, 2017 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_483_228_800_000);

/// Unix epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// A source of millisecond timestamps relative to a fixed epoch.
///
/// Generators read the clock once per attempt. Plugging in a mocked source
/// makes the sequencing logic deterministic in tests.
///
/// # Example
///
/// ```
/// use snowmint::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the number of milliseconds elapsed since the epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
