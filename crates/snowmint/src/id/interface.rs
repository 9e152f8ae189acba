use core::{fmt, hash::Hash};

use crate::{Error, Result};

/// A packed 64-bit Snowflake identifier with `timestamp`, `identity` and
/// `sequence` fields.
///
/// Layouts are declared with [`define_snowflake_id!`], which fixes the field
/// widths at compile time. All generators in a fleet whose identifiers are
/// compared or merged must agree on the layout and on the clock epoch.
///
/// # Example
///
/// ```
/// use snowmint::{Snowflake, SnowflakeId};
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.identity(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
///
/// [`define_snowflake_id!`]: crate::define_snowflake_id
pub trait Snowflake:
    Copy
    + Clone
    + fmt::Display
    + fmt::Debug
    + PartialOrd
    + Ord
    + PartialEq
    + Eq
    + Hash
    + Send
    + Sync
    + 'static
{
    /// Width of the always-zero high bits.
    const RESERVED_BITS: u32;
    /// Width of the timestamp field.
    const TIMESTAMP_BITS: u32;
    /// Width of the identity field.
    const IDENTITY_BITS: u32;
    /// Width of the sequence field.
    const SEQUENCE_BITS: u32;

    /// Returns the timestamp field (milliseconds since the clock's epoch).
    fn timestamp(&self) -> u64;

    /// Returns the identity field.
    fn identity(&self) -> u64;

    /// Returns the sequence field.
    fn sequence(&self) -> u64;

    /// Largest value the timestamp field can hold.
    fn max_timestamp() -> u64;

    /// Largest value the identity field can hold.
    fn max_identity() -> u64;

    /// Largest value the sequence field can hold.
    fn max_sequence() -> u64;

    /// Packs the three fields into an identifier.
    fn from_components(timestamp: u64, identity: u64, sequence: u64) -> Self;

    /// Returns the packed integer.
    fn to_raw(&self) -> u64;

    /// Wraps a packed integer without validation.
    fn from_raw(raw: u64) -> Self;

    /// Returns `true` if the reserved bits are zero.
    fn is_valid(&self) -> bool;

    /// Returns the identifier as a signed 64-bit integer.
    ///
    /// Valid identifiers keep the top bit clear, so the result is never
    /// negative.
    fn to_i64(&self) -> i64 {
        self.to_raw() as i64
    }

    /// Checks that `identity` fits this layout's identity field.
    ///
    /// Accepts any integer type so that signed inputs (for example an
    /// identity read from configuration) are rejected rather than wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if `identity` is negative or larger
    /// than [`Self::max_identity`].
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{Error, Snowflake, SnowflakeId};
    ///
    /// assert_eq!(SnowflakeId::validate_identity(1023), Ok(1023));
    /// assert!(matches!(
    ///     SnowflakeId::validate_identity(-1),
    ///     Err(Error::InvalidIdentity { .. })
    /// ));
    /// ```
    fn validate_identity(identity: impl Into<i128>) -> Result<u64> {
        let identity = identity.into();
        let max = Self::max_identity();
        if identity < 0 || identity > i128::from(max) {
            return Err(Error::InvalidIdentity { identity, max });
        }
        // In range of [0, max], so the narrowing is lossless
        Ok(identity as u64)
    }

    /// Returns `true` if the sequence can be incremented within the current
    /// millisecond.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.identity(), self.sequence() + 1)
    }

    /// Returns a new ID for timestamp `ts` with the sequence reset to zero.
    fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.identity(), 0)
    }
}
