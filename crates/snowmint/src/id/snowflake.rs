/// Declares a [`Snowflake`] layout over a `u64`.
///
/// The identifier is packed from **MSB to LSB**:
///
/// ```text
///  Bit Index:  63                                                            0
///              +--------------+---------------+--------------+--------------+
///  Field:      | reserved (R) | timestamp (T) | identity (I) | sequence (S) |
///              +--------------+---------------+--------------+--------------+
/// ```
///
/// All 64 bits must be accounted for, otherwise a compile-time assertion
/// fails. Reserved bits are always zero in generated identifiers, which keeps
/// them non-negative when read as `i64`.
///
/// ## Example
///
/// ```
/// use snowmint::{define_snowflake_id, Snowflake};
///
/// define_snowflake_id!(
///     /// 8 identity bits, 14 sequence bits.
///     DenseId,
///     reserved: 1,
///     timestamp: 41,
///     identity: 8,
///     sequence: 14
/// );
///
/// let id = DenseId::from_components(5, 255, 16_383);
/// assert_eq!(id.identity(), 255);
/// assert_eq!(DenseId::max_sequence(), 16_383);
/// ```
///
/// [`Snowflake`]: crate::Snowflake
#[macro_export]
macro_rules! define_snowflake_id {
    (
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        identity: $identity_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            id: u64,
        }

        const _: () = {
            // Compile-time check: total bit width _must_ equal 64. This is to
            // avoid aliasing surprises.
            assert!(
                $reserved_bits + $timestamp_bits + $identity_bits + $sequence_bits == u64::BITS,
                "Snowflake layout must cover exactly 64 bits"
            );
            assert!($reserved_bits >= 1, "Snowflake layout needs a reserved sign bit");
        };

        impl $name {
            pub const RESERVED_BITS: u32 = $reserved_bits;
            pub const TIMESTAMP_BITS: u32 = $timestamp_bits;
            pub const IDENTITY_BITS: u32 = $identity_bits;
            pub const SEQUENCE_BITS: u32 = $sequence_bits;

            pub const SEQUENCE_SHIFT: u32 = 0;
            pub const IDENTITY_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
            pub const TIMESTAMP_SHIFT: u32 = Self::IDENTITY_SHIFT + Self::IDENTITY_BITS;
            pub const RESERVED_SHIFT: u32 = Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS;

            pub const RESERVED_MASK: u64 = (1 << Self::RESERVED_BITS) - 1;
            pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
            pub const IDENTITY_MASK: u64 = (1 << Self::IDENTITY_BITS) - 1;
            pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

            /// Packs the fields, truncating each to its width.
            pub const fn from(timestamp: u64, identity: u64, sequence: u64) -> Self {
                let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let i = (identity & Self::IDENTITY_MASK) << Self::IDENTITY_SHIFT;
                let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self { id: t | i | s }
            }

            /// Extracts the timestamp from the packed ID.
            pub const fn timestamp(&self) -> u64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the identity from the packed ID.
            pub const fn identity(&self) -> u64 {
                (self.id >> Self::IDENTITY_SHIFT) & Self::IDENTITY_MASK
            }

            /// Extracts the sequence number from the packed ID.
            pub const fn sequence(&self) -> u64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            pub const fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            pub const fn max_identity() -> u64 {
                Self::IDENTITY_MASK
            }

            pub const fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            /// Returns the ID as a zero-padded 20-digit string.
            pub fn to_padded_string(&self) -> String {
                format!("{:020}", self.id)
            }
        }

        impl $crate::Snowflake for $name {
            const RESERVED_BITS: u32 = $reserved_bits;
            const TIMESTAMP_BITS: u32 = $timestamp_bits;
            const IDENTITY_BITS: u32 = $identity_bits;
            const SEQUENCE_BITS: u32 = $sequence_bits;

            fn timestamp(&self) -> u64 {
                self.timestamp()
            }

            fn identity(&self) -> u64 {
                self.identity()
            }

            fn sequence(&self) -> u64 {
                self.sequence()
            }

            fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            fn max_identity() -> u64 {
                Self::IDENTITY_MASK
            }

            fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            fn from_components(timestamp: u64, identity: u64, sequence: u64) -> Self {
                debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
                debug_assert!(identity <= Self::IDENTITY_MASK, "identity overflow");
                debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
                Self::from(timestamp, identity, sequence)
            }

            fn to_raw(&self) -> u64 {
                self.id
            }

            fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }

            fn is_valid(&self) -> bool {
                ((self.id >> Self::RESERVED_SHIFT) & Self::RESERVED_MASK) == 0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let full = core::any::type_name::<Self>();
                let name = full.rsplit("::").next().unwrap_or(full);
                f.debug_struct(name)
                    .field("id", &format_args!("{} (0x{:016x})", self.id, self.id))
                    .field("timestamp", &self.timestamp())
                    .field("identity", &self.identity())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.id
            }
        }
    };
}

define_snowflake_id!(
    /// The default 64-bit layout.
    ///
    /// - 1 bit reserved
    /// - 41 bits timestamp (ms since the clock's epoch, about 69 years)
    /// - 10 bits identity (1024 generators)
    /// - 12 bits sequence (4096 IDs per millisecond per generator)
    ///
    /// ```text
    ///  Bit Index:  63           63 62            22 21             12 11             0
    ///              +--------------+----------------+-----------------+---------------+
    ///  Field:      | reserved (1) | timestamp (41) | identity (10)   | sequence (12) |
    ///              +--------------+----------------+-----------------+---------------+
    ///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
    /// ```
    SnowflakeId,
    reserved: 1,
    timestamp: 41,
    identity: 10,
    sequence: 12
);

define_snowflake_id!(
    /// A layout trading timestamp range for a wider identity space.
    ///
    /// - 1 bit reserved
    /// - 39 bits timestamp (about 17 years)
    /// - 12 bits identity (4096 generators)
    /// - 12 bits sequence
    ///
    /// ```text
    ///  Bit Index:  63           63 62            24 23             12 11             0
    ///              +--------------+----------------+-----------------+---------------+
    ///  Field:      | reserved (1) | timestamp (39) | identity (12)   | sequence (12) |
    ///              +--------------+----------------+-----------------+---------------+
    /// ```
    SnowflakeWideId,
    reserved: 1,
    timestamp: 39,
    identity: 12,
    sequence: 12
);
