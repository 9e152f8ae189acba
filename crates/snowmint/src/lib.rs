//! # snowmint
//!
//! Coordinator-free, time-ordered 64-bit identifiers in the Snowflake style.
//!
//! Each identifier packs three fields, most-significant first:
//!
//! ```text
//!  Bit Index:  63           63 62            22 21              12 11             0
//!              +--------------+----------------+------------------+---------------+
//!  Field:      | reserved (1) | timestamp (41) | identity (10)    | sequence (12) |
//!              +--------------+----------------+------------------+---------------+
//! ```
//!
//! The identity is assigned out-of-band and validated at construction. The
//! timestamp counts milliseconds since the epoch carried by the clock, and the
//! sequence distinguishes identifiers minted within one millisecond.
//!
//! ```
//! use snowmint::{LockSnowflakeGenerator, SnowflakeGenerator, SnowflakeId, WallClock};
//!
//! let generator = LockSnowflakeGenerator::<SnowflakeId, _>::new(7, WallClock::default())?;
//! let id = generator.generate()?;
//! assert_eq!(id.identity(), 7);
//! # Ok::<(), snowmint::Error>(())
//! ```

mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
pub mod global;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::error::*;
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
