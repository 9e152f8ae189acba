//! Serde helpers for use with `#[serde(with = "...")]`.
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use snowmint::SnowflakeId;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Event {
//!     #[serde(with = "snowmint::serde::as_native")]
//!     id: SnowflakeId,
//! }
//! ```

/// Serializes an ID as its packed `u64` and rejects integers with reserved
/// bits set on the way back in.
pub mod as_native {
    use ::serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    use crate::Snowflake;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Snowflake,
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or if the
    /// reserved bits are set.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Snowflake,
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        let id = ID::from_raw(raw);
        if !id.is_valid() {
            return Err(de::Error::custom(format_args!(
                "{raw} sets reserved bits and is not a valid identifier"
            )));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use ::serde::{Deserialize, Serialize};

    use crate::{Snowflake, SnowflakeId};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Event {
        #[serde(with = "crate::serde::as_native")]
        id: SnowflakeId,
    }

    #[test]
    fn serializes_as_integer() {
        let event = Event {
            id: SnowflakeId::from_components(5000, 17, 3),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, format!("{{\"id\":{}}}", (5000_u64 << 22) | (17 << 12) | 3));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn rejects_reserved_bits() {
        let json = format!("{{\"id\":{}}}", 1_u64 << 63);
        let err = serde_json::from_str::<Event>(&json).unwrap_err();
        assert!(err.to_string().contains("reserved bits"));
    }
}
