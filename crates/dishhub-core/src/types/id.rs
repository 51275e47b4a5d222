//! Newtype wrappers around opaque platform identifiers.
//!
//! The platform assigns string identifiers. Using distinct types prevents
//! accidentally passing a `FileId` where a `DishId` is expected.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of random hex characters appended after the timestamp part.
const ID_PADDING: usize = 7;

/// Longest identifier the platform accepts.
const MAX_ID_LEN: usize = 36;

/// Generate a fresh identifier: a hex timestamp (seconds, then
/// microseconds padded to five digits) followed by random hex padding.
///
/// Identifiers generated this way sort by creation time.
pub fn unique_id() -> String {
    let now = Utc::now();
    let seconds = now.timestamp();
    let micros = now.timestamp_subsec_micros();
    let mut id = format!("{seconds:x}{micros:05x}");

    let mut rng = rand::rng();
    for _ in 0..ID_PADDING {
        let nibble: u32 = rng.random_range(0..16);
        id.push(char::from_digit(nibble, 16).unwrap_or('0'));
    }
    id
}

/// Error returned when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    /// The identifier was empty.
    #[error("identifier must not be empty")]
    Empty,
    /// The identifier exceeded the platform limit.
    #[error("identifier is longer than {MAX_ID_LEN} characters")]
    TooLong,
    /// The identifier contained a character the platform rejects.
    #[error("identifier contains invalid character '{0}'")]
    InvalidChar(char),
}

fn check_id(s: &str) -> Result<(), IdParseError> {
    if s.is_empty() {
        return Err(IdParseError::Empty);
    }
    if s.len() > MAX_ID_LEN {
        return Err(IdParseError::TooLong);
    }
    if let Some(c) = s
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(IdParseError::InvalidChar(c));
    }
    Ok(())
}

/// Macro to define a newtype ID wrapper around a platform string id.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new, freshly generated identifier.
            pub fn unique() -> Self {
                Self(unique_id())
            }

            /// Wrap an identifier the platform already assigned.
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                check_id(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a dish document.
    DishId
);

define_id!(
    /// Identifier of a file in blob storage.
    FileId
);

define_id!(
    /// Identifier of a platform account.
    UserId
);

define_id!(
    /// Identifier of a platform session.
    SessionId
);

define_id!(
    /// Identifier of a comment embedded in a dish.
    CommentId
);
