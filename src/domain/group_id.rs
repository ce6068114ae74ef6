//! Validated document group identifier.
//!
//! A [`GroupId`] can only be obtained through [`GroupId::parse`], so every
//! identifier that reaches the [`super::MembershipRegistry`] has already
//! passed the blank/length checks.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::RelayError;

/// Maximum length of a group identifier, in characters.
pub const MAX_GROUP_ID_LEN: usize = 256;

/// Identifier of one collaboratively edited document.
///
/// The raw string is kept as supplied by the client: no trimming or case
/// folding is applied, so `"doc1"` and `" doc1"` name different groups.
/// Cloning is cheap (shared `Arc<str>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(Arc<str>);

impl GroupId {
    /// Validates `raw` and wraps it as a `GroupId`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidGroupId`] if `raw` is empty or
    /// whitespace-only, or longer than [`MAX_GROUP_ID_LEN`] characters.
    pub fn parse(raw: &str) -> Result<Self, RelayError> {
        if raw.trim().is_empty() {
            return Err(RelayError::InvalidGroupId(
                "group id must not be blank".to_string(),
            ));
        }
        if raw.chars().count() > MAX_GROUP_ID_LEN {
            return Err(RelayError::InvalidGroupId(format!(
                "group id exceeds {MAX_GROUP_ID_LEN} characters"
            )));
        }
        Ok(Self(Arc::from(raw)))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
