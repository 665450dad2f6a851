//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers exchanged with the ads platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Click identifier (gclid) newtype wrapper
///
/// Correlates an ad click with a later offline conversion. A `ClickId` is
/// never empty or whitespace-only, so holding one proves the record passed
/// the identifier filter.
///
/// # Examples
///
/// ```
/// use conversion_relay::domain::ids::ClickId;
/// use std::str::FromStr;
///
/// let gclid = ClickId::from_str("ABC123").unwrap();
/// assert_eq!(gclid.as_str(), "ABC123");
/// assert!(ClickId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClickId(String);

impl ClickId {
    /// Creates a new ClickId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClickId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Click ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the click ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ClickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClickId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClickId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClickId> for String {
    fn from(id: ClickId) -> Self {
        id.0
    }
}

impl AsRef<str> for ClickId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Conversion action identifier assigned by the ads platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionId(String);

impl ActionId {
    /// Creates a new ActionId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Conversion action ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the action ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ActionId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActionId> for String {
    fn from(id: ActionId) -> Self {
        id.0
    }
}
