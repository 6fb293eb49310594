//! Dwelling categories that partition the record store for training.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Heating-source category of a dwelling.
///
/// Each category is clustered independently; labels from different
/// categories are unrelated even when numerically equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// The dwelling has a heating source.
    #[serde(rename = "Yes")]
    HeatingPresent,
    /// The dwelling has no heating source.
    #[serde(rename = "No")]
    HeatingAbsent,
}

impl Category {
    /// All recognized categories, in training order.
    pub const ALL: [Category; 2] = [Category::HeatingPresent, Category::HeatingAbsent];

    /// Tag used for this category in stored records.
    pub fn tag(&self) -> &'static str {
        match self {
            Category::HeatingPresent => "Yes",
            Category::HeatingAbsent => "No",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Yes" | "yes" | "heating-present" => Ok(Category::HeatingPresent),
            "No" | "no" | "heating-absent" => Ok(Category::HeatingAbsent),
            other => Err(Error::InvalidCategory(other.to_string())),
        }
    }
}
