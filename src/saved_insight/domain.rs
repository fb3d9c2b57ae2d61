//! Core saved insight domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, user::UserId};

/// A validated, non-empty insight type, e.g. `"category"` or `"totals"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
pub struct InsightType(String);

impl InsightType {
    /// Create an insight type.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyInsightType] if `insight_type` is empty or
    /// only whitespace.
    pub fn new(insight_type: &str) -> Result<Self, Error> {
        let insight_type = insight_type.trim();

        if insight_type.is_empty() {
            Err(Error::EmptyInsightType)
        } else {
            Ok(Self(insight_type.to_owned()))
        }
    }

    /// Create an insight type without validation, for values read back from the database.
    pub(crate) fn new_unchecked(insight_type: String) -> Self {
        Self(insight_type)
    }
}

impl AsRef<str> for InsightType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for InsightType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The request body for saving an insight.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavedInsight {
    /// Which insight to run, must not be empty.
    #[serde(rename = "type")]
    pub insight_type: String,
    /// Category guids the insight is restricted to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Case-insensitive description substring to filter by.
    #[serde(default)]
    pub description: Option<String>,
    /// Unix timestamp where the insight's date range starts, inclusive.
    #[serde(default)]
    pub start_date: Option<i64>,
    /// Unix timestamp where the insight's date range ends, exclusive.
    #[serde(default)]
    pub end_date: Option<i64>,
    /// Credit child categories to their parent.
    #[serde(default)]
    pub parent_categories_only: bool,
}

/// An insight definition stored for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInsight {
    /// Unique identifier of the saved insight.
    pub guid: String,
    /// The user that saved the insight.
    pub user_id: UserId,
    /// Which insight to run.
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    /// Category guids the insight is restricted to, empty for all categories.
    pub categories: Vec<String>,
    /// Case-insensitive description substring to filter by.
    pub description: Option<String>,
    /// Unix timestamp where the insight's date range starts, inclusive.
    pub start_date: Option<i64>,
    /// Unix timestamp where the insight's date range ends, exclusive.
    pub end_date: Option<i64>,
    /// Credit child categories to their parent.
    pub parent_categories_only: bool,
}
