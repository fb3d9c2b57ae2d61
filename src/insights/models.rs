//! The records consumed and produced by the aggregation engine.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// The bucket key that holds the sum of every other bucket.
pub const TOTAL_KEY: &str = "total";
/// The display name of the [TOTAL_KEY] bucket.
pub const TOTAL_LABEL: &str = "All spending";
/// The bucket key for transactions without a category.
pub const UNCATEGORIZED_KEY: &str = "uncategorized";
/// The display name of the [UNCATEGORIZED_KEY] bucket.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// A single income or expense event.
///
/// Negative amounts are expenses, positive amounts are income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier of the transaction.
    pub guid: String,
    /// Unix timestamp in seconds.
    pub date: i64,
    /// The signed amount of money.
    pub amount: f64,
    /// The guid of the transaction's category, `None` if uncategorized.
    pub category: Option<String>,
    /// Free text describing the transaction.
    pub description: String,
}

/// A category that transactions can be assigned to.
///
/// Categories form a forest through their `parent` references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier of the category.
    pub guid: String,
    /// The display name.
    pub name: String,
    /// The guid of the parent category, `None` for top-level categories.
    pub parent: Option<String>,
}

/// Controls which transactions are aggregated and how they are bucketed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Credit transactions in child categories to their parent category.
    pub parent_categories_only: bool,
    /// Transactions in these categories are skipped entirely.
    pub exclude_category_ids: HashSet<String>,
}

impl AggregationConfig {
    pub(crate) fn is_excluded(&self, category: Option<&str>) -> bool {
        category.is_some_and(|guid| self.exclude_category_ids.contains(guid))
    }
}

/// Amounts keyed by category guid, plus [TOTAL_KEY].
pub type Buckets = BTreeMap<String, f64>;

/// Spending broken down by category, over the whole history and per month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Display names for every bucket with a nonzero lifetime total.
    #[serde(rename = "categoryNames")]
    pub category_names: BTreeMap<String, String>,
    /// Sums over every included transaction.
    #[serde(rename = "full")]
    pub lifetime_totals: Buckets,
    /// Sums per month, keyed by the month key (see [month_key](super::month_key)).
    #[serde(rename = "monthly")]
    pub monthly_totals: BTreeMap<String, Buckets>,
    /// Lifetime totals divided by the number of months since the first transaction.
    #[serde(rename = "monthlyAverage")]
    pub monthly_average: Buckets,
    /// Lifetime totals divided by the number of days since the first transaction.
    #[serde(rename = "dailyAverage")]
    pub daily_average: Buckets,
}

/// Monthly expense magnitudes for trend charts.
///
/// `timestamps[i]` is a month key and `totals[i]` is the absolute value of the
/// expenses in that month. Timestamps are ordered from newest to oldest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    /// Month keys, newest first.
    pub timestamps: Vec<String>,
    /// The expense magnitude of the month at the same index.
    pub totals: Vec<f64>,
}
