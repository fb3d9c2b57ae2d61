//! Spending insights: totals by category and month, and the monthly expense trend.

mod aggregate;
mod handlers;
mod models;
mod month;
mod trend;

pub use aggregate::{CategoryHierarchy, aggregate};
pub use handlers::{InsightsRequest, InsightsState, post_category_insights, post_totals_insights};
pub use models::{
    AggregateResult, AggregationConfig, Buckets, Category, TOTAL_KEY, TOTAL_LABEL, Transaction,
    TrendSeries, UNCATEGORIZED_KEY, UNCATEGORIZED_LABEL,
};
pub use month::{Elapsed, month_key, month_start, months_between};
pub use trend::trend_series;
