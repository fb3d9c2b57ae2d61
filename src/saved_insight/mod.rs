//! Insight definitions that users save to re-run later.

mod create;
mod db;
mod domain;
mod list;

pub use create::create_saved_insight_endpoint;
pub use db::{create_insight_table, create_saved_insight, list_saved_insights};
pub use domain::{InsightType, NewSavedInsight, SavedInsight};
pub use list::get_saved_insights_endpoint;
