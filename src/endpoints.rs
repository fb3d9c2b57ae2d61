//! The API endpoints URIs.

/// The route for spending totals by category and month.
pub const INSIGHTS_CATEGORY: &str = "/api/insights/category";
/// The route for the monthly expense trend.
pub const INSIGHTS_TOTALS: &str = "/api/insights/totals";
/// The route for listing and saving insight definitions.
pub const INSIGHTS: &str = "/api/insights";
