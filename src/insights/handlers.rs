//! JSON endpoints that run the insights over the current user's data.

use std::{collections::BTreeSet, sync::Arc};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    exclusions::ExclusionGroups,
    filter::TransactionFilter,
    insights::{AggregationConfig, aggregate, trend_series},
    store::{InsightsStore, SQLiteInsightsStore},
    user::UserId,
};

/// The request body shared by the insight endpoints.
///
/// Every field is optional, `{}` runs an insight over all of the user's transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightsRequest {
    /// Credit child categories to their parent.
    pub parent_categories_only: bool,
    /// Names of the exclusion groups to leave out.
    pub exclude: Vec<String>,
    /// Shorthand for the `gifts` exclusion group.
    pub exclude_gifts: bool,
    /// Shorthand for the `housing` exclusion group.
    pub exclude_housing: bool,
    /// Shorthand for the `property` exclusion group.
    pub exclude_property: bool,
    /// Shorthand for the `investment` exclusion group.
    pub exclude_investment: bool,
    /// Only include transactions whose description contains this text.
    pub description: Option<String>,
    /// Only include transactions in these categories.
    pub categories: Option<Vec<String>>,
    /// Only include transactions on or after this Unix timestamp.
    pub start_date: Option<i64>,
    /// Only include transactions before this Unix timestamp.
    pub end_date: Option<i64>,
}

impl InsightsRequest {
    /// The requested exclusion group names, including the shorthand flags, without duplicates.
    pub fn exclusion_group_names(&self) -> BTreeSet<&str> {
        let flagged = [
            (self.exclude_gifts, "gifts"),
            (self.exclude_housing, "housing"),
            (self.exclude_property, "property"),
            (self.exclude_investment, "investment"),
        ]
        .into_iter()
        .filter_map(|(is_set, name)| is_set.then_some(name));

        self.exclude.iter().map(String::as_str).chain(flagged).collect()
    }

    /// Resolve the requested exclusion groups into an [AggregationConfig].
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownExclusionGroup] if a requested group is not in `groups`.
    pub fn aggregation_config(&self, groups: &ExclusionGroups) -> Result<AggregationConfig, Error> {
        Ok(AggregationConfig {
            parent_categories_only: self.parent_categories_only,
            exclude_category_ids: groups.resolve(self.exclusion_group_names())?,
        })
    }

    /// The transaction filter described by this request.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDateRange] if the start date is not before the end date.
    pub fn transaction_filter(&self) -> Result<TransactionFilter, Error> {
        TransactionFilter::new(
            self.description.clone(),
            self.categories.clone(),
            self.start_date,
            self.end_date,
        )
    }
}

/// The state needed to compute insights.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// Where the user's transactions and categories are read from.
    pub store: SQLiteInsightsStore,
    /// The category groups that requests may exclude by name.
    pub exclusion_groups: Arc<ExclusionGroups>,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: SQLiteInsightsStore::new(state.db_connection.clone()),
            exclusion_groups: state.exclusion_groups.clone(),
        }
    }
}

/// Respond with `{"data": AggregateResult}` for the current user's filtered transactions.
pub async fn post_category_insights(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<Value>, Error> {
    let config = request.aggregation_config(&state.exclusion_groups)?;
    let filter = request.transaction_filter()?;

    let transactions = state.store.find_transactions(user_id, &filter)?;
    let categories = state.store.find_categories(user_id)?;

    let result = aggregate(
        &transactions,
        &categories,
        &config,
        OffsetDateTime::now_utc(),
    );

    Ok(Json(json!({ "data": result })))
}

/// Respond with `{"data": TrendSeries}` for all of the current user's transactions.
///
/// Exclusion groups apply, the transaction filter fields are ignored.
pub async fn post_totals_insights(
    State(state): State<InsightsState>,
    Extension(user_id): Extension<UserId>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<Value>, Error> {
    let config = request.aggregation_config(&state.exclusion_groups)?;

    let transactions = state
        .store
        .find_transactions(user_id, &TransactionFilter::default())?;

    let series = trend_series(&transactions, &config, OffsetDateTime::now_utc());

    Ok(Json(json!({ "data": series })))
}
