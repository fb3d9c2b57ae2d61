//! Monthly expense totals over time.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::insights::{
    aggregate::{canonical_order, included_month},
    models::{AggregationConfig, Transaction, TrendSeries},
};

/// Sum the expenses in `transactions` per month, ignoring categories.
///
/// Only transactions with a negative amount are counted, and the same date
/// and exclusion rules as [aggregate](super::aggregate) apply. The totals
/// are positive magnitudes and the months are ordered from newest to oldest.
pub fn trend_series(
    transactions: &[Transaction],
    config: &AggregationConfig,
    now: OffsetDateTime,
) -> TrendSeries {
    let mut months: BTreeMap<i64, f64> = BTreeMap::new();

    for transaction in canonical_order(transactions) {
        if transaction.amount >= 0.0 {
            continue;
        }

        if let Some((_, month)) = included_month(transaction, config, now) {
            *months.entry(month.unix_timestamp()).or_insert(0.0) += transaction.amount;
        }
    }

    let (timestamps, totals) = months
        .into_iter()
        .rev()
        .map(|(timestamp, total)| (timestamp.to_string(), total.abs()))
        .unzip();

    TrendSeries { timestamps, totals }
}
