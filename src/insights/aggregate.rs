//! Sums a user's transactions by category, over their whole history and per month.

use std::collections::{BTreeMap, HashMap};

use time::OffsetDateTime;

use crate::insights::{
    models::{
        AggregateResult, AggregationConfig, Buckets, Category, TOTAL_KEY, TOTAL_LABEL,
        Transaction, UNCATEGORIZED_KEY, UNCATEGORIZED_LABEL,
    },
    month::{Elapsed, month_start},
};

/// The parent and name of every known category.
#[derive(Debug)]
pub struct CategoryHierarchy<'c> {
    parents: HashMap<&'c str, Option<&'c str>>,
    names: HashMap<&'c str, &'c str>,
}

impl<'c> CategoryHierarchy<'c> {
    /// Index `categories` by guid.
    ///
    /// Categories whose guid is a reserved bucket key ([TOTAL_KEY] or
    /// [UNCATEGORIZED_KEY]) are left out, so they behave like unknown categories.
    pub fn new(categories: &'c [Category]) -> Self {
        let mut parents = HashMap::with_capacity(categories.len());
        let mut names = HashMap::with_capacity(categories.len());

        for category in categories {
            if matches!(category.guid.as_str(), TOTAL_KEY | UNCATEGORIZED_KEY) {
                tracing::debug!(
                    "skipping category {:?} with a reserved guid",
                    category.name
                );
                continue;
            }

            parents.insert(category.guid.as_str(), category.parent.as_deref());
            names.insert(category.guid.as_str(), category.name.as_str());
        }

        Self { parents, names }
    }

    /// The parent of the category `guid`.
    ///
    /// Returns `None` for unknown categories and `Some(None)` for top-level categories.
    pub fn parent_of(&self, guid: &str) -> Option<Option<&'c str>> {
        self.parents.get(guid).copied()
    }

    /// The display name of the category `guid`.
    pub fn name_of(&self, guid: &str) -> Option<&'c str> {
        self.names.get(guid).copied()
    }

    /// The bucket that a transaction in `category` is credited to.
    ///
    /// With `rollup`, categories with a parent are credited to the parent. Only
    /// one hop is resolved, so a category that is its own parent resolves to
    /// itself. Returns `None` when the category, or the parent it rolls up to,
    /// is unknown.
    pub fn bucket_key(&self, category: Option<&str>, rollup: bool) -> Option<&'c str> {
        let Some(guid) = category else {
            return Some(UNCATEGORIZED_KEY);
        };

        let (&guid, &parent) = self.parents.get_key_value(guid)?;

        match parent {
            Some(parent) if rollup => self.parents.get_key_value(parent).map(|(&key, _)| key),
            _ => Some(guid),
        }
    }

    /// A zero amount for every bucket that can receive transactions, and [TOTAL_KEY].
    fn zeroed_buckets(&self, rollup: bool) -> Buckets {
        let mut buckets: Buckets = self
            .parents
            .keys()
            .filter(|&&guid| self.bucket_key(Some(guid), rollup) == Some(guid))
            .map(|&guid| (guid.to_owned(), 0.0))
            .collect();

        buckets.insert(UNCATEGORIZED_KEY.to_owned(), 0.0);
        buckets.insert(TOTAL_KEY.to_owned(), 0.0);
        buckets
    }

    fn display_name(&self, key: &str) -> Option<&'c str> {
        match key {
            TOTAL_KEY => Some(TOTAL_LABEL),
            UNCATEGORIZED_KEY => Some(UNCATEGORIZED_LABEL),
            guid => self.name_of(guid),
        }
    }
}

/// Sum `transactions` by category and month.
///
/// Transactions dated after `now`, in excluded categories, or with defects
/// such as a dangling category reference are skipped. The result does not
/// depend on the order of `transactions`.
pub fn aggregate(
    transactions: &[Transaction],
    categories: &[Category],
    config: &AggregationConfig,
    now: OffsetDateTime,
) -> AggregateResult {
    let hierarchy = CategoryHierarchy::new(categories);
    let template = hierarchy.zeroed_buckets(config.parent_categories_only);

    let mut lifetime_totals = template.clone();
    let mut monthly_totals: BTreeMap<String, Buckets> = BTreeMap::new();
    let mut earliest: Option<OffsetDateTime> = None;

    for transaction in canonical_order(transactions) {
        let Some((date, month)) = included_month(transaction, config, now) else {
            continue;
        };

        let Some(bucket) = hierarchy.bucket_key(
            transaction.category.as_deref(),
            config.parent_categories_only,
        ) else {
            tracing::debug!(
                "skipping transaction {} with unknown category {:?}",
                transaction.guid,
                transaction.category
            );
            continue;
        };

        earliest = Some(earliest.map_or(date, |earliest| earliest.min(date)));

        let month_buckets = monthly_totals
            .entry(month.unix_timestamp().to_string())
            .or_insert_with(|| template.clone());

        for buckets in [month_buckets, &mut lifetime_totals] {
            *buckets.entry(bucket.to_owned()).or_insert(0.0) += transaction.amount;
            *buckets.entry(TOTAL_KEY.to_owned()).or_insert(0.0) += transaction.amount;
        }
    }

    let elapsed = earliest.and_then(|earliest| Elapsed::between(earliest, now));
    let mut category_names = BTreeMap::new();
    let mut monthly_average = Buckets::new();
    let mut daily_average = Buckets::new();

    // Buckets that sum to zero keep their entries but lose their names.
    for (key, &total) in &lifetime_totals {
        if total == 0.0 {
            continue;
        }

        if let Some(name) = hierarchy.display_name(key) {
            category_names.insert(key.clone(), name.to_owned());
        }

        if let Some(elapsed) = elapsed {
            daily_average.insert(key.clone(), total / elapsed.days);
            monthly_average.insert(key.clone(), total / elapsed.months);
        }
    }

    AggregateResult {
        category_names,
        lifetime_totals,
        monthly_totals,
        monthly_average,
        daily_average,
    }
}

/// `transactions` sorted by date, guid and amount.
///
/// Floating point addition is not associative, so summing in a fixed order
/// keeps results identical for any permutation of the input.
pub(super) fn canonical_order(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.guid.cmp(&b.guid))
            .then_with(|| a.amount.total_cmp(&b.amount))
    });
    ordered
}

/// The date of `transaction` and the start of the month it is counted in, or
/// `None` if it should be skipped.
pub(super) fn included_month(
    transaction: &Transaction,
    config: &AggregationConfig,
    now: OffsetDateTime,
) -> Option<(OffsetDateTime, OffsetDateTime)> {
    if !transaction.amount.is_finite() {
        tracing::debug!(
            "skipping transaction {} with invalid amount {}",
            transaction.guid,
            transaction.amount
        );
        return None;
    }

    let Ok(date) = OffsetDateTime::from_unix_timestamp(transaction.date) else {
        tracing::debug!(
            "skipping transaction {} with unrepresentable date {}",
            transaction.guid,
            transaction.date
        );
        return None;
    };

    if date > now || config.is_excluded(transaction.category.as_deref()) {
        return None;
    }

    month_start(transaction.date).map(|month| (date, month))
}
