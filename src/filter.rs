//! Caller-side filters that select which transactions are fetched for an insight.

use std::ops::Range;

use rusqlite::types::Value;

use crate::{Error, insights::Transaction};

/// Restricts the transactions fetched from the store.
///
/// Every filter that is set must match for a transaction to be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    /// The transaction's category must be one of these guids.
    pub categories: Option<Vec<String>>,
    /// Unix timestamps, start inclusive and end exclusive.
    pub date_range: Option<Range<i64>>,
}

impl TransactionFilter {
    /// Create a filter from optional request fields.
    ///
    /// Empty descriptions and category lists are treated as unset. The date
    /// range is only applied when both `start_date` and `end_date` are given.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidDateRange] if `start_date` is not before `end_date`.
    pub fn new(
        description: Option<String>,
        categories: Option<Vec<String>>,
        start_date: Option<i64>,
        end_date: Option<i64>,
    ) -> Result<Self, Error> {
        let date_range = match (start_date, end_date) {
            (Some(start), Some(end)) if start >= end => return Err(Error::InvalidDateRange),
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        };

        Ok(Self {
            description: description.filter(|description| !description.trim().is_empty()),
            categories: categories.filter(|categories| !categories.is_empty()),
            date_range,
        })
    }

    /// Whether `transaction` is selected by this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let description_matches = self.matches_description(transaction);

        let category_matches = self.categories.as_ref().is_none_or(|categories| {
            transaction
                .category
                .as_ref()
                .is_some_and(|category| categories.contains(category))
        });

        let date_matches = self
            .date_range
            .as_ref()
            .is_none_or(|range| range.contains(&transaction.date));

        description_matches && category_matches && date_matches
    }

    /// Whether the description of `transaction` contains the description
    /// filter, ignoring case.
    pub fn matches_description(&self, transaction: &Transaction) -> bool {
        self.description.as_ref().is_none_or(|needle| {
            transaction
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }

    /// The SQL conditions for the category and date filters, joined with `AND`,
    /// and their parameters.
    ///
    /// The description is not included because SQLite's `lower` only folds
    /// ASCII. Callers apply it with [TransactionFilter::matches_description].
    /// Returns an empty string when no category or date filter is set.
    pub(crate) fn sql_conditions(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(categories) = &self.categories {
            let placeholders = categories.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            conditions.push(format!("category IN ({placeholders})"));
            params.extend(categories.iter().cloned().map(Value::from));
        }

        if let Some(range) = &self.date_range {
            conditions.push("date >= ? AND date < ?".to_owned());
            params.push(Value::from(range.start));
            params.push(Value::from(range.end));
        }

        (conditions.join(" AND "), params)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, insights::Transaction};

    use super::TransactionFilter;

    fn transaction(description: &str, date: i64, category: Option<&str>) -> Transaction {
        Transaction {
            guid: "guid".to_owned(),
            date,
            amount: -1.0,
            category: category.map(str::to_owned),
            description: description.to_owned(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TransactionFilter::default();

        assert!(filter.matches(&transaction("Coffee", 0, None)));
        assert_eq!(filter.sql_conditions(), (String::new(), Vec::new()));
    }

    #[test]
    fn description_matches_case_insensitive_substring() {
        let filter = TransactionFilter::new(Some("coffee".to_owned()), None, None, None).unwrap();

        assert!(filter.matches(&transaction("Morning COFFEE run", 0, None)));
        assert!(!filter.matches(&transaction("Tea", 0, None)));
    }

    #[test]
    fn categories_must_contain_transaction_category() {
        let filter = TransactionFilter::new(
            None,
            Some(vec!["food".to_owned(), "rent".to_owned()]),
            None,
            None,
        )
        .unwrap();

        assert!(filter.matches(&transaction("", 0, Some("rent"))));
        assert!(!filter.matches(&transaction("", 0, Some("fuel"))));
        assert!(!filter.matches(&transaction("", 0, None)));
    }

    #[test]
    fn date_range_is_half_open() {
        let filter = TransactionFilter::new(None, None, Some(100), Some(200)).unwrap();

        assert!(filter.matches(&transaction("", 100, None)));
        assert!(filter.matches(&transaction("", 199, None)));
        assert!(!filter.matches(&transaction("", 200, None)));
        assert!(!filter.matches(&transaction("", 99, None)));
    }

    #[test]
    fn date_range_needs_both_ends() {
        let filter = TransactionFilter::new(None, None, Some(100), None).unwrap();

        assert_eq!(filter.date_range, None);
    }

    #[test]
    fn rejects_backwards_date_range() {
        let result = TransactionFilter::new(None, None, Some(200), Some(100));

        assert_eq!(result, Err(Error::InvalidDateRange));
    }

    #[test]
    fn empty_fields_are_unset() {
        let filter = TransactionFilter::new(Some("  ".to_owned()), Some(vec![]), None, None).unwrap();

        assert_eq!(filter, TransactionFilter::default());
    }

    #[test]
    fn sql_conditions_list_parameters_in_order() {
        let filter = TransactionFilter::new(
            Some("bus".to_owned()),
            Some(vec!["a".to_owned(), "b".to_owned()]),
            Some(1),
            Some(2),
        )
        .unwrap();

        let (conditions, params) = filter.sql_conditions();

        assert_eq!(conditions, "category IN (?,?) AND date >= ? AND date < ?");
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn description_matches_non_ascii_case_insensitively() {
        let filter = TransactionFilter::new(Some("CAFÉ".to_owned()), None, None, None).unwrap();

        assert!(filter.matches(&transaction("Café Ümlaut", 0, None)));
        assert!(filter.sql_conditions().0.is_empty());
    }
}
