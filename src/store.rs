//! Defines the store that insights read transactions and categories from.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    filter::TransactionFilter,
    insights::{Category, Transaction},
    user::UserId,
};

/// Retrieves a user's transactions and categories.
pub trait InsightsStore {
    /// Retrieve the transactions of `user_id` that match `filter`, newest first.
    fn find_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error>;

    /// Retrieve all categories of `user_id`.
    fn find_categories(&self, user_id: UserId) -> Result<Vec<Category>, Error>;
}

/// Retrieves transactions and categories from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteInsightsStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteInsightsStore {
    /// Create a new store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl InsightsStore for SQLiteInsightsStore {
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn find_transactions(
        &self,
        user_id: UserId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, Error> {
        let (conditions, filter_params) = filter.sql_conditions();

        let mut query = "SELECT guid, date, amount, category, description
            FROM \"transaction\"
            WHERE user_id = ?"
            .to_owned();
        if !conditions.is_empty() {
            query.push_str(" AND ");
            query.push_str(&conditions);
        }
        query.push_str(" ORDER BY date DESC");

        let mut params = vec![Value::from(user_id.as_i64())];
        params.extend(filter_params);

        let connection = self.lock()?;
        let mut stmt = connection.prepare(&query)?;
        let transactions = stmt
            .query_map(params_from_iter(params), map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;

        // Case folding is done in Rust, SQLite's `lower` only handles ASCII.
        Ok(transactions
            .into_iter()
            .filter(|transaction| filter.matches_description(transaction))
            .collect())
    }

    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn find_categories(&self, user_id: UserId) -> Result<Vec<Category>, Error> {
        let connection = self.lock()?;
        let mut stmt = connection
            .prepare("SELECT guid, name, parent FROM category WHERE user_id = ?1 ORDER BY name")?;

        stmt.query_map([user_id.as_i64()], map_category_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        guid: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
    })
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        guid: row.get(0)?,
        name: row.get(1)?,
        parent: row.get(2)?,
    })
}
