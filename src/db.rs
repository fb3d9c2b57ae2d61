/*! Creates the application's database schema and inserts the records that insights are computed from. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error,
    insights::{Category, Transaction},
    saved_insight::create_insight_table,
    user::UserId,
};

/// Create the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            guid TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            parent TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

/// Create the transaction table.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            guid TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            date INTEGER NOT NULL,
            amount REAL NOT NULL,
            category TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Create all of the database tables for the application.
///
/// The tables are created inside a single exclusive transaction, so either
/// all of the tables are created or none are.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_insight_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert `category` for the user `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the guid already exists or there is another SQL error.
pub fn create_category(
    user_id: UserId,
    category: &Category,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO category (guid, user_id, name, parent) VALUES (?1, ?2, ?3, ?4)",
        (
            &category.guid,
            user_id.as_i64(),
            &category.name,
            &category.parent,
        ),
    )?;

    Ok(())
}

/// Insert `transaction` for the user `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the guid already exists or there is another SQL error.
pub fn create_transaction(
    user_id: UserId,
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (guid, user_id, description, date, amount, category)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            &transaction.guid,
            user_id.as_i64(),
            &transaction.description,
            transaction.date,
            transaction.amount,
            &transaction.category,
        ),
    )?;

    Ok(())
}
