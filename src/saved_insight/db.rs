//! Database operations for saved insights.

use rusqlite::{Connection, Row, types::Type};
use serde_json::Value;

use crate::{
    Error,
    saved_insight::{InsightType, NewSavedInsight, SavedInsight},
    user::UserId,
};

/// The most insights returned by [list_saved_insights].
pub const SAVED_INSIGHT_LIMIT: u32 = 100;

/// Validate `new_insight`, store it for `user_id` and return it with its generated guid.
///
/// # Errors
///
/// Returns [Error::EmptyInsightType] if the type is empty, [Error::InvalidDateRange] if both
/// dates are given and the start is not before the end, or [Error::SqlError] on an SQL error.
pub fn create_saved_insight(
    user_id: UserId,
    new_insight: NewSavedInsight,
    connection: &Connection,
) -> Result<SavedInsight, Error> {
    let insight_type = InsightType::new(&new_insight.insight_type)?;

    if matches!(
        (new_insight.start_date, new_insight.end_date),
        (Some(start), Some(end)) if start >= end
    ) {
        return Err(Error::InvalidDateRange);
    }

    let insight = SavedInsight {
        guid: uuid::Uuid::new_v4().simple().to_string(),
        user_id,
        insight_type,
        categories: new_insight.categories,
        description: new_insight.description,
        start_date: new_insight.start_date,
        end_date: new_insight.end_date,
        parent_categories_only: new_insight.parent_categories_only,
    };

    connection.execute(
        "INSERT INTO insight
            (guid, user_id, type, categories, description, start_date, end_date, parent_categories_only)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            &insight.guid,
            user_id.as_i64(),
            insight.insight_type.as_ref(),
            Value::from(insight.categories.clone()).to_string(),
            &insight.description,
            insight.start_date,
            insight.end_date,
            insight.parent_categories_only,
        ),
    )?;

    Ok(insight)
}

/// Retrieve up to [SAVED_INSIGHT_LIMIT] insights of `user_id`, ordered by type then guid.
pub fn list_saved_insights(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<SavedInsight>, Error> {
    connection
        .prepare(
            "SELECT guid, user_id, type, categories, description, start_date, end_date, parent_categories_only
            FROM insight
            WHERE user_id = ?1
            ORDER BY type ASC, guid ASC
            LIMIT ?2",
        )?
        .query_map((user_id.as_i64(), SAVED_INSIGHT_LIMIT), map_row)?
        .map(|maybe_insight| maybe_insight.map_err(|error| error.into()))
        .collect()
}

/// Initialize the insight table and indexes.
pub fn create_insight_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS insight (
            guid TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            categories TEXT NOT NULL DEFAULT '[]',
            description TEXT,
            start_date INTEGER,
            end_date INTEGER,
            parent_categories_only INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_insight_user_type ON insight(user_id, type);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<SavedInsight, rusqlite::Error> {
    let raw_categories: String = row.get(3)?;
    let categories = serde_json::from_str(&raw_categories).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error))
    })?;

    Ok(SavedInsight {
        guid: row.get(0)?,
        user_id: UserId::new(row.get(1)?),
        insight_type: InsightType::new_unchecked(row.get(2)?),
        categories,
        description: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        parent_categories_only: row.get(7)?,
    })
}
