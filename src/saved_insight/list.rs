//! Lists the saved insights of the current user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{AppState, Error, saved_insight::list_saved_insights, user::UserId};

/// The state needed for listing and creating saved insights.
#[derive(Debug, Clone)]
pub struct SavedInsightsState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SavedInsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with `{"insights": [...]}` for the current user.
pub async fn get_saved_insights_endpoint(
    State(state): State<SavedInsightsState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Value>, Error> {
    let insights = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_saved_insights(user_id, &connection)?
    };

    Ok(Json(json!({ "insights": insights })))
}
