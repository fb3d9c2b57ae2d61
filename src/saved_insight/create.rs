//! Saves a new insight for the current user.

use axum::{Extension, Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::{
    Error,
    saved_insight::{NewSavedInsight, create_saved_insight, list::SavedInsightsState},
    user::UserId,
};

/// Store the insight in the request body and respond with `201` and `{"insight": ...}`.
pub async fn create_saved_insight_endpoint(
    State(state): State<SavedInsightsState>,
    Extension(user_id): Extension<UserId>,
    Json(new_insight): Json<NewSavedInsight>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let insight = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        create_saved_insight(user_id, new_insight, &connection)?
    };

    tracing::info!("user {user_id} saved insight {}", insight.guid);

    Ok((StatusCode::CREATED, Json(json!({ "insight": insight }))))
}
