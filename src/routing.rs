//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState, Error, endpoints,
    insights::{post_category_insights, post_totals_insights},
    saved_insight::{create_saved_insight_endpoint, get_saved_insights_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every route expects the authenticated user's [UserId](crate::UserId) as a
/// request extension, so callers must add an `Extension<UserId>` layer or
/// equivalent middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INSIGHTS_CATEGORY, post(post_category_insights))
        .route(endpoints::INSIGHTS_TOTALS, post(post_totals_insights))
        .route(
            endpoints::INSIGHTS,
            get(get_saved_insights_endpoint).post(create_saved_insight_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use axum::{Extension, http::StatusCode};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, exclusions::ExclusionGroups, user::UserId};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            ExclusionGroups::new(BTreeMap::from([(
                "housing".to_owned(),
                vec!["rent".to_owned()],
            )])),
        )
        .expect("Could not create app state");

        let app = build_router(state).layer(Extension(UserId::new(1)));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_returns_json_404() {
        let server = get_test_server();

        let response = server.get("/api/nope").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["code"], 404);
    }

    #[tokio::test]
    async fn insight_routes_are_wired_up() {
        let server = get_test_server();

        server
            .post(endpoints::INSIGHTS_CATEGORY)
            .json(&json!({ "exclude": ["housing"] }))
            .await
            .assert_status_ok();
        server
            .post(endpoints::INSIGHTS_TOTALS)
            .json(&json!({}))
            .await
            .assert_status_ok();
        server.get(endpoints::INSIGHTS).await.assert_status_ok();
        server
            .post(endpoints::INSIGHTS)
            .json(&json!({ "type": "totals" }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn empty_history_has_empty_results() {
        let server = get_test_server();

        let response = server
            .post(endpoints::INSIGHTS_TOTALS)
            .json(&json!({}))
            .await;

        assert_eq!(
            response.json::<Value>()["data"],
            json!({ "timestamps": [], "totals": [] })
        );
    }
}
