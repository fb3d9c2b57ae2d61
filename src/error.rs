//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The request named an exclusion group that is not configured.
    #[error("unknown exclusion group \"{0}\"")]
    UnknownExclusionGroup(String),

    /// The start of a date range filter is not before its end.
    #[error("the start date must be before the end date")]
    InvalidDateRange,

    /// A saved insight was created without a type.
    #[error("insight type cannot be empty")]
    EmptyInsightType,

    /// The exclusion groups file could not be parsed.
    #[error("invalid exclusion groups config: {0}")]
    InvalidExclusionConfig(String),

    /// A config file could not be read.
    #[error("could not read file: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// The HTTP status code.
    pub code: u16,
    /// A message that is safe to show to the client.
    pub message: String,
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::UnknownExclusionGroup(_) | Error::InvalidDateRange | Error::EmptyInsightType => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            // Server errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            code: status_code.as_u16(),
            message,
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn client_errors_are_bad_requests() {
        for error in [
            Error::UnknownExclusionGroup("pets".to_owned()),
            Error::InvalidDateRange,
            Error::EmptyInsightType,
        ] {
            assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unexpected_errors_are_internal_server_errors() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_body_hides_server_error_details() {
        let response = Error::Io("/etc/secret: permission denied".to_owned()).into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["code"], 500);
        assert!(!body["message"].as_str().unwrap().contains("secret"));
    }
}
