use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            102 | 103 => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.code, 1..=99)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self.is_internal() {
            true => "Internal Server Error",
            false => self.message.as_str(),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 102,
        message: "not found".into(),
    }
}

pub fn no_eligible_vehicles_error(message: impl Into<String>) -> Error {
    Error {
        code: 103,
        message: message.into(),
    }
}

pub fn invalid_trip_geometry_error() -> Error {
    Error {
        code: 104,
        message: "invalid route data: distance or duration is zero or negative".into(),
    }
}

pub fn route_unavailable_error() -> Error {
    Error {
        code: 105,
        message: "unable to fetch directions".into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    tracing::error!(%err, "environment variable error");

    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "database error");

    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::warn!(%err, "reqwest error");

    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn config_error(message: impl Into<String>) -> Error {
    Error {
        code: 6,
        message: message.into(),
    }
}

#[test]
fn internal_errors_hide_their_message() {
    let err = database_error("connection refused");

    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.is_internal());
}

#[test]
fn client_errors_map_to_statuses() {
    assert_eq!(
        no_eligible_vehicles_error("no active vehicles found").status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(not_found_error().status(), StatusCode::NOT_FOUND);
    assert_eq!(invalid_trip_geometry_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(route_unavailable_error().status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        invalid_input_error("bad coordinates").status(),
        StatusCode::BAD_REQUEST
    );
}
