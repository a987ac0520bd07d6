// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body returned by every endpoint on failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Olympics not found")]
    pub error: String,
    /// Per-field error codes, present on validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request, reported per field
    Validation(ValidationErrors),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., duplicate username)
    Conflict(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Flattens `validator` output into `field -> [codes]`.
/// Nested list entries are keyed as `subjects[0].ball`.
fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_field_errors(errors, String::new(), &mut out);
    out
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: String,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.entry(key)
                    .or_insert_with(Vec::new)
                    .extend(list.iter().map(|e| e.code.to_string()));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, key, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, format!("{}[{}]", key, index), out);
                }
            }
        }
    }
}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "Internal Server Error".to_string(),
                        fields: None,
                    },
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "Validation failed".to_string(),
                    fields: Some(field_errors(&errors)),
                },
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, message(msg)),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, message(msg)),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, message(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, message(msg)),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, message(msg)),
        };

        (status, Json(body)).into_response()
    }
}

fn message(msg: String) -> ErrorBody {
    ErrorBody {
        error: msg,
        fields: None,
    }
}

/// Converts `sqlx::Error` into `AppError`.
/// Constraint violations caused by client input become 4xx, everything else is a 500.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return AppError::BadRequest(format!(
                    "Referenced object does not exist ({})",
                    db_err.constraint().unwrap_or("foreign key")
                ));
            }
            if db_err.is_unique_violation() {
                return AppError::Conflict("Object already exists".to_string());
            }
        }
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}
