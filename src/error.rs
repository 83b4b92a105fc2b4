//! Error handler for userbase.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{Value, json};
use sqlx::Error as SqlxError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::Envelope;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("SQL request failed: {0}")]
    Sql(#[from] SqlxError),

    #[error("missing 'x-creator' header")]
    MissingCreator,

    #[error("'phoneCountryCode' is required for phone-keyed records")]
    PhoneCountryCodeRequired,

    #[error("a record already holds this uniqueness value")]
    UniqueExists {
        id: i64,
        email: Option<String>,
        phone: Option<String>,
        username: Option<String>,
    },

    #[error("the '{unique}' field cannot be changed")]
    UniqueImmutable {
        unique: &'static str,
        value: Option<String>,
        current: String,
    },

    #[error("user not found")]
    NotFound,
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let envelope: Envelope<Value> = match self {
            ServerError::Validation(ref errors) => {
                Envelope::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
                    .data(json!(parse_validation_errors(errors)))
            },

            ServerError::Axum(ref rejection) => {
                Envelope::new(StatusCode::BAD_REQUEST, "INVALID_BODY").data(json!([{
                    "field": "body",
                    "message": rejection.body_text(),
                }]))
            },

            ServerError::Sql(ref err) => {
                // callers only get a bare 500; details stay in the log.
                tracing::error!(error = %err, "sql request failed");
                Envelope::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                )
            },

            ServerError::MissingCreator => {
                Envelope::new(StatusCode::UNAUTHORIZED, "CREATOR_REQUIRED")
            },

            ServerError::PhoneCountryCodeRequired => Envelope::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "NEED_PHONE_COUNTRY_CODE",
            )
            .data(json!([{
                "field": "phoneCountryCode",
                "type": "string",
                "max": 4,
                "pattern": "/^+d{1,3}$/",
                "message": "The 'phoneCountryCode' field is required.",
            }])),

            ServerError::UniqueExists {
                id,
                email,
                phone,
                username,
            } => Envelope::new(StatusCode::BAD_REQUEST, "UNIQUE_ALREADY_EXISTS")
                .data(json!({
                    "id": id,
                    "email": email,
                    "phone": phone,
                    "username": username,
                })),

            ServerError::UniqueImmutable {
                unique,
                value,
                current,
            } => Envelope::new(StatusCode::BAD_REQUEST, "UNIQUE_CANNOT_BE_CHANGED")
                .data(json!({
                    "unique": unique,
                    "value": value,
                    "current": current,
                })),

            ServerError::NotFound => {
                Envelope::new(StatusCode::NOT_FOUND, "USER_NOT_FOUND")
            },
        };

        envelope.into_response()
    }
}
