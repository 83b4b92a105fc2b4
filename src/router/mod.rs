//! HTTP surface: request extractors shared by every handler.

pub mod status;
pub mod users;

use std::sync::LazyLock;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::ServerError;

/// Header carrying the caller identity the mesh gateway used to put on the
/// request context.
pub const CREATOR_HEADER: &str = "x-creator";

/// `+` followed by one to three digits.
static PHONE_COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{1,3}$").unwrap());

/// Validate the `phoneCountryCode` format.
pub fn validate_phone_country_code(
    value: &str,
) -> Result<(), ValidationError> {
    if PHONE_COUNTRY_CODE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_country_code").with_message(
            "phoneCountryCode must start with '+' followed by 1 to 3 digits."
                .into(),
        ))
    }
}

/// Path ids must be positive.
pub fn validate_id(id: i64) -> Result<(), ServerError> {
    if id >= 1 {
        return Ok(());
    }

    let mut errors = ValidationErrors::new();
    errors.add(
        "id",
        ValidationError::new("range")
            .with_message("Id must be a positive integer.".into()),
    );
    Err(errors.into())
}

/// JSON extractor running `validator` rules before the handler body.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state).await?;
        body.validate()?;
        Ok(Self(body))
    }
}

/// Caller identity, trimmed and lower-cased, taken from the
/// [`CREATOR_HEADER`] header. Required before dispatch on every action
/// that scopes rows to their creator.
pub struct Creator(pub String);

impl<S: Send + Sync> FromRequestParts<S> for Creator {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CREATOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty())
            .map(Creator)
            .ok_or(ServerError::MissingCreator)
    }
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::SqlitePool) -> crate::AppState {
    use std::sync::Arc;

    crate::AppState {
        config: Arc::new(crate::config::Configuration::default()),
        db: crate::database::Database {
            sqlite: pool.clone(),
        },
        users: crate::user::UserService::new(pool),
    }
}
