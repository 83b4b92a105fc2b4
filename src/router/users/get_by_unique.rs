use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Creator, Valid};
use crate::user::{UniqueField, User};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    unique: UniqueField,
    value: String,
}

/// Handler to fetch one of the caller's records by its uniqueness field.
///
/// Only matches records whose `uniqueBy` is the requested selector: a
/// phone lookup never returns a record keyed by email, even when the
/// phone value matches.
pub async fn handler(
    State(state): State<AppState>,
    Creator(created_by): Creator,
    Valid(body): Valid<Body>,
) -> Result<Envelope<User>> {
    let user = state
        .users
        .get_by_unique(body.unique, &body.value, &created_by)
        .await?;

    Ok(Envelope::new(StatusCode::OK, "USER_FOUND").data(user))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    use crate::*;

    async fn get_by(
        app: axum::Router,
        unique: &str,
        value: &str,
    ) -> (StatusCode, Value) {
        let response = make_request(
            app,
            Method::POST,
            "/get",
            Some("admin"),
            json!({ "unique": unique, "value": value }).to_string(),
        )
        .await;

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_by_email(pool: SqlitePool) {
        let app = app(router::state(pool));

        let (status, body) =
            get_by(app, "email", "ada@example.com").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["i18n"], "USER_FOUND");
        assert_eq!(body["data"]["id"], 1);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_by_phone(pool: SqlitePool) {
        let app = app(router::state(pool));

        let (status, body) = get_by(app, "phone", "612345678").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 2);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_selector_must_match_unique_by(pool: SqlitePool) {
        let app = app(router::state(pool));

        // record 1 carries this phone value but is keyed by email.
        let (status, body) = get_by(app, "phone", "712345678").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["i18n"], "USER_NOT_FOUND");
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_by_unique_scoped_to_creator(pool: SqlitePool) {
        let app = app(router::state(pool));

        // record 3 is username-keyed but owned by another creator.
        let (status, _) = get_by(app, "username", "grace").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_get_by_unknown_selector(pool: SqlitePool) {
        let app = app(router::state(pool));

        let (status, body) = get_by(app, "nickname", "ada").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["i18n"], "INVALID_BODY");
    }
}
