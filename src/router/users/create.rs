use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Creator, Valid};
use crate::user::{NewUser, UniqueField, User};

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(max = 255))]
    firstname: Option<String>,
    #[validate(length(max = 255))]
    lastname: Option<String>,
    #[validate(length(max = 255))]
    fullname: Option<String>,
    #[validate(
        email(message = "Email must be formatted."),
        length(max = 255)
    )]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[validate(length(max = 255))]
    phone: Option<String>,
    #[validate(
        length(max = 4),
        custom(function = crate::router::validate_phone_country_code)
    )]
    phone_country_code: Option<String>,
    #[serde(default)]
    phone_verified: bool,
    #[validate(length(max = 255))]
    username: Option<String>,
    /// Which field this record will be unique by.
    unique: UniqueField,
}

/// Handler to create a user record.
pub async fn handler(
    State(state): State<AppState>,
    Creator(created_by): Creator,
    Valid(body): Valid<Body>,
) -> Result<Envelope<User>> {
    let user = state
        .users
        .create(NewUser {
            firstname: body.firstname,
            lastname: body.lastname,
            fullname: body.fullname,
            email: body.email,
            email_verified: body.email_verified,
            phone: body.phone,
            phone_country_code: body.phone_country_code,
            phone_verified: body.phone_verified,
            username: body.username,
            unique_by: body.unique,
            created_by,
        })
        .await?;

    Ok(Envelope::new(StatusCode::OK, "USER_CREATED").data(user))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    use crate::*;

    #[sqlx::test]
    async fn test_create_handler(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/",
            Some("  Admin "),
            json!({
                "firstname": "Ada",
                "email": "ada@example.com",
                "emailVerified": true,
                "unique": "email",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 200);
        assert_eq!(body["i18n"], "USER_CREATED");
        assert_eq!(body["data"]["firstname"], "Ada");
        assert_eq!(body["data"]["uniqueBy"], "email");
        // identity is trimmed and lower-cased.
        assert_eq!(body["data"]["createdBy"], "admin");
        assert_eq!(body["data"]["emailVerified"], true);
        assert_eq!(body["data"]["phoneVerified"], false);
        assert_eq!(body["data"]["deleted"], false);
        assert_eq!(body["data"]["ready"], false);
        assert_eq!(body["data"]["banned"], false);
    }

    #[sqlx::test]
    async fn test_create_phone_without_country_code(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/",
            Some("admin"),
            json!({ "phone": "612345678", "unique": "phone" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 422);
        assert_eq!(body["i18n"], "NEED_PHONE_COUNTRY_CODE");
        assert_eq!(body["data"][0]["field"], "phoneCountryCode");
    }

    #[sqlx::test]
    async fn test_create_bad_country_code(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/",
            Some("admin"),
            json!({
                "phone": "612345678",
                "phoneCountryCode": "33",
                "unique": "phone",
            })
            .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["i18n"], "VALIDATION_ERROR");
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_create_duplicate_unique(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/",
            Some("admin"),
            json!({ "email": "ada@example.com", "unique": "email" })
                .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["i18n"], "UNIQUE_ALREADY_EXISTS");
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["email"], "ada@example.com");
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_create_after_soft_delete(pool: SqlitePool) {
        let app = app(router::state(pool.clone()));

        // a soft-deleted record releases its uniqueness value.
        sqlx::query("UPDATE users SET deleted = 1 WHERE id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let response = make_request(
            app,
            Method::POST,
            "/",
            Some("admin"),
            json!({ "email": "ada@example.com", "unique": "email" })
                .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["i18n"], "USER_CREATED");
        assert_eq!(body["data"]["email"], "ada@example.com");
    }

    #[sqlx::test]
    async fn test_create_without_creator(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::POST,
            "/",
            None,
            json!({ "username": "ada", "unique": "username" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["i18n"], "CREATOR_REQUIRED");
    }
}
