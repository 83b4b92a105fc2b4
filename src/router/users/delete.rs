use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Creator, validate_id};

#[derive(Debug, Deserialize)]
pub struct Params {
    /// Permanently remove the row instead of flagging it.
    #[serde(default)]
    force: bool,
}

/// Handler to delete one of the caller's records, softly by default.
///
/// Succeeds whether or not a row matched; there is no payload to return.
pub async fn handler(
    State(state): State<AppState>,
    Creator(created_by): Creator,
    Path(id): Path<i64>,
    Query(params): Query<Params>,
) -> Result<Envelope<()>> {
    validate_id(id)?;

    state.users.delete(id, params.force, &created_by).await?;

    Ok(Envelope::new(StatusCode::OK, "USER_DELETED"))
}

#[cfg(test)]
pub(super) mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::SqlitePool;

    use crate::*;

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_soft_delete(pool: SqlitePool) {
        let app = app(router::state(pool.clone()));

        let response = make_request(
            app,
            Method::DELETE,
            "/delete/1",
            Some("admin"),
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["i18n"], "USER_DELETED");
        assert!(body.get("data").is_none());

        // the row is flagged, not removed.
        let (deleted, deleted_at) =
            sqlx::query_as::<_, (i64, Option<String>)>(
                "SELECT deleted, deleted_at FROM users WHERE id = 1",
            )
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert!(deleted_at.is_some());
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_force_delete(pool: SqlitePool) {
        let app = app(router::state(pool.clone()));

        let response = make_request(
            app,
            Method::DELETE,
            "/delete/1?force=true",
            Some("admin"),
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM users WHERE id = 1",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_delete_scoped_to_creator(pool: SqlitePool) {
        let app = app(router::state(pool.clone()));

        // record 3 belongs to another creator: confirmation is returned
        // but the row is untouched.
        let response = make_request(
            app,
            Method::DELETE,
            "/delete/3?force=true",
            Some("admin"),
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let (count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM users WHERE id = 3",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test(fixtures("../../../fixtures/users.sql"))]
    async fn test_delete_without_creator(pool: SqlitePool) {
        let app = app(router::state(pool));

        let response = make_request(
            app,
            Method::DELETE,
            "/delete/1",
            None,
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
