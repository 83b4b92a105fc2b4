use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Creator, Valid};
use crate::user::User;

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    /// Substring matched against names, email, phone, username and
    /// id card. Empty or absent returns every record of the caller.
    query: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    limit: u32,
}

/// Handler to page through the caller's records.
pub async fn handler(
    State(state): State<AppState>,
    Creator(created_by): Creator,
    Valid(body): Valid<Body>,
) -> Result<Envelope<Vec<User>>> {
    let (users, meta) = state
        .users
        .search(&created_by, body.query.as_deref(), body.page, body.limit)
        .await?;

    Ok(Envelope::new(StatusCode::OK, "USER_FOUND")
        .data(users)
        .meta(meta))
}
