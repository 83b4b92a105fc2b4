use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Creator, validate_id};
use crate::user::User;

/// Handler to fetch one of the caller's records by id.
pub async fn handler(
    State(state): State<AppState>,
    Creator(created_by): Creator,
    Path(id): Path<i64>,
) -> Result<Envelope<User>> {
    validate_id(id)?;

    let user = state.users.get_by_id(id, &created_by).await?;

    Ok(Envelope::new(StatusCode::OK, "USER_FOUND").data(user))
}
