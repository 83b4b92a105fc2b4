//! User record HTTP API.
mod create;
mod delete;
mod get;
mod get_by_unique;
mod search;
mod update;

use axum::Router;
use axum::routing::{delete, get, patch, post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /` goes to `create`.
        .route("/", post(create::handler))
        // `PATCH /{id}` goes to `update`.
        .route("/{id}", patch(update::handler))
        // `DELETE /delete/{id}` goes to `delete`. `?force=true` is permanent.
        .route("/delete/{id}", delete(delete::handler))
        // `GET /get/{id}` goes to `get`.
        .route("/get/{id}", get(get::handler))
        // `POST /get` goes to `get_by_unique`.
        .route("/get", post(get_by_unique::handler))
        // `POST /search` goes to `search`.
        .route("/search", post(search::handler))
}
