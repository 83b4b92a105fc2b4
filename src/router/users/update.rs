use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::response::Envelope;
use crate::router::{Valid, validate_id};
use crate::user::{Gender, User, UserPatch};

/// Every mutable field. `createdBy` is not one of them; a body carrying it
/// is accepted and the field dropped.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[validate(length(max = 255))]
    firstname: Option<String>,
    #[validate(length(max = 255))]
    lastname: Option<String>,
    #[validate(length(max = 255))]
    nickname: Option<String>,
    #[validate(length(max = 255))]
    fullname: Option<String>,
    #[validate(
        email(message = "Email must be formatted."),
        length(max = 255)
    )]
    email: Option<String>,
    email_verified: Option<bool>,
    #[validate(length(max = 255))]
    phone: Option<String>,
    phone_verified: Option<bool>,
    #[validate(
        length(max = 4),
        custom(function = crate::router::validate_phone_country_code)
    )]
    phone_country_code: Option<String>,
    #[validate(length(max = 255))]
    username: Option<String>,
    gender: Option<Gender>,
    birthdate: Option<NaiveDate>,
    id_card: Option<String>,
    deleted: Option<bool>,
    ready: Option<bool>,
    banned: Option<bool>,
    banned_reason: Option<String>,
    #[validate(range(min = 1))]
    banned_by: Option<i64>,
}

/// Handler to patch a user record field by field.
pub async fn handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Valid(body): Valid<Body>,
) -> Result<Envelope<User>> {
    validate_id(id)?;

    let user = state
        .users
        .update(
            id,
            UserPatch {
                firstname: body.firstname,
                lastname: body.lastname,
                nickname: body.nickname,
                fullname: body.fullname,
                email: body.email,
                email_verified: body.email_verified,
                phone: body.phone,
                phone_verified: body.phone_verified,
                phone_country_code: body.phone_country_code,
                username: body.username,
                gender: body.gender,
                birthdate: body.birthdate,
                id_card: body.id_card,
                deleted: body.deleted,
                ready: body.ready,
                banned: body.banned,
                banned_reason: body.banned_reason,
                banned_by: body.banned_by,
            },
        )
        .await?;

    Ok(Envelope::new(StatusCode::OK, "USER_UPDATED").data(user))
}
