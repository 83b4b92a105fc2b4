mod repository;
mod service;

pub use repository::*;
pub use service::*;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Fields allowed to act as a record's uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Email,
    Phone,
    Username,
}

impl UniqueField {
    /// Column name behind this selector. This is the only place a
    /// caller-chosen field name becomes SQL text.
    pub fn column(self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
            UniqueField::Username => "username",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "email" => Some(UniqueField::Email),
            "phone" => Some(UniqueField::Phone),
            "username" => Some(UniqueField::Username),
            _ => None,
        }
    }
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
    RatherNotToSay,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Unknown => "UNKNOWN",
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::RatherNotToSay => "RATHER_NOT_TO_SAY",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "MALE" => Gender::Male,
            "FEMALE" => Gender::Female,
            "RATHER_NOT_TO_SAY" => Gender::RatherNotToSay,
            _ => Gender::Unknown,
        }
    }
}

/// User as returned to callers. Flag columns are widened from their 0/1
/// storage representation to booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub phone_verified: bool,
    pub username: Option<String>,
    pub gender: Gender,
    pub birthdate: Option<NaiveDate>,
    pub id_card: Option<String>,
    pub created_by: String,
    pub unique_by: UniqueField,
    pub deleted: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub ready: bool,
    pub ready_at: Option<NaiveDateTime>,
    pub banned: bool,
    pub banned_at: Option<NaiveDateTime>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<i64>,
}

/// User as saved on database. Flags are 0/1 integers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub email_verified: i64,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub phone_verified: i64,
    pub username: Option<String>,
    pub gender: String,
    pub birthdate: Option<NaiveDate>,
    pub id_card: Option<String>,
    pub created_by: String,
    pub unique_by: String,
    pub deleted: i64,
    pub deleted_at: Option<NaiveDateTime>,
    pub ready: i64,
    pub ready_at: Option<NaiveDateTime>,
    pub banned: i64,
    pub banned_at: Option<NaiveDateTime>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<i64>,
}

impl UserRow {
    /// Which field this record is unique by. The column carries a CHECK
    /// constraint, so the fallback arm is never reached on real rows.
    pub fn unique_field(&self) -> UniqueField {
        UniqueField::parse(&self.unique_by).unwrap_or(UniqueField::Email)
    }

    /// Stored value of the given uniqueness field.
    pub fn unique_value(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::Email => self.email.as_deref(),
            UniqueField::Phone => self.phone.as_deref(),
            UniqueField::Username => self.username.as_deref(),
        }
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let unique_by = row.unique_field();
        Self {
            id: row.id,
            firstname: row.firstname,
            lastname: row.lastname,
            nickname: row.nickname,
            fullname: row.fullname,
            email: row.email,
            email_verified: row.email_verified == 1,
            phone: row.phone,
            phone_country_code: row.phone_country_code,
            phone_verified: row.phone_verified == 1,
            username: row.username,
            gender: Gender::parse(&row.gender),
            birthdate: row.birthdate,
            id_card: row.id_card,
            created_by: row.created_by,
            unique_by,
            deleted: row.deleted == 1,
            deleted_at: row.deleted_at,
            ready: row.ready == 1,
            ready_at: row.ready_at,
            banned: row.banned == 1,
            banned_at: row.banned_at,
            banned_reason: row.banned_reason,
            banned_by: row.banned_by,
        }
    }
}

/// Insert payload for `create`. The caller identity and the uniqueness
/// selector are fixed here; everything else is optional input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub phone_verified: bool,
    pub username: Option<String>,
    pub unique_by: UniqueField,
    pub created_by: String,
}

impl NewUser {
    /// Value of the field designated by `unique_by`, when supplied.
    pub fn unique_value(&self) -> Option<&str> {
        match self.unique_by {
            UniqueField::Email => self.email.as_deref(),
            UniqueField::Phone => self.phone.as_deref(),
            UniqueField::Username => self.username.as_deref(),
        }
    }
}

/// Field-by-field changes applied by `update`. `None` leaves the column
/// untouched.
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub nickname: Option<String>,
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub phone: Option<String>,
    pub phone_verified: Option<bool>,
    pub phone_country_code: Option<String>,
    pub username: Option<String>,
    pub gender: Option<Gender>,
    pub birthdate: Option<NaiveDate>,
    pub id_card: Option<String>,
    pub deleted: Option<bool>,
    pub ready: Option<bool>,
    pub banned: Option<bool>,
    pub banned_reason: Option<String>,
    pub banned_by: Option<i64>,
}

impl UserPatch {
    /// Requested value for the given uniqueness field, when supplied.
    pub fn value_of(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::Email => self.email.as_deref(),
            UniqueField::Phone => self.phone.as_deref(),
            UniqueField::Username => self.username.as_deref(),
        }
    }
}
