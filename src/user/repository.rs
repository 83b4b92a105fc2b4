//! Handle database requests.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;
use crate::user::{NewUser, UniqueField, UserPatch, UserRow};

/// Kept in one place so every SELECT returns the same shape.
const USER_COLUMNS: &str = "id, firstname, lastname, nickname, fullname, \
     email, email_verified, phone, phone_country_code, phone_verified, \
     username, gender, birthdate, id_card, created_by, unique_by, \
     deleted, deleted_at, ready, ready_at, banned, banned_at, \
     banned_reason, banned_by";

/// Columns matched by the free-text search.
const SEARCH_COLUMNS: [&str; 8] = [
    "firstname",
    "lastname",
    "nickname",
    "fullname",
    "email",
    "phone",
    "username",
    "id_card",
];

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// First non-deleted row whose `field` column equals `value`,
    /// regardless of owner. Used by the create-time uniqueness lookup;
    /// soft-deleted rows do not hold their value.
    pub async fn find_by_unique_value(
        &self,
        field: UniqueField,
        value: &str,
    ) -> Result<Option<UserRow>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
                WHERE {} = ? AND deleted = 0 LIMIT 1",
            field.column()
        );

        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Insert a new record and return its id. Flags start cleared.
    pub async fn insert(&self, user: &NewUser) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (firstname, lastname, fullname, email, \
                email_verified, phone, phone_country_code, phone_verified, \
                username, created_by, unique_by, deleted, ready, banned) \
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, 0)",
        )
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.fullname)
        .bind(&user.email)
        .bind(i64::from(user.email_verified))
        .bind(&user.phone)
        .bind(&user.phone_country_code)
        .bind(i64::from(user.phone_verified))
        .bind(&user.username)
        .bind(&user.created_by)
        .bind(user.unique_by.column())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch by id alone. `update` is not scoped to a caller.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Fetch by id, restricted to records owned by `created_by`.
    pub async fn find_by_id_for(
        &self,
        id: i64,
        created_by: &str,
    ) -> Result<Option<UserRow>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ? AND created_by = ?"
        );

        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(created_by)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Fetch by uniqueness field and value for one owner. Only matches
    /// records whose designated uniqueness field is `field` itself.
    pub async fn find_by_unique_for(
        &self,
        field: UniqueField,
        value: &str,
        created_by: &str,
    ) -> Result<Option<UserRow>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
                WHERE {} = ? AND created_by = ? AND unique_by = ?",
            field.column()
        );

        Ok(sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .bind(created_by)
            .bind(field.column())
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Apply `patch` as a single parameterized UPDATE.
    ///
    /// Flags are written as 0/1. Flipping a flag also writes its paired
    /// timestamp: now() on true, NULL on false. Un-banning clears
    /// `banned_reason` as well, overriding any supplied value.
    pub async fn update(&self, id: i64, patch: &UserPatch) -> Result<()> {
        let now = Utc::now().naive_utc();
        let mut query =
            QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut changed = false;

        {
            let mut changes = query.separated(", ");

            if let Some(firstname) = &patch.firstname {
                changes.push("firstname = ").push_bind_unseparated(firstname);
                changed = true;
            }
            if let Some(lastname) = &patch.lastname {
                changes.push("lastname = ").push_bind_unseparated(lastname);
                changed = true;
            }
            if let Some(nickname) = &patch.nickname {
                changes.push("nickname = ").push_bind_unseparated(nickname);
                changed = true;
            }
            if let Some(fullname) = &patch.fullname {
                changes.push("fullname = ").push_bind_unseparated(fullname);
                changed = true;
            }
            if let Some(email) = &patch.email {
                changes.push("email = ").push_bind_unseparated(email);
                changed = true;
            }
            if let Some(email_verified) = patch.email_verified {
                changes
                    .push("email_verified = ")
                    .push_bind_unseparated(i64::from(email_verified));
                changed = true;
            }
            if let Some(phone) = &patch.phone {
                changes.push("phone = ").push_bind_unseparated(phone);
                changed = true;
            }
            if let Some(phone_verified) = patch.phone_verified {
                changes
                    .push("phone_verified = ")
                    .push_bind_unseparated(i64::from(phone_verified));
                changed = true;
            }
            if let Some(code) = &patch.phone_country_code {
                changes
                    .push("phone_country_code = ")
                    .push_bind_unseparated(code);
                changed = true;
            }
            if let Some(username) = &patch.username {
                changes.push("username = ").push_bind_unseparated(username);
                changed = true;
            }
            if let Some(gender) = patch.gender {
                changes
                    .push("gender = ")
                    .push_bind_unseparated(gender.as_str());
                changed = true;
            }
            if let Some(birthdate) = patch.birthdate {
                changes
                    .push("birthdate = ")
                    .push_bind_unseparated(birthdate);
                changed = true;
            }
            if let Some(id_card) = &patch.id_card {
                changes.push("id_card = ").push_bind_unseparated(id_card);
                changed = true;
            }
            if let Some(reason) = &patch.banned_reason {
                // skipped when `banned` flips false below; NULL wins there.
                if patch.banned != Some(false) {
                    changes
                        .push("banned_reason = ")
                        .push_bind_unseparated(reason);
                    changed = true;
                }
            }
            if let Some(banned_by) = patch.banned_by {
                changes
                    .push("banned_by = ")
                    .push_bind_unseparated(banned_by);
                changed = true;
            }

            if let Some(deleted) = patch.deleted {
                changes
                    .push("deleted = ")
                    .push_bind_unseparated(i64::from(deleted));
                if deleted {
                    changes.push("deleted_at = ").push_bind_unseparated(now);
                } else {
                    changes.push("deleted_at = NULL");
                }
                changed = true;
            }
            if let Some(ready) = patch.ready {
                changes
                    .push("ready = ")
                    .push_bind_unseparated(i64::from(ready));
                if ready {
                    changes.push("ready_at = ").push_bind_unseparated(now);
                } else {
                    changes.push("ready_at = NULL");
                }
                changed = true;
            }
            if let Some(banned) = patch.banned {
                changes
                    .push("banned = ")
                    .push_bind_unseparated(i64::from(banned));
                if banned {
                    changes.push("banned_at = ").push_bind_unseparated(now);
                } else {
                    changes.push("banned_at = NULL");
                    changes.push("banned_reason = NULL");
                }
                changed = true;
            }
        }

        // nothing to render, nothing to run.
        if !changed {
            return Ok(());
        }

        query.push(" WHERE id = ").push_bind(id);
        query.build().execute(&self.pool).await?;

        Ok(())
    }

    /// Soft delete: mark the record deleted and stamp it.
    pub async fn soft_delete(&self, id: i64, created_by: &str) -> Result<()> {
        sqlx::query(
            "UPDATE users SET deleted = 1, deleted_at = ? \
                WHERE id = ? AND created_by = ?",
        )
        .bind(Utc::now().naive_utc())
        .bind(id)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Hard delete: remove the record entirely.
    pub async fn hard_delete(&self, id: i64, created_by: &str) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ? AND created_by = ?")
            .bind(id)
            .bind(created_by)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// One page of the caller's records, optionally filtered by a
    /// substring match over [`SEARCH_COLUMNS`].
    pub async fn search(
        &self,
        created_by: &str,
        text: Option<&str>,
        limit: u32,
        offset: i64,
    ) -> Result<Vec<UserRow>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE created_by = "
        ));
        query.push_bind(created_by);

        if let Some(text) = text.filter(|text| !text.is_empty()) {
            let pattern = format!("%{text}%");

            query.push(" AND (");
            {
                let mut fields = query.separated(" OR ");
                for column in SEARCH_COLUMNS {
                    fields
                        .push(format!("{column} LIKE "))
                        .push_bind_unseparated(pattern.clone());
                }
            }
            query.push(")");
        }

        query.push(" LIMIT ").push_bind(i64::from(limit));
        query.push(" OFFSET ").push_bind(offset);

        Ok(query
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await?)
    }
}
