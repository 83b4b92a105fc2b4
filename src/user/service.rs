use sqlx::SqlitePool;

use crate::error::{Result, ServerError};
use crate::response::Meta;
use crate::user::{NewUser, UniqueField, User, UserPatch, UserRepository, UserRow};

/// User manager: business rules on top of [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Create a record.
    ///
    /// Phone-keyed records must carry a country code, and the value of the
    /// designated uniqueness field must not already be taken by a
    /// non-deleted record. The lookup and the insert are not wrapped in a
    /// transaction; two concurrent creates can both pass the lookup.
    pub async fn create(&self, user: NewUser) -> Result<User> {
        if user.unique_by == UniqueField::Phone
            && user.phone_country_code.is_none()
        {
            return Err(ServerError::PhoneCountryCodeRequired);
        }

        if let Some(value) = user.unique_value() {
            if let Some(existing) =
                self.repo.find_by_unique_value(user.unique_by, value).await?
            {
                return Err(ServerError::UniqueExists {
                    id: existing.id,
                    email: existing.email,
                    phone: existing.phone,
                    username: existing.username,
                });
            }
        }

        let id = self.repo.insert(&user).await?;
        found(self.repo.find_by_id(id).await?)
    }

    /// Apply a partial update to an existing record.
    ///
    /// The field designated by the record's `unique_by` cannot be changed:
    /// supplying any value different from the stored one is rejected, even
    /// when the stored value is NULL.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User> {
        let Some(current) = self.repo.find_by_id(id).await? else {
            return Err(ServerError::NotFound);
        };

        let unique_by = current.unique_field();
        if let Some(attempted) = patch.value_of(unique_by) {
            let stored = current.unique_value(unique_by);
            if stored != Some(attempted) {
                return Err(ServerError::UniqueImmutable {
                    unique: unique_by.column(),
                    value: stored.map(str::to_owned),
                    current: attempted.to_owned(),
                });
            }
        }

        self.repo.update(id, &patch).await?;
        found(self.repo.find_by_id(id).await?)
    }

    /// Remove one of the caller's records: permanently when `force`,
    /// otherwise by setting the `deleted` flag and its timestamp.
    pub async fn delete(
        &self,
        id: i64,
        force: bool,
        created_by: &str,
    ) -> Result<()> {
        if force {
            self.repo.hard_delete(id, created_by).await
        } else {
            self.repo.soft_delete(id, created_by).await
        }
    }

    /// Fetch one of the caller's records by id.
    pub async fn get_by_id(&self, id: i64, created_by: &str) -> Result<User> {
        found(self.repo.find_by_id_for(id, created_by).await?)
    }

    /// Fetch one of the caller's records by its designated uniqueness
    /// field. A phone lookup only matches records keyed by phone.
    pub async fn get_by_unique(
        &self,
        field: UniqueField,
        value: &str,
        created_by: &str,
    ) -> Result<User> {
        found(self.repo.find_by_unique_for(field, value, created_by).await?)
    }

    /// One page of the caller's records.
    ///
    /// `total` and `last` count the returned page, not the full matching
    /// set.
    pub async fn search(
        &self,
        created_by: &str,
        text: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<User>, Meta)> {
        let offset = (i64::from(page) - 1) * i64::from(limit);
        let rows = self.repo.search(created_by, text, limit, offset).await?;
        let users: Vec<User> = rows.into_iter().map(User::from).collect();

        let total = users.len() as u64;
        let last = total.div_ceil(u64::from(limit));

        Ok((
            users,
            Meta {
                page,
                limit,
                total,
                last,
            },
        ))
    }
}

fn found(row: Option<UserRow>) -> Result<User> {
    row.map(User::from).ok_or(ServerError::NotFound)
}
