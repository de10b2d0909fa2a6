use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::authentication::errors::CredentialStoreError;
use crate::authentication::errors::LookupError;
use crate::authentication::models::Principal;
use crate::authentication::ports::CredentialStore;
use crate::authentication::ports::PrincipalLookup;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
    password_hasher: auth::PasswordHasher,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    async fn fetch_by_username(&self, username: &str) -> Result<Option<UserRow>, sqlx::Error> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, roles, enabled, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }
}

fn role_names(user: &User) -> Vec<String> {
    user.roles.iter().map(|r| r.as_str().to_string()).collect()
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    roles: Vec<String>,
    enabled: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn authorities(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().map(|name| Role::new(name.as_str()))
    }
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let roles = row.authorities().collect();
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            roles,
            enabled: row.enabled,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let roles = role_names(&user);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, roles, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&roles)
        .bind(user.enabled)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_username_key") {
                        return UserError::UsernameAlreadyExists(
                            user.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                    }
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.fetch_by_username(username.as_str())
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFoundByUsername(username.to_string()));
        }

        Ok(())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let roles = role_names(&user);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = $2, password_hash = $3, roles = $4, enabled = $5
            WHERE username = $1
            RETURNING id, username, email, password_hash, roles, enabled, created_at
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&roles)
        .bind(user.enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        row.ok_or_else(|| UserError::NotFoundByUsername(user.username.to_string()))
            .and_then(User::try_from)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, roles, enabled, created_at
            FROM users
            ORDER BY created_at, username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?
        .into_iter()
        .map(User::try_from)
        .collect()
    }
}

#[async_trait]
impl PrincipalLookup for PostgresUserRepository {
    async fn lookup(&self, identity: &str) -> Result<Option<Principal>, LookupError> {
        let row = self
            .fetch_by_username(identity)
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        Ok(row
            .filter(|row| row.enabled)
            .map(|row| Principal::new(row.username.as_str(), row.authorities().collect())))
    }
}

#[async_trait]
impl CredentialStore for PostgresUserRepository {
    async fn verify(&self, identifier: &str, password: &str) -> Result<bool, CredentialStoreError> {
        let row = self
            .fetch_by_username(identifier)
            .await
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        // Hash is checked even for disabled accounts so timing stays uniform
        let matched = self
            .password_hasher
            .verify_stored(password, row.as_ref().map(|r| r.password_hash.as_str()))
            .map_err(|e| CredentialStoreError::CorruptHash(e.to_string()))?;

        Ok(matched && row.is_some_and(|r| r.enabled))
    }
}
