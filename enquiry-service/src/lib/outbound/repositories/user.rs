use std::time::Duration;

use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use super::bounded;
use super::StoreError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SELECT_USER: &str = r#"
    SELECT id, username, first_name, last_name, email, password_hash, role,
           is_active, profile_pic, company_name, created_at, updated_at, last_login
    FROM users
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
    operation_timeout: Duration,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }

    fn write_error(err: StoreError, user: &User) -> UserError {
        match err.unique_violation() {
            Some("users_username_key") => {
                UserError::UsernameAlreadyExists(user.username.as_str().to_string())
            }
            Some("users_email_key") => UserError::EmailAlreadyExists(user.email.to_string()),
            _ => database_error(err),
        }
    }
}

fn database_error(err: StoreError) -> UserError {
    UserError::DatabaseError(err.to_string())
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    profile_pic: Option<String>,
    company_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            profile_pic: row.profile_pic,
            company_name: row.company_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login: row.last_login,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let query = sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, last_name, email, password_hash, role,
                               is_active, profile_pic, company_name, created_at, updated_at, last_login)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(&user.profile_pic)
        .bind(&user.company_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(user.last_login);

        bounded(self.operation_timeout, query.execute(&self.pool))
            .await
            .map_err(|e| Self::write_error(e, &user))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("{} WHERE id = $1", SELECT_USER);
        let query = sqlx::query_as::<_, UserRow>(&sql).bind(id.0);

        bounded(self.operation_timeout, query.fetch_optional(&self.pool))
            .await
            .map_err(database_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let sql = format!("{} WHERE username = $1", SELECT_USER);
        let query = sqlx::query_as::<_, UserRow>(&sql).bind(username.as_str());

        bounded(self.operation_timeout, query.fetch_optional(&self.pool))
            .await
            .map_err(database_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let sql = format!("{} WHERE email = $1", SELECT_USER);
        let query = sqlx::query_as::<_, UserRow>(&sql).bind(email.as_str());

        bounded(self.operation_timeout, query.fetch_optional(&self.pool))
            .await
            .map_err(database_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_USER);
        let query = sqlx::query_as::<_, UserRow>(&sql);

        bounded(self.operation_timeout, query.fetch_all(&self.pool))
            .await
            .map_err(database_error)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let query = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, first_name = $3, last_name = $4, email = $5, password_hash = $6,
                role = $7, is_active = $8, profile_pic = $9, company_name = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(&user.profile_pic)
        .bind(&user.company_name)
        .bind(user.updated_at);

        let result = bounded(self.operation_timeout, query.execute(&self.pool))
            .await
            .map_err(|e| Self::write_error(e, &user))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), UserError> {
        let query = sqlx::query("UPDATE users SET last_login = $2, updated_at = $2 WHERE id = $1")
            .bind(id.0)
            .bind(at);

        let result = bounded(self.operation_timeout, query.execute(&self.pool))
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let query = sqlx::query("DELETE FROM users WHERE id = $1").bind(id.0);

        let result = bounded(self.operation_timeout, query.execute(&self.pool))
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
