use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::catalog::RoleCatalog;
use crate::config;
use crate::database::models::{Role, User, UserRow};

use super::ServiceError;

const USER_COLUMNS: &str = "id, username, email, password";

const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 24;

/// Account management: registration, lookups, self-service updates, and
/// admin role mutation. Owns password hashing; plaintext never leaves this
/// module and hashes are never serialized.
pub struct UserService {
    pool: SqlitePool,
    roles: RoleCatalog,
}

impl UserService {
    pub fn new(pool: SqlitePool, roles: RoleCatalog) -> Self {
        Self { pool, roles }
    }

    /// Create an account with exactly the USER role. Uniqueness checks run
    /// in the same transaction as the insert (username first, then email).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "username must not be empty".to_string(),
            ));
        }
        if email.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "email must not be empty".to_string(),
            ));
        }
        if !is_valid_email(email) {
            return Err(ServiceError::InvalidArgument(format!(
                "\"{}\" is not a valid email address",
                email
            )));
        }
        validate_password_length(password)?;

        let mut tx = self.pool.begin().await?;

        let username_taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE username = ?1")
                .bind(username)
                .fetch_optional(&mut *tx)
                .await?;
        if username_taken.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "user \"{}\" already exists",
                username
            )));
        }

        let email_taken: Option<i64> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = ?1")
                .bind(email)
                .fetch_optional(&mut *tx)
                .await?;
        if email_taken.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "email \"{}\" already exists",
                email
            )));
        }

        let hash = bcrypt::hash(password, config::config().security.bcrypt_cost)?;

        let result = sqlx::query(
            "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
        )
        .bind(username)
        .bind(email)
        .bind(&hash)
        .execute(&mut *tx)
        .await?;
        let user_id = result.last_insert_rowid();

        let user_role = self
            .roles
            .find_by_name(Role::USER)
            .ok_or_else(|| ServiceError::NotFound("role USER is not seeded".to_string()))?;
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?1, ?2)")
            .bind(user_id)
            .bind(user_role.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("registered user \"{}\" ({})", username, user_id);
        self.get_by_id(user_id).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user with id {} not found", id)))?;

        let roles = self.roles_of(row.id).await?;
        Ok(User::from_row(row, roles))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user \"{}\" not found", username)))?;

        let roles = self.roles_of(row.id).await?;
        Ok(User::from_row(row, roles))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("email \"{}\" not found", email)))?;

        let roles = self.roles_of(row.id).await?;
        Ok(User::from_row(row, roles))
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            let roles = self.roles_of(row.id).await?;
            users.push(User::from_row(row, roles));
        }
        Ok(users)
    }

    /// Self-service update of email and/or password. The current password
    /// must verify against the stored hash before anything is touched.
    /// A new email is re-checked for uniqueness against other accounts.
    /// Every input is validated before the first UPDATE, and the writes
    /// share a transaction, so a rejected request changes nothing.
    pub async fn update_self(
        &self,
        user: &User,
        current_password: &str,
        new_email: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<User, ServiceError> {
        if !bcrypt::verify(current_password, &user.password)? {
            warn!("password re-verification failed for user {}", user.id);
            return Err(ServiceError::Unauthorized(
                "current password is incorrect".to_string(),
            ));
        }

        let new_email = new_email.map(str::trim).filter(|e| !e.is_empty());
        let new_password = new_password.filter(|p| !p.is_empty());

        if let Some(email) = new_email {
            if !is_valid_email(email) {
                return Err(ServiceError::InvalidArgument(format!(
                    "\"{}\" is not a valid email address",
                    email
                )));
            }
        }
        if let Some(password) = new_password {
            validate_password_length(password)?;
        }

        let mut tx = self.pool.begin().await?;

        if let Some(email) = new_email {
            let taken: Option<i64> =
                sqlx::query_scalar("SELECT id FROM users WHERE email = ?1 AND id != ?2")
                    .bind(email)
                    .bind(user.id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if taken.is_some() {
                return Err(ServiceError::AlreadyExists(format!(
                    "email \"{}\" already exists",
                    email
                )));
            }
            sqlx::query("UPDATE users SET email = ?1 WHERE id = ?2")
                .bind(email)
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(password) = new_password {
            let hash = bcrypt::hash(password, config::config().security.bcrypt_cost)?;
            sqlx::query("UPDATE users SET password = ?1 WHERE id = ?2")
                .bind(&hash)
                .bind(user.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        info!("user {} updated their account", user.id);
        self.get_by_id(user.id).await
    }

    /// Hard delete. Role links and owned tasks go with the account
    /// (ON DELETE CASCADE).
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!(
                "user with id {} not found",
                id
            )));
        }
        info!("deleted user {}", id);
        Ok(())
    }

    /// Grant a role. Rejects roles the user already holds without touching
    /// the role set. The membership check and insert share a transaction.
    pub async fn add_role(&self, user: &User, role_name: &str) -> Result<User, ServiceError> {
        let role = self.roles.find_by_name(role_name).ok_or_else(|| {
            ServiceError::NotFound(format!("role \"{}\" not found", role_name))
        })?;

        let mut tx = self.pool.begin().await?;
        let held: Vec<i64> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = ?1")
                .bind(user.id)
                .fetch_all(&mut *tx)
                .await?;
        if held.contains(&role.id) {
            return Err(ServiceError::RoleViolation(format!(
                "user \"{}\" already has role {}",
                user.username, role.name
            )));
        }
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?1, ?2)")
            .bind(user.id)
            .bind(role.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("granted role {} to user {}", role.name, user.id);
        self.get_by_id(user.id).await
    }

    /// Revoke a role. A user always keeps at least one role, so removal
    /// from a single-role user fails before anything else is looked at.
    pub async fn remove_role(&self, user: &User, role_name: &str) -> Result<User, ServiceError> {
        let mut tx = self.pool.begin().await?;
        let held: Vec<i64> =
            sqlx::query_scalar("SELECT role_id FROM user_roles WHERE user_id = ?1")
                .bind(user.id)
                .fetch_all(&mut *tx)
                .await?;
        if held.len() <= 1 {
            return Err(ServiceError::RoleViolation(format!(
                "user \"{}\" only has one role, removal is not allowed",
                user.username
            )));
        }

        let role = self.roles.find_by_name(role_name).ok_or_else(|| {
            ServiceError::NotFound(format!("role \"{}\" not found", role_name))
        })?;
        if !held.contains(&role.id) {
            return Err(ServiceError::RoleViolation(format!(
                "user \"{}\" does not have role {}",
                user.username, role.name
            )));
        }

        sqlx::query("DELETE FROM user_roles WHERE user_id = ?1 AND role_id = ?2")
            .bind(user.id)
            .bind(role.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("revoked role {} from user {}", role.name, user.id);
        self.get_by_id(user.id).await
    }

    /// Login check. Unknown usernames and wrong passwords fail the same way
    /// so the response does not reveal which accounts exist.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let user = match self.get_by_username(username).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                return Err(ServiceError::Unauthorized(
                    "invalid username or password".to_string(),
                ))
            }
            Err(other) => return Err(other),
        };

        if !bcrypt::verify(password, &user.password)? {
            warn!("failed login attempt for \"{}\"", username);
            return Err(ServiceError::Unauthorized(
                "invalid username or password".to_string(),
            ));
        }
        Ok(user)
    }

    async fn roles_of(&self, user_id: i64) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT r.id, r.name FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = ?1
             ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}

// Bounds are counted in characters, not bytes, so multibyte passwords
// are measured the way users perceive their length.
fn validate_password_length(password: &str) -> Result<(), ServiceError> {
    let length = password.chars().count();
    if length < PASSWORD_MIN {
        return Err(ServiceError::InvalidPassword(format!(
            "chosen password is too short, it should be at least {} characters long",
            PASSWORD_MIN
        )));
    }
    if length > PASSWORD_MAX {
        return Err(ServiceError::InvalidPassword(format!(
            "chosen password is too long, it should be at most {} characters long",
            PASSWORD_MAX
        )));
    }
    Ok(())
}

/// Minimal shape check: one '@' with a non-empty local part and a domain
/// containing a dot.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
