//! Core authentication service: signup and password verification.

use riskgate_auth::{hash_password, verify_password};
use riskgate_core::UserId;
use riskgate_db::models::{CreateUser, User};
use riskgate_db::DbPool;

use crate::error::ApiAuthError;
use crate::services::validation::{normalize_email, validate_password_complexity};

/// Service for account creation and password authentication.
#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
}

impl AuthService {
    /// Create a new auth service.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a new user account.
    ///
    /// The email is normalized to lowercase before storage. Does not issue
    /// tokens; callers go through login afterwards.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        display_name: Option<String>,
    ) -> Result<User, ApiAuthError> {
        let complexity_errors = validate_password_complexity(password);
        if !complexity_errors.is_empty() {
            let message = complexity_errors
                .iter()
                .map(std::string::ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiAuthError::Validation(message));
        }

        let email = normalize_email(email);

        if User::email_exists(self.pool.inner(), &email).await? {
            return Err(ApiAuthError::EmailConflict);
        }

        let password_hash = hash_password(password)
            .map_err(|e| ApiAuthError::Internal(format!("Password hashing failed: {e}")))?;

        let user = User::create(
            self.pool.inner(),
            CreateUser {
                email,
                password_hash,
                display_name,
            },
        )
        .await
        .map_err(|e| match &e {
            // Concurrent signup can still hit the unique constraint.
            sqlx::Error::Database(db) if db.is_unique_violation() => ApiAuthError::EmailConflict,
            _ => ApiAuthError::Database(e),
        })?;

        tracing::info!(user_id = %user.id, "User account created");

        Ok(user)
    }

    /// Authenticate a user with email and password.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint cannot be used to enumerate accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiAuthError> {
        let email = normalize_email(email);

        let user = User::find_by_email(self.pool.inner(), &email)
            .await?
            .ok_or(ApiAuthError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|e| ApiAuthError::Internal(format!("Password verification failed: {e}")))?;

        if !valid {
            return Err(ApiAuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(ApiAuthError::AccountInactive);
        }

        Ok(user)
    }

    /// Look up a user by ID.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, ApiAuthError> {
        let user = User::find_by_id(self.pool.inner(), user_id).await?;
        Ok(user)
    }
}
