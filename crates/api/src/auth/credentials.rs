//! Account registration and password login.

use std::sync::Arc;

use taskkeep_core::error::CoreError;
use taskkeep_db::models::user::{CreateUser, User};
use taskkeep_db::UserStore;
use tokio::sync::OnceCell;

use crate::auth::password::{hash_password, verify_password, PasswordHashing};
use crate::error::{AppError, AppResult};

/// Owns password credentials on top of a [`UserStore`].
pub struct CredentialStore {
    users: Arc<dyn UserStore>,
    hashing: PasswordHashing,
    /// Verified against on unknown emails so both login failures cost one
    /// Argon2 verification.
    decoy_hash: OnceCell<String>,
}

/// Input for the decoy hash. Its value is irrelevant; only its cost matters.
const DECOY_PASSWORD: &str = "taskkeep-decoy-password";

impl CredentialStore {
    pub fn new(users: Arc<dyn UserStore>, hashing: PasswordHashing) -> Self {
        Self {
            users,
            hashing,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Create an account. Fails with `DuplicateEmail` when the email is on file,
    /// including when a concurrent registration wins the unique constraint.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(CoreError::DuplicateEmail.into());
        }

        let password_hash = hash_password(password, &self.hashing)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

        let input = CreateUser {
            name: name.to_string(),
            email,
            password_hash,
        };
        match self.users.create_user(&input).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_duplicate_email() => Err(CoreError::DuplicateEmail.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password both produce `InvalidCredentials`.
    pub async fn verify_login(&self, email: &str, password: &str) -> AppResult<User> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_user_by_email(&email).await? else {
            self.burn_verification(password).await?;
            return Err(CoreError::InvalidCredentials.into());
        };

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

        if !password_valid {
            return Err(CoreError::InvalidCredentials.into());
        }
        Ok(user)
    }

    /// Run one verification against the decoy hash, built with the configured
    /// work factor on first use.
    async fn burn_verification(&self, password: &str) -> AppResult<()> {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| async {
                hash_password(DECOY_PASSWORD, &self.hashing)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
            })
            .await?;
        verify_password(password, decoy)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        Ok(())
    }
}

/// Canonical form used for every email lookup and write.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
