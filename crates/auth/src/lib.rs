//! Staff authentication for the Rijschool back office.
//!
//! Logins run through an ordered chain of [`CredentialVerifier`]s (static
//! configuration pairs first, then the user store). A successful login yields
//! a signed token; requests carry it back and [`Authenticator::decode`] turns
//! it into the request's [`SessionContext`].

use std::sync::Arc;

use rijschool_config::AuthConfig;
use rijschool_database::{DatabaseError, UserRepository};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

pub mod guard;
pub mod password;
pub mod session;
pub mod token;
pub mod verifier;

pub use guard::{authorize, required_role, Access, ADMIN_LOGIN_PATH, INSTRUCTOR_LOGIN_PATH};
pub use password::{hash_password, verify_password};
pub use session::{Principal, SessionContext};
pub use token::{Claims, SessionToken, TokenManager};
pub use verifier::{CredentialVerifier, StaticCredentialVerifier, StoreCredentialVerifier};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("failed to sign session token: {0}")]
    TokenCreation(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
    #[error("user store error: {0}")]
    Store(#[from] DatabaseError),
}

#[derive(Clone)]
pub struct Authenticator {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
    tokens: TokenManager,
}

impl Authenticator {
    /// Static credentials from `config`, then the `users` table.
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Result<Self, AuthError> {
        let static_verifier = StaticCredentialVerifier::from_config(&config.static_credentials)?;
        debug!(count = static_verifier.len(), "loaded static credentials");

        let verifiers: Vec<Arc<dyn CredentialVerifier>> = vec![
            Arc::new(static_verifier),
            Arc::new(StoreCredentialVerifier::new(UserRepository::new(pool))),
        ];

        Ok(Self::with_verifiers(verifiers, TokenManager::from_config(config)))
    }

    pub fn with_verifiers(verifiers: Vec<Arc<dyn CredentialVerifier>>, tokens: TokenManager) -> Self {
        Self { verifiers, tokens }
    }

    /// Checks the credentials against each verifier in turn; the first match wins.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(SessionContext, SessionToken), AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        for verifier in &self.verifiers {
            if let Some(principal) = verifier.verify(username, password).await? {
                let session = SessionContext::from(principal);
                let token = self.tokens.issue(&session)?;
                info!(
                    subject = %session.subject,
                    role = %session.role,
                    verifier = verifier.name(),
                    "login succeeded"
                );
                return Ok((session, token));
            }
        }

        info!(username, "login rejected");
        Err(AuthError::InvalidCredentials)
    }

    pub fn decode(&self, token: &str) -> Result<SessionContext, AuthError> {
        self.tokens.verify(token)
    }
}
