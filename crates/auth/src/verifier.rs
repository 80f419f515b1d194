//! Credential checks tried in order by the [`Authenticator`](crate::Authenticator).

use async_trait::async_trait;
use rijschool_config::StaticCredential;
use rijschool_database::UserRepository;
use rijschool_domain::Role;
use tracing::debug;

use crate::password::verify_password;
use crate::session::Principal;
use crate::AuthError;

/// One way of checking a username and password.
///
/// `Ok(None)` means "not mine, ask the next verifier"; errors abort the login.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn verify(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError>;
}

/// Fixed username/password pairs from configuration.
pub struct StaticCredentialVerifier {
    entries: Vec<StaticEntry>,
}

struct StaticEntry {
    username: String,
    password: String,
    principal: Principal,
}

impl StaticCredentialVerifier {
    pub fn from_config(credentials: &[StaticCredential]) -> Result<Self, AuthError> {
        let entries = credentials
            .iter()
            .map(|credential| {
                let role = credential
                    .role
                    .parse::<Role>()
                    .map_err(|_| AuthError::UnknownRole(credential.role.clone()))?;
                Ok(StaticEntry {
                    username: credential.username.clone(),
                    password: credential.password.clone(),
                    principal: Principal {
                        subject: credential.username.clone(),
                        display_name: credential
                            .display_name
                            .clone()
                            .unwrap_or_else(|| credential.username.clone()),
                        role,
                    },
                })
            })
            .collect::<Result<Vec<_>, AuthError>>()?;

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn verify(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.username == username && entry.password == password)
            .map(|entry| entry.principal.clone()))
    }
}

/// Staff accounts stored in the `users` table, checked with argon2.
pub struct StoreCredentialVerifier {
    users: UserRepository,
}

impl StoreCredentialVerifier {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialVerifier for StoreCredentialVerifier {
    fn name(&self) -> &'static str {
        "store"
    }

    async fn verify(&self, username: &str, password: &str) -> Result<Option<Principal>, AuthError> {
        let Some(user) = self.users.find_by_email(username).await? else {
            return Ok(None);
        };

        if !verify_password(password, &user.password_hash)? {
            debug!(user_id = user.id, "password mismatch");
            return Ok(None);
        }

        Ok(Some(Principal {
            subject: user.email,
            display_name: user.display_name,
            role: user.role,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(username: &str, role: &str) -> StaticCredential {
        StaticCredential {
            username: username.to_string(),
            password: "pawiro".to_string(),
            role: role.to_string(),
            display_name: None,
        }
    }

    #[tokio::test]
    async fn static_pairs_match_exactly() {
        let verifier =
            StaticCredentialVerifier::from_config(&[credential("admin", "ADMIN")]).unwrap();

        let principal = verifier.verify("admin", "pawiro").await.unwrap().unwrap();
        assert_eq!(principal.role, Role::Admin);
        assert_eq!(principal.display_name, "admin");

        assert!(verifier.verify("admin", "wrong").await.unwrap().is_none());
        assert!(verifier.verify("Admin", "pawiro").await.unwrap().is_none());
    }

    #[test]
    fn unknown_roles_fail_at_construction() {
        let result = StaticCredentialVerifier::from_config(&[credential("root", "SUPERUSER")]);
        assert!(matches!(result, Err(AuthError::UnknownRole(role)) if role == "SUPERUSER"));
    }
}
