use std::sync::Arc;

use async_trait::async_trait;
use rijschool_auth::{
    hash_password, AuthError, Authenticator, CredentialVerifier, Principal, TokenManager,
};
use rijschool_config::{AuthConfig, DatabaseConfig, StaticCredential};
use rijschool_database::{initialize_database, CreateUserRequest, UserRepository};
use rijschool_domain::Role;
use sqlx::SqlitePool;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new(config: AuthConfig) -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let database = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        };
        let pool = initialize_database(&database).await?;
        let authenticator = Authenticator::new(pool.clone(), &config)?;

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }

    async fn new_default() -> TestResult<Self> {
        Self::new(AuthConfig::default()).await
    }

    async fn create_user(&self, email: &str, password: &str, role: Role) -> TestResult {
        UserRepository::new(self.pool.clone())
            .create(&CreateUserRequest {
                email: email.to_string(),
                display_name: "Store User".to_string(),
                password_hash: hash_password(password)?,
                role,
            })
            .await?;
        Ok(())
    }
}

#[tokio::test]
async fn static_admin_and_instructor_pairs_log_in() -> TestResult {
    let ctx = TestContext::new_default().await?;

    let (admin, token) = ctx.authenticator.login("admin", "pawiro").await?;
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(token.role, Role::Admin);
    assert_eq!(ctx.authenticator.decode(&token.token)?, admin);

    let (instructor, _) = ctx.authenticator.login("instructor", "pawiro").await?;
    assert_eq!(instructor.role, Role::Instructor);
    assert_eq!(instructor.display_name, "Instructor");
    Ok(())
}

#[tokio::test]
async fn store_users_log_in_with_their_stored_role() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.create_user("Owner@Example.com", "password", Role::Admin).await?;
    ctx.create_user("teacher@example.com", "lessons", Role::Instructor).await?;

    let (owner, _) = ctx.authenticator.login("owner@example.com", "password").await?;
    assert_eq!(owner.role, Role::Admin);
    assert_eq!(owner.subject, "owner@example.com");

    let (teacher, _) = ctx.authenticator.login("teacher@example.com", "lessons").await?;
    assert_eq!(teacher.role, Role::Instructor);
    Ok(())
}

#[tokio::test]
async fn wrong_or_missing_credentials_are_rejected() -> TestResult {
    let ctx = TestContext::new_default().await?;
    ctx.create_user("owner@example.com", "password", Role::Admin).await?;

    for (username, password) in [
        ("admin", "wrong"),
        ("owner@example.com", "wrong"),
        ("nobody@example.com", "password"),
        ("", "pawiro"),
        ("admin", ""),
    ] {
        let result = ctx.authenticator.login(username, password).await;
        assert!(
            matches!(result, Err(AuthError::InvalidCredentials)),
            "{username}/{password} should be rejected"
        );
    }
    Ok(())
}

#[tokio::test]
async fn static_pairs_are_checked_before_the_store() -> TestResult {
    let ctx = TestContext::new_default().await?;
    // A store account shadowed by the static "admin" name never gets consulted.
    ctx.create_user("admin", "pawiro", Role::Instructor).await?;

    let (session, _) = ctx.authenticator.login("admin", "pawiro").await?;
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.display_name, "Administrator");
    Ok(())
}

#[tokio::test]
async fn configured_static_pairs_replace_the_defaults() -> TestResult {
    let config = AuthConfig {
        static_credentials: vec![StaticCredential {
            username: "desk".to_string(),
            password: "frontdesk".to_string(),
            role: "ADMIN".to_string(),
            display_name: Some("Front Desk".to_string()),
        }],
        ..AuthConfig::default()
    };
    let ctx = TestContext::new(config).await?;

    assert!(ctx.authenticator.login("desk", "frontdesk").await.is_ok());
    assert!(matches!(
        ctx.authenticator.login("admin", "pawiro").await,
        Err(AuthError::InvalidCredentials)
    ));
    Ok(())
}

#[tokio::test]
async fn unknown_static_role_is_a_configuration_error() -> TestResult {
    let config = AuthConfig {
        static_credentials: vec![StaticCredential {
            username: "x".to_string(),
            password: "y".to_string(),
            role: "OWNER".to_string(),
            display_name: None,
        }],
        ..AuthConfig::default()
    };
    let result = TestContext::new(config).await;
    assert!(result.is_err());
    Ok(())
}

#[tokio::test]
async fn tokens_signed_with_another_secret_do_not_decode() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let foreign = TokenManager::new("some-other-secret", "rijschool", 3_600);
    let forged = foreign.issue(&rijschool_auth::SessionContext {
        subject: "admin".to_string(),
        display_name: "Administrator".to_string(),
        role: Role::Admin,
    })?;

    assert!(matches!(
        ctx.authenticator.decode(&forged.token),
        Err(AuthError::InvalidToken(_))
    ));
    Ok(())
}

struct Failing;

#[async_trait]
impl CredentialVerifier for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn verify(&self, _: &str, _: &str) -> Result<Option<Principal>, AuthError> {
        Err(AuthError::UnknownRole("broken".to_string()))
    }
}

struct Always(Role);

#[async_trait]
impl CredentialVerifier for Always {
    fn name(&self) -> &'static str {
        "always"
    }

    async fn verify(&self, username: &str, _: &str) -> Result<Option<Principal>, AuthError> {
        Ok(Some(Principal {
            subject: username.to_string(),
            display_name: username.to_string(),
            role: self.0,
        }))
    }
}

#[tokio::test]
async fn verifier_errors_abort_the_chain() -> TestResult {
    let tokens = TokenManager::new("secret", "rijschool", 60);
    let authenticator = Authenticator::with_verifiers(
        vec![Arc::new(Failing), Arc::new(Always(Role::Admin))],
        tokens.clone(),
    );
    assert!(matches!(
        authenticator.login("a", "b").await,
        Err(AuthError::UnknownRole(_))
    ));

    let authenticator = Authenticator::with_verifiers(
        vec![Arc::new(Always(Role::Instructor)), Arc::new(Failing)],
        tokens,
    );
    let (session, _) = authenticator.login("a", "b").await?;
    assert_eq!(session.role, Role::Instructor);
    Ok(())
}
