//! Signed session tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rijschool_config::AuthConfig;
use rijschool_domain::Role;
use serde::{Deserialize, Serialize};

use crate::session::SessionContext;
use crate::AuthError;

// Ten years.
const MAX_TTL_SECONDS: u64 = 10 * 365 * 86_400;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub jti: String,
}

/// A freshly issued token and when it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub role: Role,
}

#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl_seconds: u64) -> Self {
        let ttl_seconds = i64::try_from(ttl_seconds.min(MAX_TTL_SECONDS)).unwrap_or(0);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.token_secret,
            config.token_issuer.clone(),
            config.session_ttl_seconds,
        )
    }

    pub fn issue(&self, session: &SessionContext) -> Result<SessionToken, AuthError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: session.subject.clone(),
            name: session.display_name.clone(),
            role: session.role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))?;

        Ok(SessionToken {
            token,
            expires_at,
            role: session.role,
        })
    }

    /// Validates signature, issuer and expiry and returns the session it carries.
    pub fn verify(&self, token: &str) -> Result<SessionContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_nbf = true;
        validation.leeway = 5;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(SessionContext {
            subject: data.claims.sub,
            display_name: data.claims.name,
            role: data.claims.role,
        })
    }
}
