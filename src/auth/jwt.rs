//! HS256 bearer tokens carrying the caller's identity and admin flag.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::user::User;
use crate::utils::now_ms;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_days: i64,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_days", &self.expiration_days)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str, expiration_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_days,
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = now_ms() / 1000;
        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now,
            exp: now + self.expiration_days * SECS_PER_DAY,
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }

    /// Token part of an `Authorization: Bearer <token>` header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn generated_token_round_trips_identity() {
        let svc = JwtService::new(SECRET, 30);
        let user = User::new("Admin", "admin@example.com", true);

        let token = svc.generate_token(&user).unwrap();
        let claims = svc.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Admin");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 30 * SECS_PER_DAY);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("another-secret-that-is-long-enough-too", 30);
        let verifier = JwtService::new(SECRET, 30);
        let token = issuer
            .generate_token(&User::new("Jane", "jane@example.com", false))
            .unwrap();

        let err = verifier.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = JwtService::new(SECRET, 30);
        let now = now_ms() / 1000;
        let token = svc
            .sign(&Claims {
                sub: "u1".into(),
                name: "Jane".into(),
                email: "jane@example.com".into(),
                is_admin: false,
                iat: now - 2 * SECS_PER_DAY,
                exp: now - SECS_PER_DAY,
            })
            .unwrap();

        let err = svc.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::ExpiredToken));
    }

    #[test]
    fn garbage_is_invalid() {
        let svc = JwtService::new(SECRET, 30);
        assert!(matches!(
            svc.validate_token("not-a-jwt").unwrap_err(),
            JwtError::InvalidToken(_)
        ));
    }

    #[test]
    fn extract_from_header_requires_bearer_scheme() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }
}
