use std::str::FromStr;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;
use crate::core::AuthConfig;
use crate::errors::AppError;

/// The verified user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AppError>;
}

#[derive(Deserialize)]
struct UserTokenClaims {
    sub: String,
}

/// Verifies signed user tokens locally with the configured key.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {

    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let broken = |msg: String| AppError::ProcessingError(format!("Invalid auth configuration: {}", msg));

        let algorithm = Algorithm::from_str(config.algorithm.trim())
            .map_err(|_| broken(format!("unknown algorithm '{}'", config.algorithm)))?;
        if config.key.trim().is_empty() {
            return Err(broken("auth.key must be set".to_string()));
        }

        let key_bytes = config.key.as_bytes();
        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(DecodingKey::from_secret(key_bytes)),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(key_bytes),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(key_bytes),
            _ => DecodingKey::from_rsa_pem(key_bytes),
        }
        .map_err(|err| broken(err.to_string()))?;

        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = config.issuer.as_deref().filter(|iss| !iss.is_empty()) {
            validation.set_issuer(&[issuer]);
        }

        Ok(JwtVerifier { key, validation })
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let data = decode::<UserTokenClaims>(token, &self.key, &self.validation).map_err(|err| {
            debug!("Rejected user token: {}", err);
            AppError::Unauthorized("The user token is invalid or expired.".to_string())
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("The user token carries no subject.".to_string()));
        }
        Ok(CallerIdentity { user_id: data.claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use super::*;

    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        iss: &'a str,
        exp: i64,
    }

    fn config(issuer: Option<&str>) -> AuthConfig {
        AuthConfig {
            token_header: "x-user-token".to_string(),
            algorithm: "HS256".to_string(),
            key: "test-secret".to_string(),
            issuer: issuer.map(str::to_string),
        }
    }

    fn token(sub: &str, iss: &str, exp: i64, secret: &str) -> String {
        encode(&Header::new(Algorithm::HS256), &Claims { sub, iss, exp }, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn accepts_a_valid_token() {
        let verifier = JwtVerifier::new(&config(Some("urn:issuer"))).unwrap();
        let identity = verifier.verify(&token("user_1", "urn:issuer", in_one_hour(), "test-secret")).await.unwrap();
        assert_eq!(identity.user_id, "user_1");
    }

    #[tokio::test]
    async fn rejects_wrong_signatures_issuers_and_expired_tokens() {
        let verifier = JwtVerifier::new(&config(Some("urn:issuer"))).unwrap();
        let cases = [
            token("user_1", "urn:issuer", in_one_hour(), "other-secret"),
            token("user_1", "urn:someone-else", in_one_hour(), "test-secret"),
            token("user_1", "urn:issuer", chrono::Utc::now().timestamp() - 3600, "test-secret"),
            token("", "urn:issuer", in_one_hour(), "test-secret"),
            "not-a-token".to_string(),
        ];
        for token in cases {
            assert!(matches!(verifier.verify(&token).await, Err(AppError::Unauthorized(_))));
        }
    }

    #[test]
    fn refuses_to_start_without_key_material() {
        let mut without_key = config(None);
        without_key.key = String::new();
        assert!(JwtVerifier::new(&without_key).is_err());

        let mut broken_pem = config(None);
        broken_pem.algorithm = "ES256".to_string();
        broken_pem.key = "not a pem".to_string();
        assert!(JwtVerifier::new(&broken_pem).is_err());

        let mut unknown = config(None);
        unknown.algorithm = "XX999".to_string();
        assert!(JwtVerifier::new(&unknown).is_err());
    }
}
