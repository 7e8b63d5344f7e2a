use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::jwks::{JwksClient, JwksError};
use super::model::{AuthenticatedUser, Identity};

/// Resolves a request's session credential to an identity.
///
/// A missing or expired credential resolves to `Identity::Anonymous`; that is
/// how a logged-out browser normally looks. A credential that is structurally
/// broken or fails verification comes back as `CredentialError::Malformed` so
/// the boundary can log a security event distinctly from a logged-out state.
pub struct SessionValidator {
    jwks_client: Arc<JwksClient>,
    issuer: String,
    audience: String,
    session_cookie: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

impl SessionValidator {
    pub fn new(
        jwks_client: Arc<JwksClient>,
        issuer: String,
        audience: String,
        session_cookie: String,
        leeway: Duration,
    ) -> Self {
        Self {
            jwks_client,
            issuer,
            audience,
            session_cookie,
            leeway: leeway.as_secs(),
        }
    }

    /// Pulls the session credential out of the request headers:
    /// `Authorization: Bearer` first, then the session cookie.
    pub fn extract_credential(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            if let Some(token) = value.strip_prefix("Bearer ") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }

        cookie_value(headers, &self.session_cookie)
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, CredentialError> {
        match self.extract_credential(headers) {
            Some(token) => self.verify(&token).await,
            None => Ok(Identity::Anonymous),
        }
    }

    async fn verify(&self, token: &str) -> Result<Identity, CredentialError> {
        let header = decode_header(token)
            .map_err(|e| CredentialError::Malformed(format!("undecodable header: {}", e)))?;

        if header.alg != Algorithm::RS256 {
            return Err(CredentialError::Malformed(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| CredentialError::Malformed("missing kid in header".to_string()))?;

        let decoding_key = match self.jwks_client.get_key(&kid).await {
            Ok(key) => key,
            Err(JwksError::UnknownKey(kid)) => {
                return Err(CredentialError::Malformed(format!(
                    "signed with unknown key {}",
                    kid
                )));
            }
            Err(e) => return Err(CredentialError::Unavailable(e.to_string())),
        };

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_nbf = true;

        let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => data,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                return Ok(Identity::Anonymous);
            }
            Err(e) => return Err(CredentialError::Malformed(e.to_string())),
        };

        let claims = token_data.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| CredentialError::Malformed("sub claim is not a UUID".to_string()))?;
        let email = claims
            .email
            .ok_or_else(|| CredentialError::Malformed("missing email claim".to_string()))?;

        Ok(Identity::Authenticated(AuthenticatedUser {
            user_id,
            email,
        }))
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Credential is structurally broken or fails verification. The boundary
    /// logs this as a possible tampering attempt.
    #[error("malformed session credential: {0}")]
    Malformed(String),

    /// Verification key material could not be obtained. Fail closed.
    #[error("credential verification unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn validator() -> SessionValidator {
        let jwks = Arc::new(JwksClient::new(
            "https://auth.test",
            Duration::from_secs(60),
        ));
        SessionValidator::new(
            jwks,
            "https://auth.test".to_string(),
            "language-map".to_string(),
            "lm_session".to_string(),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_cookie_value_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; lm_session=tok123; other=1"),
        );
        assert_eq!(
            cookie_value(&headers, "lm_session"),
            Some("tok123".to_string())
        );
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_credential_prefers_bearer_header() {
        let v = validator();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lm_session=cookie-token"),
        );
        assert_eq!(
            v.extract_credential(&headers),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn test_extract_credential_falls_back_to_cookie() {
        let v = validator();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lm_session=cookie-token"),
        );
        assert_eq!(
            v.extract_credential(&headers),
            Some("cookie-token".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_without_credential_is_anonymous() {
        let v = validator();
        let identity = v.resolve(&HeaderMap::new()).await.unwrap();
        assert!(identity.is_anonymous());
    }

    #[tokio::test]
    async fn test_resolve_garbage_credential_is_malformed() {
        let v = validator();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("lm_session=not-a-jwt"),
        );
        let err = v.resolve(&headers).await.unwrap_err();
        assert!(matches!(err, CredentialError::Malformed(_)));
    }
}
