//! JWT token service: HS256 access/refresh pairs with rotation

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blacklist::TokenBlacklist;

/// Token kind markers carried in the `token_type` claim
pub mod token_type {
    pub const ACCESS: &str = "access";
    pub const REFRESH: &str = "refresh";
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// JWT ID, used for refresh revocation
    pub jti: String,
    /// "access" or "refresh"
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    /// Parse the subject back into an account id
    pub fn account_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Invalid("non-numeric subject".to_string()))
    }
}

/// An access/refresh token pair as returned by login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token is expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token has been revoked")]
    Revoked,
    #[error("Wrong token type: expected {expected}")]
    WrongType { expected: &'static str },
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// JWT service for issuing and validating token pairs
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(secret: &[u8], access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    fn now() -> usize {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as usize)
            .unwrap_or(0)
    }

    fn issue(
        &self,
        account_id: i64,
        employee_code: Option<&str>,
        email: Option<&str>,
        kind: &str,
        ttl_secs: i64,
    ) -> Result<String, JwtError> {
        let now = Self::now();
        let claims = Claims {
            sub: account_id.to_string(),
            exp: (now as i64).saturating_add(ttl_secs).max(0) as usize,
            iat: now,
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: kind.to_string(),
            employee_code: employee_code.map(String::from),
            email: email.map(String::from),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Issue a fresh access/refresh pair for an account
    pub fn issue_pair(
        &self,
        account_id: i64,
        employee_code: Option<&str>,
        email: Option<&str>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access: self.issue(
                account_id,
                employee_code,
                email,
                token_type::ACCESS,
                self.access_ttl_secs,
            )?,
            refresh: self.issue(
                account_id,
                employee_code,
                email,
                token_type::REFRESH,
                self.refresh_ttl_secs,
            )?,
        })
    }

    /// Validate signature and expiry, returning the raw claims
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Validate a bearer token. Refresh tokens are rejected here so they
    /// cannot be used as API credentials.
    pub fn validate_access(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.decode(token)?;
        if claims.token_type != token_type::ACCESS {
            return Err(JwtError::WrongType {
                expected: token_type::ACCESS,
            });
        }
        Ok(claims)
    }

    /// Validate a refresh token against the blacklist
    pub fn validate_refresh(
        &self,
        token: &str,
        blacklist: &TokenBlacklist,
    ) -> Result<Claims, JwtError> {
        let claims = self.decode(token)?;
        if claims.token_type != token_type::REFRESH {
            return Err(JwtError::WrongType {
                expected: token_type::REFRESH,
            });
        }
        if blacklist.is_revoked(&claims.jti) {
            return Err(JwtError::Revoked);
        }
        Ok(claims)
    }

    /// Rotate a refresh token: consume the old jti and issue a new pair.
    /// The consumed token can never be replayed.
    pub fn rotate(
        &self,
        refresh_token: &str,
        blacklist: &TokenBlacklist,
    ) -> Result<(Claims, TokenPair), JwtError> {
        let claims = self.validate_refresh(refresh_token, blacklist)?;
        blacklist.revoke(&claims.jti, claims.exp);

        let pair = self.issue_pair(
            claims.account_id()?,
            claims.employee_code.as_deref(),
            claims.email.as_deref(),
        )?;

        Ok((claims, pair))
    }

    /// Revoke a refresh token on logout
    pub fn revoke(&self, refresh_token: &str, blacklist: &TokenBlacklist) {
        if let Ok(claims) = self.decode(refresh_token) {
            if claims.token_type == token_type::REFRESH {
                blacklist.revoke(&claims.jti, claims.exp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(b"test-secret-key", 3600, 86400)
    }

    #[test]
    fn test_issue_and_validate_pair() {
        let svc = service();
        let pair = svc.issue_pair(42, Some("TEC001"), Some("ana@forge.example")).unwrap();

        let access = svc.validate_access(&pair.access).unwrap();
        assert_eq!(access.sub, "42");
        assert_eq!(access.token_type, "access");
        assert_eq!(access.employee_code.as_deref(), Some("TEC001"));
        assert_eq!(access.account_id().unwrap(), 42);

        let blacklist = TokenBlacklist::new();
        let refresh = svc.validate_refresh(&pair.refresh, &blacklist).unwrap();
        assert_eq!(refresh.token_type, "refresh");
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_refresh_token_rejected_as_bearer() {
        let svc = service();
        let pair = svc.issue_pair(42, None, None).unwrap();
        assert!(matches!(
            svc.validate_access(&pair.refresh),
            Err(JwtError::WrongType { expected: "access" })
        ));
    }

    #[test]
    fn test_access_token_rejected_for_refresh() {
        let svc = service();
        let blacklist = TokenBlacklist::new();
        let pair = svc.issue_pair(42, None, None).unwrap();
        assert!(matches!(
            svc.validate_refresh(&pair.access, &blacklist),
            Err(JwtError::WrongType { expected: "refresh" })
        ));
    }

    #[test]
    fn test_rotation_consumes_old_token() {
        let svc = service();
        let blacklist = TokenBlacklist::new();
        let pair = svc.issue_pair(42, Some("TEC001"), None).unwrap();

        let (claims, new_pair) = svc.rotate(&pair.refresh, &blacklist).unwrap();
        assert_eq!(claims.account_id().unwrap(), 42);
        assert_ne!(new_pair.refresh, pair.refresh);

        // the consumed token is now revoked
        assert!(matches!(
            svc.rotate(&pair.refresh, &blacklist),
            Err(JwtError::Revoked)
        ));

        // the new one still works
        assert!(svc.rotate(&new_pair.refresh, &blacklist).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let other = JwtService::new(b"other-secret", 3600, 86400);
        let pair = other.issue_pair(42, None, None).unwrap();
        assert!(matches!(
            svc.validate_access(&pair.access),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let svc = JwtService::new(b"test-secret-key", -120, -120);
        let pair = svc.issue_pair(42, None, None).unwrap();
        assert!(matches!(svc.validate_access(&pair.access), Err(JwtError::Expired)));
    }
}
