use crate::auth::clock::{Clock, SystemClock};
use crate::types::{AppError, AuthError, Claims, Result, Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::sync::Arc;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// A freshly signed token and the window it is valid for.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a token that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub username: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Issues and verifies HS256 bearer tokens.
///
/// The secret is fixed for the lifetime of the service. Expiry is judged
/// against the injected [`Clock`] rather than the library's own check, so a
/// token is valid while `now < exp` and expired from `exp` onwards.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Creates a service signing with `secret`, using wall-clock time.
    ///
    /// # Arguments
    /// * `secret` - Signing key material; must not be empty
    /// * `default_ttl` - Lifetime applied by [`TokenService::issue_default`]
    pub fn new(secret: &[u8], default_ttl: Duration) -> Result<Self> {
        Self::with_clock(secret, default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], default_ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        if secret.is_empty() {
            return Err(AppError::InvalidInput(
                "Token signing secret must not be empty".to_string(),
            ));
        }
        ensure_positive(default_ttl)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
            clock,
        })
    }

    /// Signs a token for `username` valid for `ttl` from now.
    pub fn issue(&self, username: &str, role: &Role, ttl: Duration) -> Result<IssuedToken> {
        ensure_positive(ttl)?;

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InvalidInput("Token ttl out of range".to_string()))?;

        let claims = Claims {
            sub: username.to_string(),
            role: role.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        tracing::debug!(
            username,
            role = %role,
            expires_at = %expires_at,
            "issued token"
        );

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Signs a token with the configured default lifetime.
    pub fn issue_default(&self, username: &str, role: &Role) -> Result<IssuedToken> {
        self.issue(username, role, self.default_ttl)
    }

    /// Checks structure, then signature, then expiry.
    pub fn verify(&self, token: &str) -> std::result::Result<VerifiedToken, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(e.kind()))?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(VerifiedToken {
            username: claims.sub,
            role: claims.role,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

fn ensure_positive(ttl: Duration) -> Result<()> {
    if ttl <= Duration::zero() {
        return Err(AppError::InvalidInput(
            "Token ttl must be a positive duration".to_string(),
        ));
    }
    Ok(())
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
        // Unreachable while validate_exp is off, kept for completeness
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::ManualClock;

    const SECRET: &[u8] = b"test-secret-key-that-is-at-least-32-chars";
    const START: i64 = 1_700_000_000;

    fn create_test_service() -> (TokenService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::from_unix_secs(START));
        let service = TokenService::with_clock(
            SECRET,
            Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            clock.clone(),
        )
        .expect("should build service");
        (service, clock)
    }

    #[test]
    fn test_issue_and_verify() {
        let (service, _) = create_test_service();

        let issued = service
            .issue_default("admin", &Role::Admin)
            .expect("should issue");
        assert!(!issued.token.is_empty());
        assert_eq!(issued.issued_at.timestamp(), START);
        assert_eq!(issued.expires_at.timestamp(), START + 30 * 60);

        let verified = service.verify(&issued.token).expect("should verify");
        assert_eq!(verified.username, "admin");
        assert_eq!(verified.role, Role::Admin);
        assert_eq!(verified.issued_at, START);
        assert_eq!(verified.expires_at, START + 1800);
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let (service, _) = create_test_service();

        assert!(service.issue("admin", &Role::Admin, Duration::zero()).is_err());
        assert!(service
            .issue("admin", &Role::Admin, Duration::seconds(-5))
            .is_err());
        assert!(TokenService::new(SECRET, Duration::zero()).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(TokenService::new(b"", Duration::minutes(30)).is_err());
    }

    #[test]
    fn test_expiry_boundary() {
        let (service, clock) = create_test_service();
        let ttl = Duration::seconds(90);
        let issued = service.issue("user", &Role::User, ttl).expect("should issue");

        clock.advance(Duration::seconds(89));
        assert!(service.verify(&issued.token).is_ok(), "valid just before exp");

        clock.advance(Duration::seconds(1));
        assert_eq!(service.verify(&issued.token), Err(AuthError::Expired));

        clock.advance(Duration::days(1));
        assert_eq!(service.verify(&issued.token), Err(AuthError::Expired));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let (service, _) = create_test_service();

        assert_eq!(service.verify(""), Err(AuthError::Malformed));
        assert_eq!(service.verify("not-a-token"), Err(AuthError::Malformed));
        assert_eq!(service.verify("a.b"), Err(AuthError::Malformed));
        assert_eq!(
            service.verify("invalid.token.here"),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn test_wrong_secret_is_bad_signature() {
        let (service, clock) = create_test_service();
        let other = TokenService::with_clock(
            b"secret-two-that-is-32-chars-long",
            Duration::minutes(30),
            clock,
        )
        .expect("should build");

        let issued = other
            .issue_default("admin", &Role::Admin)
            .expect("should issue");
        assert_eq!(service.verify(&issued.token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let (service, _) = create_test_service();
        let user_token = service
            .issue_default("user", &Role::User)
            .expect("should issue")
            .token;
        let admin_token = service
            .issue_default("admin", &Role::Admin)
            .expect("should issue")
            .token;

        // Splice the admin payload onto the user's signature
        let user_parts: Vec<&str> = user_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert_eq!(service.verify(&forged), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_tampered_signature_is_bad_signature() {
        let (service, _) = create_test_service();
        let token = service
            .issue_default("admin", &Role::Admin)
            .expect("should issue")
            .token;

        let (head, signature) = token.rsplit_once('.').expect("three segments");
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let forged = format!("{}.{}", head, chars.into_iter().collect::<String>());

        assert_eq!(service.verify(&forged), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_expired_takes_effect_only_after_signature_check() {
        let (service, clock) = create_test_service();
        let other = TokenService::with_clock(
            b"another-secret-entirely-different",
            Duration::minutes(30),
            clock.clone(),
        )
        .expect("should build");
        let token = other
            .issue_default("admin", &Role::Admin)
            .expect("should issue")
            .token;

        clock.advance(Duration::hours(2));
        assert_eq!(service.verify(&token), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_role_is_captured_at_issuance() {
        let (service, _) = create_test_service();
        let custom = Role::Other("auditor".to_string());
        let token = service
            .issue_default("eve", &custom)
            .expect("should issue")
            .token;

        let verified = service.verify(&token).expect("should verify");
        assert_eq!(verified.role, custom);
    }
}
