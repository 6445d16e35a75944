//! Access Token Issuance
//!
//! HS256 JWTs behind the [`TokenIssuer`] port.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::AccessTokenClaims;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Issues and checks signed, time-limited bearer tokens
pub trait TokenIssuer: Send + Sync {
    /// Sign a token asserting `user_id` / `email`
    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Check signature and expiry, returning the claims
    fn verify(&self, token: &str) -> Result<AccessTokenClaims, AuthError>;
}

/// JWT issuer signing with the server-held secret
pub struct JwtIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration: Duration,
}

impl JwtIssuer {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let expiration = Duration::try_seconds(config.access_token_expiration).ok_or_else(|| {
            AuthError::Config("JWT_ACCESS_EXPIRATION is out of range".to_string())
        })?;

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Ok(Self {
            encoding_key,
            decoding_key,
            expiration,
        })
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now.checked_add_signed(self.expiration).ok_or_else(|| {
            tracing::error!("Token expiry overflows the clock");
            AuthError::Internal
        })?;

        let claims = AccessTokenClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT signing failed: {:?}", e);
                AuthError::Internal
            })?;
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        // Expiry is exact: no clock-skew allowance past `exp`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config(secret: &str, access_token_expiration: i64) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            access_token_expiration,
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }

    fn issuer() -> JwtIssuer {
        JwtIssuer::new(&config(SECRET, 900)).unwrap()
    }

    fn signed(iat: i64, exp: i64) -> String {
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            iat,
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_claims_round_trip() {
        let issuer = issuer();
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id, "ada@example.com").unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "ada@example.com");
    }

    #[test]
    fn test_token_expires_after_fifteen_minutes() {
        let issuer = issuer();
        let before = Utc::now().timestamp();
        let claims = issuer
            .verify(&issuer.issue(Uuid::new_v4(), "ada@example.com").unwrap())
            .unwrap();

        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(claims.iat >= before);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let other = JwtIssuer::new(&config(&"f".repeat(32), 900)).unwrap();
        let token = other.issue(Uuid::new_v4(), "eve@example.com").unwrap();

        assert_eq!(issuer().verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_rejects_expired_token() {
        let now = Utc::now().timestamp();
        let token = signed(now - 3600, now - 1800);

        assert_eq!(issuer().verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_rejects_token_just_past_expiry() {
        let now = Utc::now().timestamp();
        let token = signed(now - 905, now - 5);

        assert_eq!(issuer().verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_new_rejects_out_of_range_expiration() {
        assert!(matches!(
            JwtIssuer::new(&config(SECRET, i64::MAX)),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(issuer().verify("not.a.jwt"), Err(AuthError::InvalidToken));
    }
}
