//! Identity assertions: HS256-signed JWTs carrying only the user id.
//!
//! Validity is computed entirely from the token's own `exp` claim. Nothing is
//! stored server-side, so there is no revocation: a token stays valid for its
//! whole window even after a password or profile change.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use taskkeep_core::error::AuthFailure;
use taskkeep_core::types::DbId;

/// Fixed lifetime of every issued token.
pub const TOKEN_VALIDITY_DAYS: i64 = 5;

const TOKEN_VALIDITY_SECS: i64 = TOKEN_VALIDITY_DAYS * 24 * 60 * 60;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// The process-wide signing secret.
#[derive(Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A freshly signed token plus the identity it asserts.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: DbId,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Signs identity assertions.
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            key: EncodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id` valid from now for [`TOKEN_VALIDITY_DAYS`].
    pub fn issue(&self, user_id: DbId) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    /// Issue a token as of `now`. Identical inputs always yield the identical token.
    pub fn issue_at(
        &self,
        user_id: DbId,
        now: i64,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + TOKEN_VALIDITY_SECS,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)?;

        Ok(IssuedToken {
            token,
            user_id,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

/// Checks identity assertions and yields the asserted user id.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        // Expiry is checked by hand in `verify_at` so the instant is injectable
        // and the boundary is exact (no leeway). jsonwebtoken only counts a
        // string `sub` as present, so the numeric `sub` is enforced by
        // deserializing into `Claims` instead.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<DbId, AuthFailure> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify `token` as of `now`. Valid while `now <= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<DbId, AuthFailure> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthFailure::Expired,
                _ => AuthFailure::InvalidSignature,
            })?
            .claims;

        if now > claims.exp {
            return Err(AuthFailure::Expired);
        }
        Ok(claims.sub)
    }
}
