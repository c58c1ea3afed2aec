//! Authentication for InnSpot
//!
//! Provides:
//! - JWT token generation and validation
//! - The `accessToken` cookie that carries the token
//! - `AuthGate`, which ties the two together for the HTTP layer

pub mod cookie;
pub mod jwt;

pub use cookie::{extract_access_token, extract_cookie, CookiePolicy, ACCESS_TOKEN_COOKIE};
pub use jwt::{Claims, JwtValidator, TokenRequest};

use hyper::header::HeaderMap;
use tracing::{debug, warn};

use crate::types::InnspotError;

/// Issues, clears and verifies the token cookie
#[derive(Clone)]
pub struct AuthGate {
    jwt: JwtValidator,
    cookie: CookiePolicy,
}

impl AuthGate {
    pub fn new(jwt: JwtValidator, secure_cookie: bool) -> Self {
        let cookie = CookiePolicy {
            secure: secure_cookie,
            max_age_seconds: jwt.expiry_seconds(),
        };
        Self { jwt, cookie }
    }

    /// Validate the identity, sign it, and return the `Set-Cookie` value
    pub fn issue_token(&self, request: TokenRequest) -> Result<String, InnspotError> {
        let identity = request.validate()?;
        let token = self.jwt.generate_token(&identity)?;
        debug!("Issued access token for {}", identity.email);
        Ok(self.cookie.issue(&token))
    }

    /// `Set-Cookie` value that removes the token
    pub fn clear_token(&self) -> String {
        self.cookie.clear()
    }

    /// Decode the caller identity from the request cookie
    pub fn verify(&self, headers: &HeaderMap) -> Result<Claims, InnspotError> {
        let token = extract_access_token(headers).ok_or_else(|| {
            warn!("Rejected request without access token cookie");
            InnspotError::Unauthorized("Unauthorized access".into())
        })?;

        self.jwt.verify_token(token).map_err(|e| {
            warn!("Rejected access token: {}", e);
            e
        })
    }
}
