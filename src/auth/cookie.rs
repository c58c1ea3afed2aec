//! Auth cookie issuing and extraction

use hyper::header::{HeaderMap, COOKIE};

/// Name of the cookie carrying the signed token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Attributes shared by the issue and clear cookies
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Secure + SameSite=None (cross-site); otherwise SameSite=Lax without Secure
    pub secure: bool,
    pub max_age_seconds: u64,
}

impl CookiePolicy {
    fn attributes(&self, max_age: u64) -> String {
        let same_site = if self.secure {
            "; Secure; SameSite=None"
        } else {
            "; SameSite=Lax"
        };
        format!("Path=/; Max-Age={}; HttpOnly{}", max_age, same_site)
    }

    /// `Set-Cookie` value carrying a freshly signed token
    pub fn issue(&self, token: &str) -> String {
        format!(
            "{}={}; {}",
            ACCESS_TOKEN_COOKIE,
            token,
            self.attributes(self.max_age_seconds)
        )
    }

    /// `Set-Cookie` value that removes the token cookie
    pub fn clear(&self) -> String {
        format!("{}=; {}", ACCESS_TOKEN_COOKIE, self.attributes(0))
    }
}

/// Find a cookie value by name across all `Cookie` headers
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Extract the access token cookie
pub fn extract_access_token(headers: &HeaderMap) -> Option<&str> {
    extract_cookie(headers, ACCESS_TOKEN_COOKIE)
}
