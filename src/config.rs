//! Configuration for InnSpot
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Secret used to sign tokens when running in development mode
const DEV_JWT_SECRET: &str = "dev-mode-secret-not-for-production-use-123456";

/// InnSpot - booking backend for hotel-room reservations
#[derive(Parser, Debug, Clone)]
#[command(name = "innspot")]
#[command(about = "Room listing and booking API backed by MongoDB")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "innspot")]
    pub mongodb_db: String,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds, also used as the cookie Max-Age
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "86400")]
    pub jwt_expiry_seconds: u64,

    /// Enable development mode (insecure secret, in-memory store fallback)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// Comma-separated list of origins allowed to call the API with credentials
    #[arg(
        long,
        env = "CORS_ORIGINS",
        default_value = "http://localhost:5173,http://localhost:5174"
    )]
    pub cors_origins: String,

    /// Mark the auth cookie Secure with SameSite=None (disable for plain-http local use)
    #[arg(long, env = "COOKIE_SECURE", default_value = "true", action = clap::ArgAction::Set)]
    pub cookie_secure: bool,

    /// JSON file of rooms to load when running on the in-memory store
    #[arg(long, env = "SEED_ROOMS")]
    pub seed_rooms: Option<PathBuf>,
}

impl Args {
    /// Get effective JWT secret (uses default in dev mode)
    pub fn jwt_secret(&self) -> Option<String> {
        match &self.jwt_secret {
            Some(secret) => Some(secret.clone()),
            None if self.dev_mode => Some(DEV_JWT_SECRET.to_string()),
            None => None,
        }
    }

    /// Origins allowed by CORS
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.dev_mode {
            match &self.jwt_secret {
                None => return Err("JWT_SECRET is required in production mode".to_string()),
                Some(s) if s.len() < 32 => {
                    return Err("JWT_SECRET must be at least 32 characters".to_string())
                }
                Some(_) => {}
            }
        }

        if self.jwt_expiry_seconds == 0 {
            return Err("JWT_EXPIRY_SECONDS must be greater than zero".to_string());
        }

        if self.cors_origin_list().is_empty() {
            return Err("CORS_ORIGINS must name at least one origin".to_string());
        }

        Ok(())
    }

    /// Arguments suitable for tests and local tooling
    pub fn for_dev() -> Self {
        Self::parse_from(["innspot", "--dev-mode", "--cookie-secure", "false"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["innspot"]);
        assert_eq!(args.listen.port(), 5000);
        assert_eq!(args.mongodb_db, "innspot");
        assert_eq!(args.jwt_expiry_seconds, 86400);
        assert!(args.cookie_secure);
        assert!(!args.dev_mode);
        assert!(args.seed_rooms.is_none());
    }

    #[test]
    fn test_production_requires_secret() {
        let args = Args::parse_from(["innspot"]);
        assert!(args.validate().is_err());
        assert!(args.jwt_secret().is_none());

        let args = Args::parse_from(["innspot", "--jwt-secret", "too-short"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from([
            "innspot",
            "--jwt-secret",
            "this-secret-is-at-least-32-chars-long",
        ]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_dev_mode_secret_fallback() {
        let args = Args::for_dev();
        assert!(args.validate().is_ok());
        assert_eq!(args.jwt_secret().as_deref(), Some(DEV_JWT_SECRET));
        assert!(!args.cookie_secure);
    }

    #[test]
    fn test_cors_origin_list() {
        let args = Args::parse_from([
            "innspot",
            "--cors-origins",
            "https://innspot.app/, http://localhost:5173 ,,",
        ]);
        assert_eq!(
            args.cors_origin_list(),
            vec!["https://innspot.app", "http://localhost:5173"]
        );

        let args = Args::parse_from(["innspot", "--dev-mode", "--cors-origins", " , "]);
        assert!(args.validate().is_err());
    }
}
