//! # Application Configuration
//!
//! Environment-driven configuration for the API server. Every knob has a
//! development default except `DATABASE_URL` and `PRAXIS_JWT_SECRET`, which
//! are required.

use auth::JwtConfig;
use error::{AppError, Result};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// First-run owner account applied on startup when no staff exist.
#[derive(Debug, Clone)]
pub struct InitialOwner {
    pub email:    String,
    pub password: String,
    pub name:     String,
}

/// Application configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string (`DATABASE_URL`)
    pub database_url:     String,
    /// Listen address for the HTTP server (`PRAXIS_LISTEN_ADDR`)
    pub listen_addr:      String,
    /// Public base URL used when building invite links
    pub base_url:         String,
    /// Allowed CORS origin (`PRAXIS_CORS_ORIGIN`)
    pub cors_origin:      Option<String>,
    /// Owner account created on first run when the staff table is empty
    pub initial_owner:    Option<InitialOwner>,
    /// Operator-supplied bootstrap secret (`PRAXIS_BOOTSTRAP_SECRET`)
    pub bootstrap_secret: Option<String>,
    /// Base64-encoded JWT signing secret (`PRAXIS_JWT_SECRET`)
    pub jwt_secret:       String,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `Config` errors for missing required variables.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AppError::config("DATABASE_URL is required"))?;
        let jwt_secret = std::env::var("PRAXIS_JWT_SECRET")
            .map_err(|_| AppError::config("PRAXIS_JWT_SECRET is required"))?;

        let listen_addr =
            std::env::var("PRAXIS_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origin = std::env::var("PRAXIS_CORS_ORIGIN").ok().filter(|s| !s.is_empty());
        let base_url = resolve_base_url(
            std::env::var("PRAXIS_APP_URL").ok().as_deref(),
            cors_origin.as_deref(),
        );

        let bootstrap_secret = std::env::var("PRAXIS_BOOTSTRAP_SECRET")
            .ok()
            .filter(|s| !s.is_empty());

        let initial_owner = match (
            std::env::var("PRAXIS_INITIAL_OWNER_EMAIL").ok(),
            std::env::var("PRAXIS_INITIAL_OWNER_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(InitialOwner {
                    email,
                    password,
                    name: std::env::var("PRAXIS_INITIAL_OWNER_NAME")
                        .unwrap_or_else(|_| "Owner".to_string()),
                })
            },
            _ => None,
        };

        Ok(Self {
            database_url,
            listen_addr,
            base_url,
            cors_origin,
            initial_owner,
            bootstrap_secret,
            jwt_secret,
        })
    }

    /// JWT configuration for staff access tokens.
    #[must_use]
    pub fn jwt_config(&self) -> JwtConfig { JwtConfig::new(self.jwt_secret.clone()) }
}

/// Base URL resolution: explicit app URL first, then the CORS origin when it
/// looks like an http(s) URL, then the development fallback.
fn resolve_base_url(app_url: Option<&str>, cors_origin: Option<&str>) -> String {
    if let Some(url) = app_url.filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    if let Some(origin) = cors_origin {
        if origin.starts_with("http://") || origin.starts_with("https://") {
            return origin.trim_end_matches('/').to_string();
        }
    }
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_prefers_app_url() {
        assert_eq!(
            resolve_base_url(Some("https://app.example.com/"), Some("https://other.example.com")),
            "https://app.example.com"
        );
    }

    #[test]
    fn test_base_url_falls_back_to_http_cors_origin() {
        assert_eq!(
            resolve_base_url(None, Some("https://portal.example.com")),
            "https://portal.example.com"
        );
        // A bare origin pattern is not a usable base URL.
        assert_eq!(resolve_base_url(None, Some("*")), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_development_default() {
        assert_eq!(resolve_base_url(None, None), DEFAULT_BASE_URL);
        assert_eq!(resolve_base_url(Some(""), None), DEFAULT_BASE_URL);
    }
}
