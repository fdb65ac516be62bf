//! Configuration for the dashboard API service.

use std::path::PathBuf;
use std::time::Duration;

use terrace_auth_core::OAuthConfig;
use terrace_ingest::SheetsApiConfig;

/// Where sheet rows come from
#[derive(Debug, Clone)]
pub enum SheetSource {
    /// Google Sheets values API
    Api(SheetsApiConfig),
    /// Local workbook fallback for machines without API credentials
    Xlsx(PathBuf),
}

/// Dashboard API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Cookie-signing secret (minimum 32 bytes)
    pub session_secret: String,

    /// Session cookie lifetime in hours
    pub session_duration_hours: u32,

    /// OAuth provider configuration
    pub oauth: OAuthConfig,

    /// Admin identity with the ownership override
    pub admin_email: String,

    /// Sheet row source
    pub sheet_source: SheetSource,

    /// Where the browser lands after a successful login
    pub post_login_redirect: String,

    /// Mark cookies Secure (behind TLS)
    pub cookie_secure: bool,

    /// Request timeout
    pub request_timeout: Duration,

    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Cookie-signing secret (minimum 32 bytes)
        let session_secret =
            std::env::var("SESSION_SECRET").map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;

        if session_secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "SESSION_SECRET must be at least 32 characters",
            ));
        }

        // Session duration (default 30 days, matching the refresh cookie)
        let session_duration_hours: u32 = std::env::var("SESSION_DURATION_HOURS")
            .unwrap_or_else(|_| "720".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_DURATION_HOURS"))?;

        // OAuth provider
        let client_id = std::env::var("OAUTH_CLIENT_ID")
            .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_ID"))?;
        let client_secret = std::env::var("OAUTH_CLIENT_SECRET")
            .map_err(|_| ConfigError::Missing("OAUTH_CLIENT_SECRET"))?;
        let redirect_uri = std::env::var("OAUTH_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/auth/callback".to_string());

        let mut oauth = OAuthConfig::try_new(client_id, client_secret, redirect_uri)
            .map_err(|e| ConfigError::OAuth(e.to_string()))?;
        if let Ok(scopes) = std::env::var("OAUTH_SCOPES") {
            oauth = oauth.with_scopes(scopes);
        }
        if let Ok(server) = std::env::var("OAUTH_ACCOUNTS_SERVER") {
            oauth = oauth.with_accounts_server(server);
        }

        // Admin override identity
        let admin_email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| terrace_deals_core::config::DEFAULT_ADMIN_EMAIL.to_string());

        // Sheet source: the values API when credentials are present,
        // otherwise the local workbook
        let sheet_source = match (
            std::env::var("SHEETS_SPREADSHEET_ID"),
            std::env::var("SHEETS_API_KEY"),
        ) {
            (Ok(spreadsheet_id), Ok(api_key)) => SheetSource::Api(SheetsApiConfig {
                spreadsheet_id,
                range: std::env::var("SHEETS_RANGE").unwrap_or_else(|_| "Sheet1!A:Z".to_string()),
                api_key,
            }),
            _ => SheetSource::Xlsx(PathBuf::from(
                std::env::var("SHEETS_XLSX_PATH").unwrap_or_else(|_| "listings.xlsx".to_string()),
            )),
        };

        let post_login_redirect = std::env::var("POST_LOGIN_REDIRECT")
            .unwrap_or_else(|_| "/dashboard".to_string());

        let cookie_secure = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        // Request timeout (default 30 seconds)
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            http_port,
            database_url,
            session_secret,
            session_duration_hours,
            oauth,
            admin_email,
            sheet_source,
            post_login_redirect,
            cookie_secure,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("OAuth config error: {0}")]
    OAuth(String),
}
