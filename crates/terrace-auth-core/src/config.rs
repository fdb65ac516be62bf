//! OAuth provider configuration

use crate::error::AuthError;

/// Default provider accounts server (multi-DC providers send a different
/// one back on the callback)
pub const DEFAULT_ACCOUNTS_SERVER: &str = "https://accounts.zoho.com";

/// Default OAuth scopes: enough to read the signed-in user's profile
pub const DEFAULT_SCOPES: &str = "profile.userinfo.read email";

/// Provider endpoint paths, relative to an accounts server
pub const AUTHORIZE_PATH: &str = "/oauth/v2/auth";
pub const TOKEN_PATH: &str = "/oauth/v2/token";
pub const REVOKE_PATH: &str = "/oauth/v2/token/revoke";
pub const USERINFO_PATH: &str = "/oauth/user/info";

/// OAuth client configuration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect target registered with the provider
    pub redirect_uri: String,
    /// Space-separated scopes
    pub scopes: String,
    /// Default accounts server for login initiation
    pub accounts_server: String,
}

impl OAuthConfig {
    /// Create a validated configuration
    pub fn try_new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        let redirect_uri = redirect_uri.into();

        if client_id.is_empty() {
            return Err(AuthError::Internal("OAuth client_id is empty".to_string()));
        }
        if client_secret.is_empty() {
            return Err(AuthError::Internal(
                "OAuth client_secret is empty".to_string(),
            ));
        }
        if redirect_uri.is_empty() {
            return Err(AuthError::Internal(
                "OAuth redirect_uri is empty".to_string(),
            ));
        }

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes: DEFAULT_SCOPES.to_string(),
            accounts_server: DEFAULT_ACCOUNTS_SERVER.to_string(),
        })
    }

    /// Override the requested scopes
    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = scopes.into();
        self
    }

    /// Override the default accounts server
    pub fn with_accounts_server(mut self, server: impl Into<String>) -> Self {
        self.accounts_server = server.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_rejected() {
        assert!(OAuthConfig::try_new("", "secret", "http://x/cb").is_err());
        assert!(OAuthConfig::try_new("id", "", "http://x/cb").is_err());
        assert!(OAuthConfig::try_new("id", "secret", "").is_err());
    }

    #[test]
    fn test_defaults_applied() {
        let config = OAuthConfig::try_new("id", "secret", "http://x/cb").unwrap();
        assert_eq!(config.accounts_server, DEFAULT_ACCOUNTS_SERVER);
        assert_eq!(config.scopes, DEFAULT_SCOPES);

        let config = config.with_scopes("email").with_accounts_server("https://accounts.zoho.in");
        assert_eq!(config.scopes, "email");
        assert_eq!(config.accounts_server, "https://accounts.zoho.in");
    }
}
