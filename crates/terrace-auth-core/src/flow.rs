//! OAuth authorization-code flow client
//!
//! Server-to-server calls against the identity provider: building the
//! authorization redirect, exchanging the returned code for tokens,
//! fetching the user profile, and revoking tokens at logout. The provider
//! issues opaque tokens; session integrity comes from our own signed
//! cookies, not from inspecting these tokens.

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use crate::config::{OAuthConfig, AUTHORIZE_PATH, REVOKE_PATH, TOKEN_PATH, USERINFO_PATH};
use crate::error::AuthError;

/// Tokens returned by a successful code exchange
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access-token lifetime in seconds
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    // The provider reports bad codes as a 200 with an error field
    error: Option<String>,
}

/// Provider user profile.
///
/// The provider capitalizes field names (`Email`, `Display_Name`); the
/// aliases accept both spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(alias = "Email")]
    pub email: Option<String>,
    #[serde(alias = "Display_Name", default)]
    pub display_name: Option<String>,
    #[serde(alias = "First_Name", default)]
    pub first_name: Option<String>,
    #[serde(alias = "Last_Name", default)]
    pub last_name: Option<String>,
}

impl UserInfo {
    /// The profile email, required for a session to be established
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// OAuth provider client
#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
    config: OAuthConfig,
}

impl OAuthClient {
    /// Create a new provider client
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// The configured default accounts server
    pub fn default_accounts_server(&self) -> &str {
        &self.config.accounts_server
    }

    /// Build the provider authorization URL for a login redirect.
    ///
    /// `state` is the anti-forgery nonce the callback must echo back.
    pub fn authorize_url(&self, state: &str, accounts_server: Option<&str>) -> Result<String, AuthError> {
        let base = accounts_server.unwrap_or(&self.config.accounts_server);
        let url = Url::parse_with_params(
            &format!("{base}{AUTHORIZE_PATH}"),
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("scope", self.config.scopes.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Internal(format!("invalid accounts server url: {e}")))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for tokens.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(
        &self,
        code: &str,
        accounts_server: &str,
    ) -> Result<TokenSet, AuthError> {
        debug!("exchanging authorization code");

        let response = self
            .http
            .post(format!("{accounts_server}{TOKEN_PATH}"))
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "token endpoint error");
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message: "token exchange rejected".to_string(),
            });
        }

        let raw: RawTokenResponse = response.json().await?;

        if let Some(err) = raw.error {
            error!(error = %err, "token exchange reported an error");
            return Err(AuthError::ExchangeFailed(err));
        }

        let access_token = raw
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::ExchangeFailed("no access_token in response".to_string()))?;

        Ok(TokenSet {
            access_token,
            refresh_token: raw.refresh_token.filter(|t| !t.is_empty()),
            expires_in: raw.expires_in.unwrap_or(3600),
        })
    }

    /// Fetch the signed-in user's profile.
    #[instrument(skip(self, access_token))]
    pub async fn fetch_userinfo(
        &self,
        access_token: &str,
        accounts_server: &str,
    ) -> Result<UserInfo, AuthError> {
        let response = self
            .http
            .get(format!("{accounts_server}{USERINFO_PATH}"))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "userinfo endpoint error");
            return Err(AuthError::Provider {
                status: status.as_u16(),
                message: "userinfo fetch rejected".to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Revoke a token with the provider. Best-effort: failures are logged
    /// and returned, but logout proceeds regardless.
    #[instrument(skip(self, token))]
    pub async fn revoke_token(&self, token: &str, accounts_server: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(format!("{accounts_server}{REVOKE_PATH}"))
            .form(&[("token", token)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "token revocation rejected");
            return Err(AuthError::Provider {
                status: response.status().as_u16(),
                message: "revocation rejected".to_string(),
            });
        }

        debug!("token revoked");
        Ok(())
    }
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("client_id", &self.config.client_id)
            .field("redirect_uri", &self.config.redirect_uri)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OAuthClient {
        OAuthClient::new(
            OAuthConfig::try_new("cid", "secret", "http://localhost:8080/auth/callback").unwrap(),
        )
    }

    #[test]
    fn test_authorize_url_carries_required_params() {
        let url = client().authorize_url("nonce123", None).unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert!(url.starts_with("https://accounts.zoho.com/oauth/v2/auth?"));
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["client_id"], "cid");
        assert_eq!(pairs["state"], "nonce123");
        assert_eq!(pairs["access_type"], "offline");
        assert_eq!(pairs["prompt"], "consent");
        assert_eq!(pairs["redirect_uri"], "http://localhost:8080/auth/callback");
    }

    #[test]
    fn test_authorize_url_honors_accounts_server() {
        let url = client()
            .authorize_url("s", Some("https://accounts.zoho.in"))
            .unwrap();
        assert!(url.starts_with("https://accounts.zoho.in/oauth/v2/auth?"));
    }

    #[test]
    fn test_userinfo_email_accessor() {
        let info: UserInfo =
            serde_json::from_str(r#"{"Email": "jane@x.com", "Display_Name": "Jane"}"#).unwrap();
        assert_eq!(info.email(), Some("jane@x.com"));

        let info: UserInfo = serde_json::from_str(r#"{"Display_Name": "NoMail"}"#).unwrap();
        assert_eq!(info.email(), None);

        let info: UserInfo = serde_json::from_str(r#"{"Email": ""}"#).unwrap();
        assert_eq!(info.email(), None);

        // Lowercase spelling also accepted
        let info: UserInfo = serde_json::from_str(r#"{"email": "low@x.com"}"#).unwrap();
        assert_eq!(info.email(), Some("low@x.com"));
    }
}
