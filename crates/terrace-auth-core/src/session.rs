//! Signed session cookies
//!
//! The session cookie is `base64url(payload).base64url(hmac)` over a small
//! JSON payload. Handlers trust only what verifies against the server
//! secret - a cookie's mere presence proves nothing.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::crypto::{constant_time_eq, HmacKey};
use crate::error::AuthError;

/// Session cookie payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Authenticated user's email - the access-control scope key
    pub email: String,
    /// Issue timestamp (milliseconds)
    pub issued: i64,
    /// Expiration timestamp (milliseconds)
    pub expires: i64,
}

impl SessionPayload {
    /// Create a new payload valid for `duration_hours`
    pub fn new(email: impl Into<String>, duration_hours: u32) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            email: email.into(),
            issued: now,
            expires: now + i64::from(duration_hours) * 60 * 60 * 1000,
        }
    }

    /// Check if the session is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires
    }
}

/// Issues and verifies signed session cookies
#[derive(Clone)]
pub struct SessionManager {
    hmac_key: HmacKey,
    session_duration_hours: u32,
}

impl SessionManager {
    /// Create a new session manager.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 bytes; the service config
    /// validates this before construction.
    pub fn new(secret: impl AsRef<[u8]>, session_duration_hours: u32) -> Self {
        let hmac_key = HmacKey::new(secret).expect("session secret must be at least 32 bytes");
        Self {
            hmac_key,
            session_duration_hours,
        }
    }

    /// Issue a signed session cookie for an authenticated email
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        let payload = SessionPayload::new(email, self.session_duration_hours);
        self.sign_payload(&payload)
    }

    /// Verify a session cookie and return its payload
    pub fn verify(&self, cookie: &str) -> Result<SessionPayload, AuthError> {
        let parts: Vec<&str> = cookie.rsplitn(2, '.').collect();
        if parts.len() != 2 {
            return Err(AuthError::InvalidToken);
        }

        let (signature, payload_b64) = (parts[0], parts[1]);

        let expected_sig = self.compute_signature(payload_b64);
        if !constant_time_eq(signature.as_bytes(), expected_sig.as_bytes()) {
            tracing::debug!("session signature mismatch");
            return Err(AuthError::InvalidToken);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload: SessionPayload =
            serde_json::from_slice(&payload_json).map_err(|_| AuthError::InvalidToken)?;

        if payload.is_expired() {
            return Err(AuthError::TokenExpired);
        }

        Ok(payload)
    }

    fn sign_payload(&self, payload: &SessionPayload) -> Result<String, AuthError> {
        let payload_json = serde_json::to_vec(payload).map_err(|e| {
            tracing::error!("failed to serialize session payload: {}", e);
            AuthError::Internal("failed to create session".to_string())
        })?;

        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = self.compute_signature(&payload_b64);

        Ok(format!("{payload_b64}.{signature}"))
    }

    fn compute_signature(&self, data: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.hmac_key.sign(data.as_bytes()))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_duration_hours", &self.session_duration_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "super-secret-key-for-testing-32b!";

    fn manager() -> SessionManager {
        SessionManager::new(SECRET, 24)
    }

    #[test]
    fn test_roundtrip() {
        let manager = manager();
        let cookie = manager.issue("jane@x.com").unwrap();
        let payload = manager.verify(&cookie).unwrap();
        assert_eq!(payload.email, "jane@x.com");
        assert!(!payload.is_expired());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let manager = manager();
        let mut cookie = manager.issue("jane@x.com").unwrap();
        let last = cookie.pop().unwrap();
        cookie.push(if last == 'a' { 'b' } else { 'a' });

        assert!(matches!(manager.verify(&cookie), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let manager = manager();
        let cookie = manager.issue("jane@x.com").unwrap();
        let signature = cookie.rsplitn(2, '.').next().unwrap().to_string();

        // Forge a payload claiming another identity and reuse the signature
        let evil = SessionPayload::new("attacker@evil.com", 24);
        let evil_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&evil).unwrap());
        let forged = format!("{evil_b64}.{signature}");

        assert!(matches!(manager.verify(&forged), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = SessionManager::new("a".repeat(32), 24);
        let verifier = SessionManager::new("b".repeat(32), 24);
        let cookie = signer.issue("jane@x.com").unwrap();
        assert!(matches!(verifier.verify(&cookie), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_session_rejected() {
        let manager = manager();
        let mut payload = SessionPayload::new("jane@x.com", 24);
        payload.expires = Utc::now().timestamp_millis() - 1000;
        let cookie = manager.sign_payload(&payload).unwrap();

        assert!(matches!(manager.verify(&cookie), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_malformed_cookie_rejected() {
        let manager = manager();
        for cookie in ["nodots", "", ".", "!!!bad-base64!!!.sig"] {
            assert!(
                matches!(manager.verify(cookie), Err(AuthError::InvalidToken)),
                "{cookie:?} should be rejected"
            );
        }

        // Valid base64 but not JSON
        let not_json = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(matches!(
            manager.verify(&format!("{not_json}.sig")),
            Err(AuthError::InvalidToken)
        ));
    }
}
