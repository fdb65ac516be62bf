//! CSRF state tokens
//!
//! Login issues a random nonce as the OAuth `state` parameter and stores a
//! signed expectation of it in a short-lived cookie. The callback must
//! present a `state` matching the cookie's nonce, making the anti-forgery
//! check enforced rather than decorative.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::{constant_time_eq, HmacKey};
use crate::error::AuthError;

/// How long a login attempt may take before its state expires
pub const STATE_TTL_MINUTES: i64 = 10;

#[derive(Debug, Serialize, Deserialize)]
struct StatePayload {
    nonce: String,
    expires: i64,
}

/// Issues and verifies signed CSRF state expectations
#[derive(Clone)]
pub struct StateManager {
    hmac_key: HmacKey,
}

impl StateManager {
    /// Create a new state manager.
    ///
    /// # Panics
    /// Panics if the secret is shorter than 32 bytes; the service config
    /// validates this before construction.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            hmac_key: HmacKey::new(secret).expect("state secret must be at least 32 bytes"),
        }
    }

    /// Issue a new state nonce and its signed cookie value.
    ///
    /// The nonce goes into the authorization URL; the cookie value is set
    /// on the browser so the callback can verify the echo.
    pub fn issue(&self) -> Result<(String, String), AuthError> {
        let payload = StatePayload {
            nonce: Uuid::new_v4().simple().to_string(),
            expires: (Utc::now() + chrono::Duration::minutes(STATE_TTL_MINUTES))
                .timestamp_millis(),
        };

        let payload_json = serde_json::to_vec(&payload)
            .map_err(|e| AuthError::Internal(format!("failed to serialize state: {e}")))?;
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);
        let signature = URL_SAFE_NO_PAD.encode(self.hmac_key.sign(payload_b64.as_bytes()));

        Ok((payload.nonce, format!("{payload_b64}.{signature}")))
    }

    /// Verify a returned `state` parameter against the stored expectation.
    pub fn verify(&self, cookie: &str, returned_state: &str) -> Result<(), AuthError> {
        let parts: Vec<&str> = cookie.rsplitn(2, '.').collect();
        if parts.len() != 2 {
            return Err(AuthError::StateMismatch);
        }
        let (signature, payload_b64) = (parts[0], parts[1]);

        let expected_sig = URL_SAFE_NO_PAD.encode(self.hmac_key.sign(payload_b64.as_bytes()));
        if !constant_time_eq(signature.as_bytes(), expected_sig.as_bytes()) {
            tracing::debug!("state cookie signature mismatch");
            return Err(AuthError::StateMismatch);
        }

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::StateMismatch)?;
        let payload: StatePayload =
            serde_json::from_slice(&payload_json).map_err(|_| AuthError::StateMismatch)?;

        if Utc::now().timestamp_millis() > payload.expires {
            return Err(AuthError::StateMismatch);
        }

        if !constant_time_eq(payload.nonce.as_bytes(), returned_state.as_bytes()) {
            return Err(AuthError::StateMismatch);
        }

        Ok(())
    }
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager").finish_non_exhaustive()
    }
}
