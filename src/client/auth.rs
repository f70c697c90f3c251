//! Access token generation and refresh

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::LaceworkClient;
use super::endpoints;
use crate::error::{ApiError, ConfigError, Result};

/// Default lifetime, in seconds, requested for new access tokens
pub const DEFAULT_TOKEN_EXPIRY_TIME: u64 = 3600;

/// Header carrying the secret during the token exchange
pub(crate) const SECRET_HEADER: &str = "X-LW-UAKS";

/// Internal authentication state
#[derive(Debug, Clone, Default)]
pub(crate) struct AuthState {
    pub(crate) key_id: Option<String>,
    pub(crate) secret: Option<String>,
    pub(crate) token: Option<String>,
    pub(crate) expires_at: Option<DateTime<Utc>>,
    pub(crate) expiration: u64,
}

impl AuthState {
    /// Copy the state out of a shared lock from synchronous code.
    ///
    /// Write guards are never held across an await, so a busy lock frees up
    /// right away.
    pub(crate) fn snapshot(state: &RwLock<AuthState>) -> AuthState {
        loop {
            if let Ok(guard) = state.try_read() {
                return guard.clone();
            }
            std::thread::yield_now();
        }
    }

    /// Tokens without a known expiry are trusted until the server rejects them
    fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => expires_at <= Utc::now(),
        }
    }

    fn usable_token(&self) -> Option<&str> {
        match &self.token {
            Some(token) if !token.is_empty() && !self.is_expired() => Some(token),
            _ => None,
        }
    }

    fn keys(&self) -> Option<(String, String)> {
        match (&self.key_id, &self.secret) {
            (Some(key_id), Some(secret)) if !key_id.is_empty() && !secret.is_empty() => {
                Some((key_id.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

/// Access token minted by the API
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenRequest {
    pub key_id: String,
    pub expiry_time: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenData {
    token: String,
    #[serde(default)]
    expires_at: Option<String>,
}

/// The token endpoint answers with a bare object (v2) or a `data` array (v1)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Enveloped {
        data: Vec<TokenData>,
        #[serde(default)]
        #[allow(dead_code)]
        ok: Option<bool>,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(TokenData),
}

impl TokenResponse {
    fn into_access_token(self, expiration: u64) -> Result<AccessToken> {
        let data = match self {
            TokenResponse::Bare(data) => data,
            TokenResponse::Enveloped { data, message, .. } => {
                data.into_iter().next().ok_or_else(|| {
                    ApiError::InvalidResponse(format!(
                        "token response without data: {}",
                        message.unwrap_or_default()
                    ))
                })?
            }
        };

        if data.token.is_empty() {
            return Err(ApiError::InvalidResponse("empty access token".to_string()).into());
        }

        let expires_at = data
            .expires_at
            .as_deref()
            .and_then(|at| DateTime::parse_from_rfc3339(at).ok())
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::seconds(expiration as i64));

        Ok(AccessToken {
            token: data.token,
            expires_at,
        })
    }
}

impl LaceworkClient {
    /// Exchange the configured key id and secret for a new access token.
    ///
    /// The token is stored in the client and used by every following request.
    pub async fn generate_token(&self) -> Result<AccessToken> {
        let (keys, expiration) = {
            let state = self.auth_state.read().await;
            (state.keys(), state.expiration)
        };
        let (key_id, secret) = keys.ok_or(ConfigError::MissingApiKeys)?;

        let request = TokenRequest {
            key_id,
            expiry_time: expiration,
        };
        let response: TokenResponse = self
            .send_token_request(Method::POST, endpoints::ACCESS_TOKENS, &request, &secret)
            .await?;
        let token = response.into_access_token(expiration)?;

        debug!(
            "access token generated id={} expires_at={}",
            self.id, token.expires_at
        );
        self.set_token(token.clone()).await;
        Ok(token)
    }

    /// Replace the keys and generate a new access token with them
    pub async fn generate_token_with_keys(
        &self,
        key_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<AccessToken> {
        {
            let mut state = self.auth_state.write().await;
            state.key_id = Some(key_id.into());
            state.secret = Some(secret.into());
        }
        self.generate_token().await
    }

    /// Store an access token and its expiry
    pub async fn set_token(&self, token: AccessToken) {
        let mut state = self.auth_state.write().await;
        state.token = Some(token.token);
        state.expires_at = Some(token.expires_at);
    }

    /// Whether the client holds an access token
    pub async fn valid_auth(&self) -> bool {
        let state = self.auth_state.read().await;
        state.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Whether the stored token's expiry is in the past
    pub async fn is_token_expired(&self) -> bool {
        self.auth_state.read().await.is_expired()
    }

    /// Get the current token, generating a new one when missing or expired.
    ///
    /// Refreshes are serialized so concurrent callers mint at most one token.
    pub(crate) async fn valid_token(&self) -> Result<String> {
        if let Some(token) = self.auth_state.read().await.usable_token() {
            return Ok(token.to_string());
        }

        let _refresh = self.refresh_lock.lock().await;

        let expired = {
            let state = self.auth_state.read().await;
            if let Some(token) = state.usable_token() {
                return Ok(token.to_string());
            }
            state.token.is_some()
        };

        if expired {
            debug!("access token expired, generating a new one id={}", self.id);
            self.callbacks.expired();
        }

        let token = self.generate_token().await?;
        Ok(token.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LaceworkClient {
        LaceworkClient::builder("demo").build().unwrap()
    }

    #[test]
    fn test_token_request_body() {
        let body = serde_json::to_value(TokenRequest {
            key_id: "KEY".to_string(),
            expiry_time: 3600,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"keyId": "KEY", "expiryTime": 3600}));
    }

    #[test]
    fn test_bare_token_response() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"token": "_secret", "expiresAt": "2030-06-23T00:06:52.035Z"}"#,
        )
        .unwrap();
        let token = response.into_access_token(3600).unwrap();
        assert_eq!(token.token, "_secret");
        assert_eq!(token.expires_at.to_rfc3339(), "2030-06-23T00:06:52.035+00:00");
    }

    #[test]
    fn test_enveloped_token_response() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"data": [{"token": "_secret", "expiresAt": "Apr 15 2030 21:41"}], "ok": true, "message": "SUCCESS"}"#,
        )
        .unwrap();
        let before = Utc::now();
        let token = response.into_access_token(600).unwrap();
        assert_eq!(token.token, "_secret");
        // unparseable expiry falls back to now + requested lifetime
        assert!(token.expires_at >= before + chrono::Duration::seconds(600));
    }

    #[test]
    fn test_empty_token_response_is_an_error() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"data": [], "ok": false, "message": "nope"}"#).unwrap();
        let err = response.into_access_token(3600).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_generate_token_without_keys() {
        let err = client().generate_token().await.unwrap_err();
        assert!(err.to_string().contains("auth keys missing"));
    }

    #[tokio::test]
    async fn test_token_expiry_check() {
        let client = client();

        assert!(!client.valid_auth().await);
        assert!(!client.is_token_expired().await);

        client
            .set_token(AccessToken {
                token: "test".to_string(),
                expires_at: Utc::now() - chrono::Duration::hours(1),
            })
            .await;
        assert!(client.valid_auth().await);
        assert!(client.is_token_expired().await);

        client
            .set_token(AccessToken {
                token: "test".to_string(),
                expires_at: Utc::now() + chrono::Duration::hours(1),
            })
            .await;
        assert!(!client.is_token_expired().await);
    }

    #[tokio::test]
    async fn test_valid_token_uses_unexpired_token() {
        let client = LaceworkClient::builder("demo")
            .token_with_expiration("cached", Utc::now() + chrono::Duration::hours(1))
            .build()
            .unwrap();
        assert_eq!(client.valid_token().await.unwrap(), "cached");
    }

    #[tokio::test]
    async fn test_expired_token_without_keys_fails() {
        let client = LaceworkClient::builder("demo")
            .token_with_expiration("stale", Utc::now() - chrono::Duration::minutes(1))
            .build()
            .unwrap();
        let err = client.valid_token().await.unwrap_err();
        assert!(err.to_string().contains("auth keys missing"));
    }
}
