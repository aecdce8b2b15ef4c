//! HTTP public-client application for the Microsoft identity platform.
//!
//! This is the production [`IdentityClient`]: form-encoded POSTs against the
//! tenant's v2.0 device-authorization and token endpoints, with an in-memory
//! account cache so a later run in the same process can go silent. Nothing
//! is persisted across process restarts.

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use parking_lot::Mutex;
use serde_json::Value;

use crate::client::{Account, IdentityClient};
use crate::config::IdentityConfig;
use crate::error::AuthError;
use crate::flow::{DeviceCodeFlow, str_field, u64_field};
use crate::token::{AccessToken, TokenRejection, TokenResult};

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Default polling interval when the flow descriptor omits one.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Default flow lifetime when the flow descriptor omits one.
const DEFAULT_FLOW_LIFETIME_SECS: u64 = 900;
/// How much to stretch the interval on a `slow_down` reply.
const SLOW_DOWN_BACKOFF: Duration = Duration::from_secs(5);

/// Cache key when the provider issues no identifiable account claim.
const FALLBACK_USERNAME: &str = "(default)";

struct CachedSession {
    account: Account,
    refresh_token: String,
}

/// An OAuth public-client application bound to one identity configuration.
///
/// Explicitly constructed and caller-owned; nothing is process-global, so
/// several configurations can coexist in one process. The account cache is
/// the only shared mutable state and is guarded internally.
pub struct PublicClientApplication {
    http: reqwest::Client,
    config: IdentityConfig,
    poll_timeout: Option<Duration>,
    sessions: Mutex<Vec<CachedSession>>,
}

impl PublicClientApplication {
    /// Create a public-client application for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] for an incomplete configuration
    /// or [`AuthError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: IdentityConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            config,
            poll_timeout: None,
            sessions: Mutex::new(Vec::new()),
        })
    }

    /// Cap the overall device-code polling time.
    ///
    /// The flow's own lifetime still applies; this can only shorten it.
    /// Expiry surfaces as a rejection with error code `expired_token`.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    /// The identity configuration this application was built with.
    #[must_use]
    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String, AuthError> {
        let response = self
            .http
            .post(url)
            .header("client-request-id", uuid::Uuid::new_v4().to_string())
            .form(form)
            .send()
            .await?;
        // Pending/denied replies arrive with 4xx status and a JSON body;
        // the body is parsed either way, so the status is not checked here.
        Ok(response.text().await?)
    }

    fn refresh_token_for(&self, account: &Account) -> Option<String> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.account == *account)
            .map(|s| s.refresh_token.clone())
    }

    fn record_session(&self, reply: &TokenReply) {
        let Some(refresh_token) = reply.refresh_token.clone() else {
            return;
        };
        let username = reply
            .id_token
            .as_deref()
            .and_then(username_from_id_token)
            .unwrap_or_else(|| FALLBACK_USERNAME.to_string());
        let account = Account::new(username);
        let mut sessions = self.sessions.lock();
        match sessions.iter_mut().find(|s| s.account == account) {
            Some(session) => session.refresh_token = refresh_token,
            None => sessions.push(CachedSession {
                account,
                refresh_token,
            }),
        }
    }
}

impl IdentityClient for PublicClientApplication {
    fn cached_accounts(&self) -> Vec<Account> {
        self.sessions
            .lock()
            .iter()
            .map(|s| s.account.clone())
            .collect()
    }

    async fn acquire_token_silent(&self, scope: &str, account: &Account) -> Option<TokenResult> {
        let refresh_token = self.refresh_token_for(account)?;
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope),
            ("refresh_token", refresh_token.as_str()),
        ];
        let body = match self.post_form(&self.config.token_endpoint(), &form).await {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(error = %err, "silent acquisition transport failure");
                return None;
            }
        };
        let reply = TokenReply::parse(&body);
        if reply.access_token.is_none() {
            tracing::debug!(
                error = reply.error.as_deref().unwrap_or("unknown"),
                username = account.username.as_str(),
                "silent acquisition yielded nothing"
            );
            return None;
        }
        self.record_session(&reply);
        Some(reply.into_result())
    }

    async fn initiate_device_flow(&self, scope: &str) -> Result<DeviceCodeFlow, AuthError> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("scope", scope),
        ];
        let endpoint = self.config.device_authorization_endpoint();
        let body = self.post_form(&endpoint, &form).await?;
        let raw: Value = serde_json::from_str(&body).map_err(|_| AuthError::DeviceFlowInit {
            response: body.clone(),
        })?;
        Ok(DeviceCodeFlow::from_raw(raw))
    }

    async fn complete_device_flow(&self, flow: &DeviceCodeFlow) -> Result<TokenResult, AuthError> {
        let device_code = flow
            .device_code
            .clone()
            .ok_or_else(|| AuthError::DeviceFlowInit {
                response: flow.raw().to_string(),
            })?;

        let mut interval =
            Duration::from_secs(flow.interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS).max(1));
        let lifetime = Duration::from_secs(flow.expires_in.unwrap_or(DEFAULT_FLOW_LIFETIME_SECS));
        let poll_window = match self.poll_timeout {
            Some(timeout) => lifetime.min(timeout),
            None => lifetime,
        };
        let deadline = Instant::now() + poll_window;

        loop {
            if Instant::now() + interval >= deadline {
                return Ok(TokenResult::Rejected(TokenRejection {
                    error: "expired_token".into(),
                    error_description: Some(
                        "device code flow did not complete before the deadline".into(),
                    ),
                    correlation_id: None,
                }));
            }
            tokio::time::sleep(interval).await;

            let form = [
                ("grant_type", DEVICE_CODE_GRANT),
                ("client_id", self.config.client_id.as_str()),
                ("device_code", device_code.as_str()),
            ];
            let body = self.post_form(&self.config.token_endpoint(), &form).await?;
            let reply = TokenReply::parse(&body);

            match reply.error.as_deref() {
                Some("authorization_pending") => continue,
                Some("slow_down") => {
                    interval += SLOW_DOWN_BACKOFF;
                    continue;
                }
                _ => {}
            }

            if reply.access_token.is_some() {
                self.record_session(&reply);
            }
            return Ok(reply.into_result());
        }
    }
}

impl std::fmt::Debug for PublicClientApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicClientApplication")
            .field("client_id", &self.config.client_id)
            .field("tenant_id", &self.config.tenant_id)
            .field("cached_accounts", &self.sessions.lock().len())
            .finish_non_exhaustive()
    }
}

/// Raw fields of a token-endpoint response, extracted leniently.
struct TokenReply {
    access_token: Option<String>,
    expires_in: Option<u64>,
    refresh_token: Option<String>,
    id_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    correlation_id: Option<String>,
}

impl TokenReply {
    fn parse(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self {
                access_token: None,
                expires_in: None,
                refresh_token: None,
                id_token: None,
                error: Some("invalid_response".into()),
                error_description: Some(body.chars().take(500).collect()),
                correlation_id: None,
            };
        };
        Self {
            access_token: str_field(&value, "access_token"),
            expires_in: u64_field(&value, "expires_in"),
            refresh_token: str_field(&value, "refresh_token"),
            id_token: str_field(&value, "id_token"),
            error: str_field(&value, "error"),
            error_description: str_field(&value, "error_description"),
            correlation_id: str_field(&value, "correlation_id"),
        }
    }

    fn into_result(self) -> TokenResult {
        if let Some(secret) = self.access_token {
            let token = match self.expires_in {
                Some(secs) => AccessToken::with_expiry(secret, Duration::from_secs(secs)),
                None => AccessToken::new(secret),
            };
            return TokenResult::Issued(token);
        }
        let mut rejection = TokenRejection {
            error: self.error.unwrap_or_else(|| "invalid_response".into()),
            error_description: self.error_description,
            correlation_id: self.correlation_id,
        };
        if rejection.error == "invalid_response" && rejection.error_description.is_none() {
            rejection.error_description =
                Some("token response contained neither access_token nor error".into());
        }
        TokenResult::Rejected(rejection)
    }
}

fn username_from_id_token(id_token: &str) -> Option<String> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    str_field(&claims, "preferred_username").or_else(|| str_field(&claims, "upn"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> IdentityConfig {
        IdentityConfig::for_azure_sql("client-id", "tenant-id")
    }

    fn unsigned_id_token(username: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD
            .encode(json!({"preferred_username": username}).to_string().as_bytes());
        format!("{header}.{payload}.")
    }

    #[test]
    fn test_parse_issued_reply() {
        let body = json!({
            "access_token": "token-secret",
            "refresh_token": "refresh-secret",
            "expires_in": 3599,
        })
        .to_string();
        let reply = TokenReply::parse(&body);
        assert_eq!(reply.access_token.as_deref(), Some("token-secret"));
        assert_eq!(reply.expires_in, Some(3599));
        match reply.into_result() {
            TokenResult::Issued(token) => assert_eq!(token.secret(), "token-secret"),
            TokenResult::Rejected(r) => panic!("expected issued token, got {r:?}"),
        }
    }

    #[test]
    fn test_parse_rejected_reply_keeps_diagnostics() {
        let body = json!({
            "error": "invalid_grant",
            "error_description": "consent revoked",
            "correlation_id": "xyz",
        })
        .to_string();
        match TokenReply::parse(&body).into_result() {
            TokenResult::Rejected(r) => {
                assert_eq!(r.error, "invalid_grant");
                assert_eq!(r.error_description.as_deref(), Some("consent revoked"));
                assert_eq!(r.correlation_id.as_deref(), Some("xyz"));
            }
            TokenResult::Issued(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_parse_non_json_reply_is_rejection() {
        match TokenReply::parse("<html>gateway timeout</html>").into_result() {
            TokenResult::Rejected(r) => {
                assert_eq!(r.error, "invalid_response");
                assert!(r.error_description.unwrap().contains("gateway timeout"));
            }
            TokenResult::Issued(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_parse_empty_object_synthesizes_rejection() {
        match TokenReply::parse("{}").into_result() {
            TokenResult::Rejected(r) => {
                assert_eq!(r.error, "invalid_response");
                assert!(r.error_description.is_some());
            }
            TokenResult::Issued(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_username_from_id_token() {
        let token = unsigned_id_token("user@contoso.com");
        assert_eq!(
            username_from_id_token(&token).as_deref(),
            Some("user@contoso.com")
        );
        assert!(username_from_id_token("not-a-jwt").is_none());
    }

    #[test]
    fn test_record_session_rotates_refresh_token() {
        let app = PublicClientApplication::new(config()).unwrap();
        assert!(app.cached_accounts().is_empty());

        let first = TokenReply::parse(
            &json!({
                "access_token": "a",
                "refresh_token": "r1",
                "id_token": unsigned_id_token("user@contoso.com"),
            })
            .to_string(),
        );
        app.record_session(&first);
        let accounts = app.cached_accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "user@contoso.com");

        let second = TokenReply::parse(
            &json!({
                "access_token": "b",
                "refresh_token": "r2",
                "id_token": unsigned_id_token("user@contoso.com"),
            })
            .to_string(),
        );
        app.record_session(&second);
        assert_eq!(app.cached_accounts().len(), 1);
        assert_eq!(
            app.refresh_token_for(&accounts[0]).as_deref(),
            Some("r2")
        );
    }

    #[test]
    fn test_record_session_without_id_token_uses_fallback_key() {
        let app = PublicClientApplication::new(config()).unwrap();
        let reply = TokenReply::parse(
            &json!({"access_token": "a", "refresh_token": "r1"}).to_string(),
        );
        app.record_session(&reply);
        assert_eq!(app.cached_accounts()[0].username, FALLBACK_USERNAME);
    }

    #[tokio::test]
    async fn test_silent_acquisition_for_unknown_account_is_none() {
        let app = PublicClientApplication::new(config()).unwrap();
        let account = Account::new("nobody@contoso.com");
        // No cached session for the account, so no request is made.
        let result = app
            .acquire_token_silent(crate::config::AZURE_SQL_SCOPE, &account)
            .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_complete_device_flow_requires_device_code() {
        let app = PublicClientApplication::new(config()).unwrap();
        let flow = DeviceCodeFlow::from_raw(json!({"user_code": "ABC123"}));
        let err = app.complete_device_flow(&flow).await.unwrap_err();
        assert!(matches!(err, AuthError::DeviceFlowInit { .. }));
    }

    #[test]
    fn test_debug_redacts_sessions() {
        let app = PublicClientApplication::new(config()).unwrap();
        let reply = TokenReply::parse(
            &json!({"access_token": "a", "refresh_token": "secret-refresh"}).to_string(),
        );
        app.record_session(&reply);
        let debug = format!("{app:?}");
        assert!(!debug.contains("secret-refresh"));
    }
}
