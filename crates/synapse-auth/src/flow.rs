//! Device-code flow descriptors and user-facing instructions.

use serde_json::Value;

/// Fallback verification URI when the provider response omits one.
const DEFAULT_VERIFICATION_URI: &str = "https://microsoft.com/devicelogin";

/// A device-authorization flow descriptor returned by the identity provider.
///
/// Every field is optional at the wire level; the raw response is retained
/// so a malformed flow can be reported verbatim. A descriptor without a
/// user code is unusable and makes token acquisition fail before the
/// blocking completion step.
#[derive(Debug, Clone)]
pub struct DeviceCodeFlow {
    /// Short code the user types at the verification URI.
    pub user_code: Option<String>,
    /// Opaque code this process polls the token endpoint with.
    pub device_code: Option<String>,
    /// Where the user completes authentication.
    pub verification_uri: Option<String>,
    /// Provider-composed instruction message, when present.
    pub message: Option<String>,
    /// Suggested polling interval in seconds.
    pub interval: Option<u64>,
    /// Flow lifetime in seconds.
    pub expires_in: Option<u64>,
    raw: Value,
}

impl DeviceCodeFlow {
    /// Build a descriptor from a raw provider response.
    ///
    /// Extraction is lenient: missing fields stay `None`, and numeric
    /// fields sent as strings are still understood. Nothing fails here;
    /// usability is judged by the caller against the fields it needs.
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        Self {
            user_code: str_field(&raw, "user_code"),
            device_code: str_field(&raw, "device_code"),
            verification_uri: str_field(&raw, "verification_uri"),
            message: str_field(&raw, "message"),
            interval: u64_field(&raw, "interval"),
            expires_in: u64_field(&raw, "expires_in"),
            raw,
        }
    }

    /// The raw provider response this descriptor was built from.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Produce the human-readable instructions for this flow.
    ///
    /// Returns `None` when the descriptor lacks a user code. The display
    /// side effect is the caller's; this only assembles the data.
    #[must_use]
    pub fn instructions(&self) -> Option<DeviceCodeInstructions> {
        let user_code = self.user_code.clone()?;
        let verification_uri = self
            .verification_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_VERIFICATION_URI.to_string());
        let message = self.message.clone().unwrap_or_else(|| {
            format!(
                "To sign in, use a web browser to open the page {verification_uri} \
                 and enter the code {user_code} to authenticate."
            )
        });
        Some(DeviceCodeInstructions {
            verification_uri,
            user_code,
            message,
        })
    }
}

/// Human-readable sign-in instructions for a pending device-code flow.
///
/// Carries the data only; displaying it is the caller's side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCodeInstructions {
    /// Where the user completes authentication.
    pub verification_uri: String,
    /// Short code the user types at the verification URI.
    pub user_code: String,
    /// Full instruction message, provider-composed or synthesized.
    pub message: String,
}

impl std::fmt::Display for DeviceCodeInstructions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub(crate) fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn u64_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
