//! Fixture constructors shared across contract tests.

use serde_json::json;

use synapse_auth::{AccessToken, DeviceCodeFlow, IdentityConfig, TokenRejection, TokenResult};
use synapse_source::WarehouseConfig;

/// A complete identity configuration for the Azure SQL scope.
#[must_use]
pub fn identity_config() -> IdentityConfig {
    IdentityConfig::for_azure_sql("test-client-id", "test-tenant-id")
}

/// A warehouse configuration pointing at the demo database.
#[must_use]
pub fn warehouse_config() -> WarehouseConfig {
    WarehouseConfig::new("example-synapse.sql.azuresynapse.net", "demo")
}

/// An issued token result.
#[must_use]
pub fn issued(secret: &str) -> TokenResult {
    TokenResult::Issued(AccessToken::new(secret))
}

/// A rejected token result carrying full diagnostics.
#[must_use]
pub fn rejected(error: &str, description: &str, correlation_id: &str) -> TokenResult {
    TokenResult::Rejected(TokenRejection {
        error: error.to_string(),
        error_description: Some(description.to_string()),
        correlation_id: Some(correlation_id.to_string()),
    })
}

/// A well-formed flow descriptor for the given user code.
#[must_use]
pub fn device_flow(user_code: &str) -> DeviceCodeFlow {
    DeviceCodeFlow::from_raw(json!({
        "user_code": user_code,
        "device_code": "test-device-code",
        "verification_uri": "https://microsoft.com/devicelogin",
        "message": format!(
            "To sign in, use a web browser to open the page \
             https://microsoft.com/devicelogin and enter the code {user_code} to authenticate."
        ),
        "interval": 5,
        "expires_in": 900,
    }))
}

/// A flow descriptor the provider rejected (no user code).
#[must_use]
pub fn device_flow_without_user_code() -> DeviceCodeFlow {
    DeviceCodeFlow::from_raw(json!({
        "error": "invalid_client",
        "error_description": "public client flows are not enabled",
    }))
}
