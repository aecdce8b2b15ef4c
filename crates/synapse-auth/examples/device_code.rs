//! Device-code sign-in example.
//!
//! Walks through interactive token acquisition against a real tenant.
//!
//! # Running
//!
//! ```bash
//! # App registration with public client flows enabled
//! export AZURE_CLIENT_ID=00000000-0000-0000-0000-000000000000
//! export AZURE_TENANT_ID=contoso.onmicrosoft.com
//!
//! cargo run --example device_code
//! ```

use std::time::Duration;

use synapse_auth::{DeviceCodeAuth, IdentityConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let client_id = std::env::var("AZURE_CLIENT_ID").ok();
    let tenant_id = std::env::var("AZURE_TENANT_ID").ok();

    println!("=== Device Code Sign-In Example ===\n");

    let (Some(client_id), Some(tenant_id)) = (client_id, tenant_id) else {
        println!("Note: AZURE_CLIENT_ID / AZURE_TENANT_ID not set.");
        println!("This example will demonstrate the acquisition pattern.\n");
        demonstrate_acquisition_pattern();
        return Ok(());
    };

    let config = IdentityConfig::for_azure_sql(client_id, tenant_id);
    println!("Authority: {}", config.authority_url());
    println!("Scope:     {}\n", config.scope);

    let auth = DeviceCodeAuth::public(config)?;

    // First call walks the device-code flow; a second call in the same
    // process reuses the cached account silently.
    let token = auth
        .acquire_token(|instructions| println!("{instructions}"))
        .await?;

    println!("\nSigned in.");
    println!(
        "Token expiring within 5 minutes: {}",
        token.is_expiring_soon(Duration::from_secs(300))
    );

    Ok(())
}

fn demonstrate_acquisition_pattern() {
    println!("Acquisition order:\n");
    println!("1. Cached account lookup:");
    println!("   - zero accounts: go interactive");
    println!("   - account found: try a silent refresh first");
    println!();
    println!("2. Device-code flow (interactive fallback):");
    println!("   - instructions are handed to your callback, not printed");
    println!("   - the call blocks, polling until sign-in completes or expires");
    println!();
    println!("3. Failure surface:");
    println!("   - DeviceFlowInit: flow rejected, raw response attached");
    println!("   - TokenAcquisition: error, description, and correlation id");
    println!("     propagated for support escalation");
}
