//! End-to-end extraction walkthrough.
//!
//! Wires the extraction job to the in-memory doubles from `synapse-testing`
//! so the full sequence (token, read, persist) runs without a warehouse.
//!
//! # Running
//!
//! ```bash
//! cargo run --example extract_table
//! ```

use synapse_auth::DeviceCodeAuth;
use synapse_source::{ExtractionJob, SaveMode, Selection};
use synapse_testing::{MemoryEngine, MemorySink, ScriptedIdentityClient, fixtures};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Synapse Extraction Example ===\n");

    // A scripted identity client stands in for the provider; swap in
    // DeviceCodeAuth::public(config) to run against a real tenant.
    let client = ScriptedIdentityClient::new()
        .with_flow(fixtures::device_flow("ABC123"))
        .with_completion(fixtures::issued("example-token"));
    let auth = DeviceCodeAuth::new(client, fixtures::identity_config());

    let engine = MemoryEngine::with_rows(vec![
        vec!["1".into(), "Alice".into()],
        vec!["2".into(), "Bob".into()],
    ]);
    let sink = MemorySink::new();

    let job = ExtractionJob::new(
        fixtures::warehouse_config(),
        Selection::table("dbo.TableName"),
        "analytics.table_name",
    )
    .mode(SaveMode::Overwrite);

    job.run(&auth, &engine, &sink, |instructions| {
        println!("{instructions}\n");
    })
    .await?;

    // The option set the external connector would receive.
    println!("Connector options:");
    for (key, value) in engine.reads()[0].options() {
        let shown = if key == "accessToken" { "[REDACTED]" } else { value.as_str() };
        println!("  {key} = {shown}");
    }

    let writes = sink.writes();
    println!(
        "\nPersisted {} rows to {} ({})",
        writes[0].2.len(),
        writes[0].0,
        writes[0].1
    );

    Ok(())
}
