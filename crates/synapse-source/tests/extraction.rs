//! Extraction orchestration contract tests.
//!
//! Drives the load/persist operations and the end-to-end job against
//! in-memory doubles.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use synapse_auth::{AccessToken, Account, AuthError, DeviceCodeAuth};
use synapse_source::{
    ExtractionJob, SaveMode, Selection, SourceError, load_query, load_table, persist,
};
use synapse_testing::{FailingEngine, MemoryEngine, MemorySink, ScriptedIdentityClient, fixtures};

fn rows() -> synapse_testing::Rows {
    vec![
        vec!["1".to_string(), "Alice".to_string()],
        vec!["2".to_string(), "Bob".to_string()],
    ]
}

// ============================================================================
// Load operations
// ============================================================================

#[tokio::test]
async fn load_table_builds_a_table_descriptor() {
    let engine = MemoryEngine::with_rows(rows());
    let token = AccessToken::new("token-secret");

    let dataset = load_table(&engine, &fixtures::warehouse_config(), "dbo.TableName", &token)
        .await
        .unwrap();

    assert_eq!(dataset, rows());
    let reads = engine.reads();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].database(), "demo");
    assert_eq!(reads[0].table(), Some("dbo.TableName"));
    assert_eq!(reads[0].query(), None);
}

#[tokio::test]
async fn load_query_builds_a_query_descriptor() {
    let engine = MemoryEngine::with_rows(rows());
    let token = AccessToken::new("token-secret");
    let sql = "SELECT * FROM dbo.TableName WHERE Id = 1";

    load_query(&engine, &fixtures::warehouse_config(), sql, &token)
        .await
        .unwrap();

    let reads = engine.reads();
    assert_eq!(reads[0].query(), Some(sql));
    assert_eq!(reads[0].table(), None);
}

#[tokio::test]
async fn persist_forwards_destination_and_mode() {
    let sink = MemorySink::new();

    persist(&sink, rows(), "analytics.table_name", SaveMode::Append)
        .await
        .unwrap();

    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "analytics.table_name");
    assert_eq!(writes[0].1, SaveMode::Append);
    assert_eq!(writes[0].2, rows());
}

// ============================================================================
// End-to-end job
// ============================================================================

#[tokio::test]
async fn job_runs_read_then_write_with_the_dataset_unmodified() {
    let client = ScriptedIdentityClient::new()
        .with_account(Account::new("user@contoso.com"))
        .with_silent_result(fixtures::issued("silent-token"));
    let auth = DeviceCodeAuth::new(client, fixtures::identity_config());
    let engine = MemoryEngine::with_rows(rows());
    let sink = MemorySink::new();

    let job = ExtractionJob::new(
        fixtures::warehouse_config(),
        Selection::table("dbo.TableName"),
        "analytics.table_name",
    );
    job.run(&auth, &engine, &sink, |_| {}).await.unwrap();

    assert_eq!(engine.read_count(), 1);
    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "analytics.table_name");
    assert_eq!(writes[0].1, SaveMode::Overwrite);
    assert_eq!(writes[0].2, rows(), "dataset flows through unmodified");

    // The token landed in the descriptor as a credential option.
    let reads = engine.reads();
    let options = reads[0].options();
    assert!(options.iter().any(|(k, v)| *k == "accessToken" && v == "silent-token"));
}

#[tokio::test]
async fn job_surfaces_device_instructions_when_interactive() {
    let client = ScriptedIdentityClient::new()
        .with_flow(fixtures::device_flow("ABC123"))
        .with_completion(fixtures::issued("interactive-token"));
    let auth = DeviceCodeAuth::new(client, fixtures::identity_config());
    let engine = MemoryEngine::with_rows(rows());
    let sink = MemorySink::new();

    let job = ExtractionJob::new(
        fixtures::warehouse_config(),
        Selection::query("SELECT 1"),
        "analytics.single_row",
    )
    .mode(SaveMode::Append);

    let mut messages = Vec::new();
    job.run(&auth, &engine, &sink, |instructions| {
        messages.push(instructions.message.clone());
    })
    .await
    .unwrap();

    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("ABC123"));
    assert_eq!(sink.writes()[0].1, SaveMode::Append);
}

// ============================================================================
// Failure propagation
// ============================================================================

#[tokio::test]
async fn engine_failure_propagates_and_skips_the_sink() {
    let client = ScriptedIdentityClient::new()
        .with_account(Account::new("user@contoso.com"))
        .with_silent_result(fixtures::issued("token"));
    let auth = DeviceCodeAuth::new(client, fixtures::identity_config());
    let engine = FailingEngine::new("spark job aborted: stage 3 failed");
    let sink = MemorySink::new();

    let job = ExtractionJob::new(
        fixtures::warehouse_config(),
        Selection::table("dbo.TableName"),
        "analytics.table_name",
    );
    let err = job.run(&auth, &engine, &sink, |_| {}).await.unwrap_err();

    match err {
        SourceError::Connector(inner) => {
            assert_eq!(inner.to_string(), "spark job aborted: stage 3 failed");
        }
        other => panic!("expected Connector, got {other:?}"),
    }
    assert_eq!(sink.write_count(), 0, "persist must not run after a failed load");
}

#[tokio::test]
async fn token_failure_aborts_before_the_engine_runs() {
    let client = ScriptedIdentityClient::new()
        .with_flow(fixtures::device_flow("ABC123"))
        .with_completion(fixtures::rejected("expired_token", "flow timed out", "abc"));
    let auth = DeviceCodeAuth::new(client, fixtures::identity_config());
    let engine = MemoryEngine::with_rows(rows());
    let sink = MemorySink::new();

    let job = ExtractionJob::new(
        fixtures::warehouse_config(),
        Selection::table("dbo.TableName"),
        "analytics.table_name",
    );
    let err = job.run(&auth, &engine, &sink, |_| {}).await.unwrap_err();

    match err {
        SourceError::Auth(AuthError::TokenAcquisition { error, .. }) => {
            assert_eq!(error, "expired_token");
        }
        other => panic!("expected Auth, got {other:?}"),
    }
    assert_eq!(engine.read_count(), 0);
    assert_eq!(sink.write_count(), 0);
}
