use std::str::FromStr as _;

use statusprobe_cli::{
    Verifier,
    verifier::{CORS_CHECK, CREATE_CHECK, LIST_CHECK, PERSISTENCE_CHECK, ROOT_CHECK},
};
use statusprobe_e2e_tests::{FixtureOptions, spawn_fixture, verifier_config};
use statusprobe_types::general::ClientName;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_run_all_against_healthy_backend() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &[]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    let summary = verifier.run_all().await;
    info!("Summary:\n{}", summary);

    let names: Vec<_> = summary.checks.iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        [ROOT_CHECK, CREATE_CHECK, LIST_CHECK, CORS_CHECK, PERSISTENCE_CHECK]
    );
    assert!(summary.passed, "{}", summary);
    assert!(summary.checks.iter().all(|c| c.error.is_none()));

    let records = server.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].client_name, "test_client");
    assert!(records[1].client_name.starts_with("persistence_probe_"));
}

#[tokio::test]
#[traced_test]
async fn test_create_then_list_finds_id() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &[]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    for name in ["test_client", "a", "klient s mezerou", "čtvrtý-Ž", "x_42"] {
        let name = ClientName::from_str(name).unwrap();
        let (created, id) = verifier.verify_create_resource(&name).await;
        assert!(created.passed, "{}", created);
        let id = id.unwrap();

        let observed = created.observed.unwrap();
        let body: serde_json::Value = serde_json::from_str(&observed.body).unwrap();
        assert_eq!(body["client_name"], name.as_ref());
        assert_eq!(body["id"], id.as_str());

        let listed = verifier.verify_list_resources(Some(&id)).await;
        assert!(listed.passed, "{}", listed);
    }
}

#[tokio::test]
#[traced_test]
async fn test_list_unknown_id_fails() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &[]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    let listed = verifier.verify_list_resources(None).await;
    assert!(listed.passed);

    let listed = verifier.verify_list_resources(Some("no-such-id")).await;
    assert!(!listed.passed);
    assert_eq!(
        listed.error.as_deref(),
        Some("Could not find status check with id no-such-id in response")
    );
}

#[tokio::test]
#[traced_test]
async fn test_root_is_idempotent() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &[]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    let first = verifier.verify_root().await;
    let second = verifier.verify_root().await;
    assert!(first.passed && second.passed);
    assert_eq!(
        first.observed.as_ref().unwrap().body,
        second.observed.as_ref().unwrap().body
    );
    assert_eq!(
        first.observed.unwrap().body,
        r#"{"message":"Hello World"}"#
    );
}

#[tokio::test]
#[traced_test]
async fn test_cors_independent_of_order() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &["--expected-allow-origin", "*"]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    let before = verifier.verify_cors().await;
    let summary = verifier.run_all().await;
    let after = verifier.verify_cors().await;

    assert!(before.passed, "{}", before);
    assert!(after.passed, "{}", after);
    assert_eq!(summary.get(CORS_CHECK).unwrap().passed, before.passed);

    let observed = after.observed.unwrap();
    assert_eq!(observed.method, "OPTIONS");
    assert!(observed.url.ends_with("/api/status"));
    assert_eq!(observed.headers["access-control-allow-origin"], "*");
}

#[tokio::test]
#[traced_test]
async fn test_each_check_hits_backend() {
    let server = spawn_fixture(FixtureOptions::default()).await.unwrap();
    let config = verifier_config(server.base_url(), &[]).unwrap();
    let verifier = Verifier::new(&config).unwrap();

    assert_eq!(server.requests(), 0);
    verifier.run_all().await;
    // root, create, list, two preflights, create + list
    assert_eq!(server.requests(), 7);
    server.stop().await;
}
