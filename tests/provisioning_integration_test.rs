use anyhow::Result;
use httpmock::prelude::*;
use model_provisioner::{
    Manifest, ModelSpec, OllamaClient, Outcome, ProvisionConfig, ProvisionEngine,
    ProvisionError, ReadinessGate, ServiceEndpoint, SkipReason,
};
use std::time::Duration;
use tempfile::TempDir;

fn config_for(server: &MockServer) -> ProvisionConfig {
    ProvisionConfig {
        endpoint: ServiceEndpoint {
            base_url: server.base_url(),
        },
        poll_interval: Duration::from_millis(5),
        max_attempts: 3,
        ..ProvisionConfig::default()
    }
}

#[tokio::test]
async fn test_end_to_end_against_mock_service() -> Result<()> {
    let dir = TempDir::new()?;
    let a_path = dir.path().join("a.Modelfile");
    let c_path = dir.path().join("c.Modelfile");
    std::fs::write(&a_path, "FROM gemma3n:e2b\n")?;
    std::fs::write(&c_path, "FROM gemma3n:e4b\n")?;
    let missing = dir.path().join("missing.Modelfile");

    let server = MockServer::start();
    let tags_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200).json_body(serde_json::json!({ "models": [] }));
    });
    let show_a = server.mock(|when, then| {
        when.method(POST)
            .path("/api/show")
            .json_body(serde_json::json!({ "model": "a" }));
        then.status(200).json_body(serde_json::json!({}));
    });
    let show_c = server.mock(|when, then| {
        when.method(POST)
            .path("/api/show")
            .json_body(serde_json::json!({ "model": "c" }));
        then.status(404);
    });
    let create_c = server.mock(|when, then| {
        when.method(POST)
            .path("/api/create")
            .json_body_partial(r#"{ "model": "c" }"#);
        then.status(200)
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let config = config_for(&server);
    let manifest = Manifest::new(vec![
        ModelSpec::new("a", a_path.to_string_lossy()),
        ModelSpec::new("b", missing.to_string_lossy()),
        ModelSpec::new("c", c_path.to_string_lossy()),
    ]);
    let engine = ProvisionEngine::new(
        OllamaClient::new(&config)?,
        ReadinessGate::from_config(&config),
        manifest,
    );

    let report = engine.run().await?;

    assert_eq!(
        report.outcomes(),
        vec![
            &Outcome::Skipped(SkipReason::AlreadyExists),
            &Outcome::Skipped(SkipReason::MissingDefinition),
            &Outcome::Created,
        ]
    );
    tags_mock.assert();
    show_a.assert();
    show_c.assert();
    create_c.assert();
    Ok(())
}

#[tokio::test]
async fn test_failed_create_does_not_stop_pass() -> Result<()> {
    let dir = TempDir::new()?;
    let mut specs = Vec::new();
    for name in ["first", "second"] {
        let path = dir.path().join(format!("{}.Modelfile", name));
        std::fs::write(&path, "FROM gemma3n\n")?;
        specs.push(ModelSpec::new(name, path.to_string_lossy()));
    }

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/show");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/create")
            .json_body_partial(r#"{ "model": "first" }"#);
        then.status(500).body("out of disk space");
    });
    let create_second = server.mock(|when, then| {
        when.method(POST)
            .path("/api/create")
            .json_body_partial(r#"{ "model": "second" }"#);
        then.status(200)
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let config = config_for(&server);
    let engine = ProvisionEngine::new(
        OllamaClient::new(&config)?,
        ReadinessGate::from_config(&config),
        Manifest::new(specs),
    );

    let report = engine.run().await?;

    assert!(matches!(
        report.outcomes()[0],
        Outcome::CreateFailed(detail) if detail.contains("out of disk space")
    ));
    assert_eq!(report.outcomes()[1], &Outcome::Created);
    create_second.assert();
    Ok(())
}

#[tokio::test]
async fn test_unready_service_times_out_without_provisioning() -> Result<()> {
    let server = MockServer::start();
    let tags_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(503);
    });
    let show_mock = server.mock(|when, then| {
        when.method(POST).path("/api/show");
        then.status(404);
    });

    let config = config_for(&server);
    let engine = ProvisionEngine::new(
        OllamaClient::new(&config)?,
        ReadinessGate::from_config(&config),
        Manifest::new(vec![ModelSpec::new("a", "/models/a.Modelfile")]),
    );

    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, ProvisionError::HostUnavailable { attempts: 3 }));
    assert_eq!(err.exit_code(), 1);
    tags_mock.assert_hits(3);
    show_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_shutdown_interrupts_slow_create() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("a.Modelfile");
    std::fs::write(&path, "FROM gemma3n:e4b\n")?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/tags");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/show");
        then.status(404);
    });
    let create_mock = server.mock(|when, then| {
        when.method(POST).path("/api/create");
        then.status(200)
            .delay(Duration::from_secs(8))
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let config = config_for(&server);
    let engine = ProvisionEngine::new(
        OllamaClient::new(&config)?,
        ReadinessGate::from_config(&config),
        Manifest::new(vec![ModelSpec::new("a", path.to_string_lossy())]),
    );

    let started = std::time::Instant::now();
    let err = engine
        .run_until(tokio::time::sleep(Duration::from_millis(500)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProvisionError::Cancelled));
    assert_eq!(err.exit_code(), 130);
    assert!(started.elapsed() < Duration::from_secs(5));
    create_mock.assert_hits(1);
    Ok(())
}
