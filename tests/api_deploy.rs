//! Wizard driven against the HTTP client and a mock provisioning API

mod common;

use common::walk_to_review;
use mockito::Matcher;
use relay_ctl::config::types::DeploymentSettings;
use relay_ctl::platform::api::{DeploymentStatus, PlatformApiClient};
use relay_ctl::wizard::WizardController;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_deploy_through_http_client() {
    let mut server = mockito::Server::new_async().await;
    let estimate = server
        .mock("POST", "/api/relays/deployments/estimate")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"estimated_cost_monthly":85.5,"estimated_deployment_time_minutes":15,
                "resource_count":12}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let start = server
        .mock("POST", "/api/relays/deployments")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "provider": "aws",
            "region": "us-east-1",
            "relay_name": "relay-aws-us-east-1"
        })))
        .with_status(200)
        .with_body(r#"{"deployment_id":"d1"}"#)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/api/relays/deployments/d1")
        .with_status(200)
        .with_body(
            r#"{"deployment_id":"d1","status":"completed","progress_percent":100,
                "relay_id":"relay-42"}"#,
        )
        .create_async()
        .await;

    let client = Arc::new(PlatformApiClient::with_url(server.url()).unwrap());
    let settings = DeploymentSettings {
        poll_interval_secs: 1,
        ..Default::default()
    };
    let mut wizard = WizardController::new(client, &settings);
    walk_to_review(&mut wizard);

    let quote = wizard.request_estimate().await.unwrap();
    assert_eq!(quote.resource_count, 12);
    wizard.open_confirmation().unwrap();
    assert_eq!(wizard.confirm_deployment().await.unwrap(), "d1");

    let finished = tokio::time::timeout(Duration::from_secs(10), wizard.wait_for_deployment())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, DeploymentStatus::Completed);
    assert_eq!(finished.relay_id.as_deref(), Some("relay-42"));

    estimate.assert_async().await;
    start.assert_async().await;
}

#[tokio::test]
async fn test_backend_rejection_keeps_review_open() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/relays/deployments/estimate")
        .with_status(200)
        .with_body(
            r#"{"estimated_cost_monthly":410.0,"estimated_deployment_time_minutes":25,
                "resource_count":30}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/api/relays/deployments")
        .with_status(403)
        .with_body(r#"{"detail":"Organization has no relay entitlement"}"#)
        .create_async()
        .await;

    let client = Arc::new(PlatformApiClient::with_url(server.url()).unwrap());
    let mut wizard = WizardController::new(client, &DeploymentSettings::default());
    walk_to_review(&mut wizard);
    wizard.request_estimate().await.unwrap();

    let gate = wizard.open_confirmation().unwrap();
    assert!(gate.cost_warning().is_some());

    let err = wizard.confirm_deployment().await.unwrap_err();
    assert!(err.to_string().contains("relay entitlement"));
    assert!(wizard.session().deployment_id().is_none());
    assert!(wizard.deployment().is_none());
}
