//! End-to-end deploy and remove flows against a fake platform.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{inputs, TestDeployer};
use serde_json::json;
use tempfile::TempDir;
use trellis_control::types::OneOrMany;
use trellis_control::{ConfigConflict, DeployError, ReportShape};

const FIRST: &str = "1-auto.cn-hangzhou.test.functioncompute.com";
const SECOND: &str = "2-auto.cn-hangzhou.test.functioncompute.com";

fn submitted_domains(harness: &TestDeployer) -> Vec<String> {
    harness
        .platform
        .last_deployed()
        .function
        .triggers
        .iter()
        .flat_map(|t| t.domain_names().map(ToOwned::to_owned))
        .collect()
}

fn auto_trigger(name: &str, domain: &str) -> serde_json::Value {
    json!({
        "Name": name,
        "Type": "HTTP",
        "Parameters": {
            "AuthType": "ANONYMOUS",
            "Methods": ["GET"],
            "Domains": [{ "Domain": domain, "Routes": [{ "Path": "/*", "Qualifier": "LATEST" }] }]
        }
    })
}

#[tokio::test]
async fn first_deploy_records_assigned_domain() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    let report = harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();

    assert_eq!(submitted_domains(&harness), vec!["Auto".to_owned()]);
    assert_eq!(report.region, "cn-hangzhou");
    assert_eq!(report.service["Name"], "s-service");
    assert_eq!(
        report.shape,
        ReportShape::Domains(OneOrMany::One(FIRST.to_owned()))
    );

    let state = harness.state().await.unwrap();
    assert_eq!(state.auto_domain.as_deref(), Some(FIRST));
    assert_eq!(state.function.triggers[0].name, "http");
}

#[tokio::test]
async fn redeploy_keeps_the_same_domain() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();
    let first_name = harness.state().await.unwrap().function.descriptor.name;

    let report = harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();

    assert_eq!(submitted_domains(&harness), vec![FIRST.to_owned()]);
    assert_eq!(harness.platform.minted(), 1);
    assert_eq!(
        report.shape,
        ReportShape::Domains(OneOrMany::One(FIRST.to_owned()))
    );

    // The generated function name is carried over from state.
    let state = harness.state().await.unwrap();
    assert_eq!(state.function.descriptor.name, first_name);
    assert_eq!(state.auto_domain.as_deref(), Some(FIRST));
}

#[tokio::test]
async fn declared_triggers_reuse_recorded_domain() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();
    let properties = json!({
        "Detail": {
            "Service": { "Name": "blog" },
            "Function": { "Name": "render", "Triggers": [auto_trigger("web", "auto")] }
        }
    });

    harness
        .deployer
        .deploy(inputs(code.path(), properties.clone()))
        .await
        .unwrap();
    let report = harness
        .deployer
        .deploy(inputs(code.path(), properties))
        .await
        .unwrap();

    assert_eq!(submitted_domains(&harness), vec![FIRST.to_owned()]);
    match report.shape {
        ReportShape::Triggers(triggers) => {
            assert_eq!(triggers["web"].protocols, "HTTP");
            assert_eq!(triggers["web"].domains, vec![FIRST.to_owned()]);
        }
        other => panic!("unexpected report shape: {other:?}"),
    }
}

#[tokio::test]
async fn renaming_the_function_reissues_the_domain() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({ "Detail": { "Function": { "Name": "render", "Triggers": [auto_trigger("web", "Auto")] } } }),
        ))
        .await
        .unwrap();
    assert_eq!(
        harness.state().await.unwrap().auto_domain.as_deref(),
        Some(FIRST)
    );

    harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({ "Detail": { "Function": { "Name": "render-v2", "Triggers": [auto_trigger("web", FIRST)] } } }),
        ))
        .await
        .unwrap();

    assert_eq!(submitted_domains(&harness), vec!["Auto".to_owned()]);
    let state = harness.state().await.unwrap();
    assert_eq!(state.auto_domain.as_deref(), Some(SECOND));
    assert_eq!(state.function.descriptor.name.as_deref(), Some("render-v2"));
}

#[tokio::test]
async fn second_automatic_binding_is_rejected_before_submission() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();
    let before = harness.state().await;

    let err = harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({ "Detail": { "Function": { "Triggers": [
                auto_trigger("a", "Auto"),
                auto_trigger("b", "Auto")
            ] } } }),
        ))
        .await
        .unwrap_err();

    assert_eq!(
        err.as_conflict(),
        Some(&ConfigConflict::MultipleAutoDomains {
            trigger: "b".to_owned()
        })
    );
    assert_eq!(
        err.to_string(),
        "config conflict: Each function can only get one assigned domain name"
    );
    assert_eq!(harness.platform.deployed.lock().unwrap().len(), 1);
    assert_eq!(harness.state().await, before);
}

#[tokio::test]
async fn domains_and_triggers_together_are_rejected() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    let err = harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({
                "Domains": [{ "Domain": "example.com" }],
                "Detail": { "Function": { "Triggers": [auto_trigger("web", "Auto")] } }
            }),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.as_conflict(), Some(&ConfigConflict::DomainsWithTriggers));
    assert!(harness.platform.deployed.lock().unwrap().is_empty());
    assert!(harness.state().await.is_none());
}

#[tokio::test]
async fn component_failure_keeps_previous_state() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();
    let before = harness.state().await;

    harness.platform.fail_from_now();
    let err = harness
        .deployer
        .deploy(inputs(code.path(), json!({ "Region": "cn-beijing" })))
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Component(ref msg) if msg == "platform unavailable"));
    assert_eq!(harness.state().await, before);
}

#[tokio::test]
async fn custom_domains_record_no_automatic_domain() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    let report = harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({ "Domains": [
                { "Domain": "blog.example.com" },
                { "Domain": "www.example.com" }
            ] }),
        ))
        .await
        .unwrap();

    assert_eq!(
        report.shape,
        ReportShape::Domains(OneOrMany::Many(vec![
            "blog.example.com".to_owned(),
            "www.example.com".to_owned()
        ]))
    );
    assert_eq!(harness.state().await.unwrap().auto_domain, None);
}

#[tokio::test]
async fn deploy_writes_bootstrap_into_code_directory() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();
    let mut inputs = inputs(code.path(), json!({}));
    inputs.bootstrap.content = Some("#!/usr/bin/env bash\nnode server.js".to_owned());

    harness.deployer.deploy(inputs).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(code.path().join("bootstrap")).unwrap(),
        "#!/usr/bin/env bash\nnode server.js"
    );
}

#[tokio::test]
async fn remove_submits_recorded_function_and_clears_state() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(
            code.path(),
            json!({ "Region": "cn-shanghai", "Detail": { "Function": { "Name": "render" } } }),
        ))
        .await
        .unwrap();

    harness
        .deployer
        .remove(inputs(code.path(), json!({})))
        .await
        .unwrap();

    let removed = harness.platform.removed.lock().unwrap().clone();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].region, "cn-shanghai");
    assert_eq!(removed[0].function.descriptor.name.as_deref(), Some("render"));
    assert_eq!(
        removed[0].function.triggers[0].domain_names().collect::<Vec<_>>(),
        vec!["Auto"]
    );
    assert!(harness.state().await.is_none());
}

#[tokio::test]
async fn failed_remove_keeps_state() {
    let code = TempDir::new().unwrap();
    let harness = TestDeployer::new();

    harness
        .deployer
        .deploy(inputs(code.path(), json!({})))
        .await
        .unwrap();

    harness.platform.fail_from_now();
    assert!(harness
        .deployer
        .remove(inputs(code.path(), json!({})))
        .await
        .is_err());
    assert!(harness.state().await.is_some());
}
