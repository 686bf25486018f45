//! Common test utilities for deployment flow tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use trellis_control::component::{
    DeployRequest, DeployedResult, DeploymentComponent, RemoveRequest, SubmittedProperties,
};
use trellis_control::types::OneOrMany;
use trellis_control::{
    AdapterConfig, DeployError, DeployInputs, DeployResult, DeployedTrigger, FrameworkDeployer,
    MemoryStore, ProjectId, StateStore,
};

/// Deployment component that behaves like the platform: every `Auto`
/// binding receives a freshly minted hostname, everything else is echoed.
///
/// Submitted properties are recorded for inspection.
#[derive(Debug, Default)]
pub struct FakePlatform {
    minted: AtomicU32,
    fail: AtomicBool,
    pub deployed: Mutex<Vec<SubmittedProperties>>,
    pub removed: Mutex<Vec<SubmittedProperties>>,
}

impl FakePlatform {
    /// Make every following call fail.
    pub fn fail_from_now(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Properties of the most recent deploy.
    pub fn last_deployed(&self) -> SubmittedProperties {
        self.deployed
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("nothing deployed")
    }

    /// Number of hostnames minted so far.
    pub fn minted(&self) -> u32 {
        self.minted.load(Ordering::SeqCst)
    }

    fn mint(&self) -> String {
        let n = self.minted.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{n}-auto.cn-hangzhou.test.functioncompute.com")
    }

    fn check(&self) -> DeployResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeployError::component("platform unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl DeploymentComponent for FakePlatform {
    async fn deploy(&self, request: DeployRequest) -> DeployResult<DeployedResult> {
        self.check()?;
        let properties = request.properties;

        let triggers = properties
            .function
            .triggers
            .iter()
            .map(|trigger| {
                let domains: Vec<String> = trigger
                    .parameters
                    .domains
                    .iter()
                    .map(|binding| {
                        if binding.is_sentinel() {
                            self.mint()
                        } else {
                            binding.domain.clone()
                        }
                    })
                    .collect();
                DeployedTrigger {
                    name: trigger.name.clone(),
                    trigger_type: trigger.trigger_type.to_string(),
                    domains: (!domains.is_empty()).then(|| OneOrMany::collapse(domains)),
                }
            })
            .collect();

        let result = DeployedResult {
            service: json!({ "Name": properties.service.name }),
            function: json!({ "Name": properties.function.descriptor.name }),
            triggers,
        };
        self.deployed.lock().unwrap().push(properties);
        Ok(result)
    }

    async fn remove(&self, request: RemoveRequest) -> DeployResult<()> {
        self.check()?;
        self.removed.lock().unwrap().push(request.properties);
        Ok(())
    }
}

/// Deployer wired to a fake platform and an in-memory store.
pub struct TestDeployer {
    pub deployer: FrameworkDeployer,
    pub platform: Arc<FakePlatform>,
    pub store: Arc<MemoryStore>,
}

impl TestDeployer {
    pub fn new() -> Self {
        let platform = Arc::new(FakePlatform::default());
        let store = Arc::new(MemoryStore::new());
        let deployer =
            FrameworkDeployer::new(store.clone(), platform.clone(), AdapterConfig::default());

        Self {
            deployer,
            platform,
            store,
        }
    }

    /// Recorded state of the `blog` project.
    pub async fn state(&self) -> Option<trellis_control::DeploymentState> {
        self.store.load(&ProjectId::new("blog")).await.unwrap()
    }
}

/// Inputs for the `blog` project, with `properties` as the `Properties`
/// table.
pub fn inputs(code_uri: &std::path::Path, properties: serde_json::Value) -> DeployInputs {
    let mut properties = properties;
    properties["CodeUri"] = json!(code_uri.to_string_lossy());
    serde_json::from_value(json!({
        "Project": { "ProjectName": "blog" },
        "Properties": properties
    }))
    .unwrap()
}
