//! Core deployment orchestration logic.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::bootstrap::write_bootstrap;
use crate::classify::{classify, ReportShape};
use crate::component::{
    Credentials, DeployRequest, DeploymentComponent, RemoveRequest, SubmittedProperties,
};
use crate::config::{AdapterConfig, CredentialsConfig, DefaultsConfig};
use crate::domain::AutoDomainMatcher;
use crate::error::DeployResult;
use crate::identity::{identity_changed, DesiredIdentity};
use crate::inputs::DeployInputs;
use crate::merge::{merge, Overrides};
use crate::reconcile::{ReconciliationInput, Reconciler};
use crate::store::StateStore;
use crate::types::{DeploymentState, FunctionSpec};

/// What a deployment would submit, computed without side effects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Plan {
    /// Region, service and function to submit.
    #[serde(flatten)]
    pub properties: SubmittedProperties,
    /// Whether region, service name or function name changed.
    pub identity_changed: bool,
    /// Whether the user declared their own triggers.
    pub user_supplied_triggers: bool,
}

/// Result of a deployment as presented to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployReport {
    /// Region deployed to.
    pub region: String,
    /// Service as reported by the component.
    pub service: Value,
    /// Function as reported by the component.
    pub function: Value,
    /// Either `Domains` or `Triggers`.
    #[serde(flatten)]
    pub shape: ReportShape,
}

/// Orchestrates deploy and remove for a single function.
///
/// State is read once when an operation starts and written once after the
/// component succeeds. Any error before that leaves the recorded state as it
/// was.
pub struct FrameworkDeployer {
    store: Arc<dyn StateStore>,
    component: Arc<dyn DeploymentComponent>,
    matcher: Arc<dyn AutoDomainMatcher>,
    defaults: DefaultsConfig,
    credentials: CredentialsConfig,
}

impl FrameworkDeployer {
    /// Create a new deployer.
    pub fn new(
        store: Arc<dyn StateStore>,
        component: Arc<dyn DeploymentComponent>,
        config: AdapterConfig,
    ) -> Self {
        Self {
            store,
            component,
            matcher: Arc::new(config.domains.matcher()),
            defaults: config.defaults,
            credentials: config.credentials,
        }
    }

    /// Replace the automatic domain matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Arc<dyn AutoDomainMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Compute what a deployment would submit.
    ///
    /// Reads the recorded state but writes nothing.
    pub async fn plan(&self, inputs: &DeployInputs) -> DeployResult<Plan> {
        let previous = self.store.load(&inputs.project.project_name).await?;
        self.build_plan(inputs, previous.as_ref())
    }

    fn build_plan(
        &self,
        inputs: &DeployInputs,
        previous: Option<&DeploymentState>,
    ) -> DeployResult<Plan> {
        let region = inputs
            .region()
            .unwrap_or(self.defaults.region.as_str())
            .to_owned();
        let detail = &inputs.properties.detail;

        let changed = identity_changed(
            DesiredIdentity {
                region: &region,
                function_name: detail.function.descriptor.name.as_deref(),
                service_name: detail.service.name.as_deref(),
            },
            previous,
        );

        let triggers = Reconciler::new(self.matcher.as_ref()).reconcile(ReconciliationInput {
            desired_domains: inputs.properties.domains.clone(),
            desired_triggers: detail.function.triggers.clone(),
            previous_auto_domain: previous.and_then(|state| state.auto_domain.clone()),
            identity_changed: changed,
        })?;

        let descriptors = merge(self.defaults.descriptors(), previous, inputs.overrides());

        debug!(
            region = %region,
            identity_changed = changed,
            triggers = triggers.len(),
            "plan computed"
        );

        Ok(Plan {
            properties: SubmittedProperties {
                region,
                service: descriptors.service,
                function: FunctionSpec {
                    descriptor: descriptors.function,
                    code_uri: inputs.code_uri().to_owned(),
                    triggers,
                },
            },
            identity_changed: changed,
            user_supplied_triggers: inputs.has_user_triggers(),
        })
    }

    /// Deploy the function described by `inputs`.
    ///
    /// This runs the full deployment:
    /// 1. Load the previous state
    /// 2. Merge attributes and reconcile triggers
    /// 3. Write the bootstrap script into the code artifact
    /// 4. Submit to the deployment component
    /// 5. Record the new state, including the automatic domain
    pub async fn deploy(&self, inputs: DeployInputs) -> DeployResult<DeployReport> {
        let project = &inputs.project.project_name;
        info!(project = %project, "starting deployment");

        let previous = self.store.load(project).await?;
        let plan = self.build_plan(&inputs, previous.as_ref())?;

        let outcome = write_bootstrap(
            Path::new(&plan.properties.function.code_uri),
            inputs.bootstrap.content.as_deref(),
            inputs.bootstrap.force,
        )
        .await?;
        debug!(outcome = ?outcome, "bootstrap processed");

        let request = DeployRequest {
            properties: plan.properties.clone(),
            state: previous,
            credentials: Credentials::from_config(&self.credentials),
            project: inputs.project.clone(),
        };
        let deployed = self.component.deploy(request).await?;

        let classification = classify(
            &deployed.triggers,
            plan.user_supplied_triggers,
            self.matcher.as_ref(),
        );

        let region = plan.properties.region.clone();
        let state = DeploymentState {
            region: plan.properties.region,
            service: plan.properties.service,
            function: plan.properties.function,
            auto_domain: classification.auto_domain,
        };
        self.store.save(project, &state).await?;

        info!(
            project = %project,
            region = %region,
            auto_domain = ?state.auto_domain,
            "deployment completed"
        );

        Ok(DeployReport {
            region,
            service: deployed.service,
            function: deployed.function,
            shape: classification.shape,
        })
    }

    /// Remove the deployed function and clear the recorded state.
    pub async fn remove(&self, inputs: DeployInputs) -> DeployResult<()> {
        let project = &inputs.project.project_name;
        info!(project = %project, "removing deployment");

        let previous = self.store.load(project).await?;
        let detail = &inputs.properties.detail;

        let descriptors = merge(
            self.defaults.descriptors(),
            previous.as_ref(),
            Overrides {
                service: detail.service.clone(),
                function: detail.function.descriptor.clone(),
                ..Overrides::default()
            },
        );

        let region = inputs
            .region()
            .map(ToOwned::to_owned)
            .or_else(|| previous.as_ref().map(|state| state.region.clone()))
            .unwrap_or_else(|| self.defaults.region.clone());

        let code_uri = previous
            .as_ref()
            .map(|state| state.function.code_uri.clone())
            .filter(|code_uri| !code_uri.is_empty())
            .unwrap_or_else(|| inputs.code_uri().to_owned());
        let triggers = detail
            .function
            .triggers
            .clone()
            .or_else(|| previous.as_ref().map(|state| state.function.triggers.clone()))
            .unwrap_or_default();

        let request = RemoveRequest {
            properties: SubmittedProperties {
                region,
                service: descriptors.service,
                function: FunctionSpec {
                    descriptor: descriptors.function,
                    code_uri,
                    triggers,
                },
            },
            state: previous,
            credentials: Credentials::from_config(&self.credentials),
            project: inputs.project.clone(),
        };
        self.component.remove(request).await?;

        self.store.clear(project).await?;
        info!(project = %project, "deployment removed");

        Ok(())
    }
}

impl std::fmt::Debug for FrameworkDeployer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkDeployer")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
