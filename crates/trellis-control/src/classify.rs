//! Shaping the deployment component's result into a report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::AutoDomainMatcher;
use crate::types::OneOrMany;

/// A trigger as reported back by the deployment component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeployedTrigger {
    /// Trigger name.
    pub name: String,
    /// Trigger type as reported.
    #[serde(rename = "Type")]
    pub trigger_type: String,
    /// Resolved hostnames, either a single string or a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<OneOrMany<String>>,
}

impl DeployedTrigger {
    /// Resolved hostnames as a list.
    #[must_use]
    pub fn resolved_domains(&self) -> Vec<String> {
        self.domains
            .clone()
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
    }
}

/// Per-trigger entry of a trigger-centric report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerReport {
    /// Trigger type.
    pub protocols: String,
    /// Resolved hostnames.
    pub domains: Vec<String>,
}

/// Output shape of a deployment report.
///
/// Users who declared their own triggers get a mapping keyed by trigger
/// name; everyone else gets the hostnames, collapsed to a single string when
/// there is exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReportShape {
    /// Trigger name → protocol and hostnames.
    Triggers(BTreeMap<String, TriggerReport>),
    /// All hostnames across all triggers.
    Domains(OneOrMany<String>),
}

/// Result of classifying deployed triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// First platform-generated hostname, to be recorded for next time.
    pub auto_domain: Option<String>,
    /// Report shape.
    pub shape: ReportShape,
}

/// Classify the triggers returned by a deployment.
#[must_use]
pub fn classify(
    deployed: &[DeployedTrigger],
    user_supplied_triggers: bool,
    matcher: &dyn AutoDomainMatcher,
) -> Classification {
    let resolved: Vec<(&DeployedTrigger, Vec<String>)> = deployed
        .iter()
        .map(|trigger| (trigger, trigger.resolved_domains()))
        .collect();

    let auto_domain = resolved
        .iter()
        .flat_map(|(_, domains)| domains.iter())
        .find(|domain| matcher.is_auto_domain(domain))
        .cloned();

    let shape = if user_supplied_triggers {
        ReportShape::Triggers(
            resolved
                .into_iter()
                .map(|(trigger, domains)| {
                    (
                        trigger.name.clone(),
                        TriggerReport {
                            protocols: trigger.trigger_type.clone(),
                            domains,
                        },
                    )
                })
                .collect(),
        )
    } else {
        ReportShape::Domains(OneOrMany::collapse(
            resolved
                .into_iter()
                .flat_map(|(_, domains)| domains)
                .collect(),
        ))
    };

    Classification { auto_domain, shape }
}
