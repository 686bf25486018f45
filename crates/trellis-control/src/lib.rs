//! Trellis deployment adapter
//!
//! This crate sits between a user's project configuration and a deployment
//! component that provisions serverless functions. It decides which triggers
//! and domains to submit, keeps an automatically assigned domain stable
//! across redeployments, and shapes the component's result into a report.
//!
//! # Architecture
//!
//! A deployment flows through these stages:
//!
//! - **Merge**: built-in defaults, the previously recorded deployment and the
//!   user's overrides are layered into the effective service and function
//! - **Identity check**: a change of region, service name or function name
//!   means any previously issued automatic domain no longer applies
//! - **Reconcile**: declared domains or triggers become the trigger list to
//!   submit, with at most one automatic domain per function
//! - **Deploy**: the [`DeploymentComponent`] does the provisioning
//! - **Classify**: the returned hostnames are sorted into the report and the
//!   automatic one is recorded for next time
//!
//! ```text
//! defaults ─┐
//! state ────┼──▶ merge ──▶ reconcile ──▶ component ──▶ classify ──▶ state
//! inputs ───┘                                              │
//!                                                          ▼
//!                                                        report
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use trellis_control::{AdapterConfig, FrameworkDeployer, HttpComponent, MemoryStore};
//!
//! let config = AdapterConfig::load()?;
//! let component = HttpComponent::new(&config.component)?;
//! let deployer = FrameworkDeployer::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(component),
//!     config,
//! );
//!
//! let report = deployer.deploy(inputs).await?;
//! ```

#![forbid(unsafe_code)]

pub mod bootstrap;
pub mod classify;
pub mod component;
pub mod config;
pub mod deployment;
pub mod domain;
pub mod error;
pub mod identity;
pub mod inputs;
pub mod merge;
pub mod reconcile;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use classify::{classify, Classification, DeployedTrigger, ReportShape, TriggerReport};
pub use component::{DeploymentComponent, HttpComponent};
pub use config::AdapterConfig;
pub use deployment::{DeployReport, FrameworkDeployer, Plan};
pub use domain::{AutoDomainMatcher, SuffixMatcher};
pub use error::{ConfigConflict, DeployError, DeployResult};
pub use inputs::DeployInputs;
pub use reconcile::{ReconciliationInput, Reconciler};
pub use store::{FileStore, MemoryStore, StateStore};
pub use types::{
    DeploymentState, DomainBinding, FunctionDescriptor, FunctionSpec, ProjectId,
    ServiceDescriptor, Trigger, TriggerType,
};
