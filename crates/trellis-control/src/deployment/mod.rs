//! Deployment orchestration.
//!
//! This module ties the pieces together: it loads the recorded state, merges
//! and reconciles the desired configuration, hands the result to the
//! deployment component and records what came back.

mod manager;

pub use manager::{DeployReport, FrameworkDeployer, Plan};
