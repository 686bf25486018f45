//! Detecting changes to a function's deployment identity.
//!
//! A function is identified on the platform by its region, service name and
//! function name. When any of them changes the deployed resource is new, and
//! an automatic domain issued for the old one no longer applies.

use crate::types::DeploymentState;

/// Identity requested for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesiredIdentity<'a> {
    /// Region to deploy to.
    pub region: &'a str,
    /// Function name given by the user, if any.
    pub function_name: Option<&'a str>,
    /// Service name given by the user, if any.
    pub service_name: Option<&'a str>,
}

/// Returns true if the desired identity differs from the recorded one.
///
/// Names are only compared when the user specified them. Without a recorded
/// state the identity is always considered changed.
#[must_use]
pub fn identity_changed(desired: DesiredIdentity<'_>, previous: Option<&DeploymentState>) -> bool {
    let Some(previous) = previous else {
        return true;
    };

    if desired.region != previous.region {
        return true;
    }

    let differs = |wanted: Option<&str>, recorded: Option<&String>| {
        wanted.is_some_and(|name| recorded.map(String::as_str) != Some(name))
    };

    differs(
        desired.function_name,
        previous.function.descriptor.name.as_ref(),
    ) || differs(desired.service_name, previous.service.name.as_ref())
}
