//! Error types for trellis-control.

/// Result type alias using [`DeployError`].
pub type DeployResult<T> = Result<T, DeployError>;

/// Errors that can occur while reconciling or deploying a function.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The user configuration cannot be reconciled.
    #[error("config conflict: {0}")]
    ConfigConflict(#[from] ConfigConflict),

    /// The deployment component rejected or failed the request.
    #[error("component error: {0}")]
    Component(String),

    /// HTTP client error while talking to the deployment component.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// State store error.
    #[error("state store error: {0}")]
    Store(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialisation error.
    #[error("serialisation error: {0}")]
    Serialisation(String),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DeployError {
    /// Create a component error.
    #[must_use]
    pub fn component(msg: impl Into<String>) -> Self {
        Self::Component(msg.into())
    }

    /// Create a state store error.
    #[must_use]
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the conflict if this error is a configuration conflict.
    #[must_use]
    pub const fn as_conflict(&self) -> Option<&ConfigConflict> {
        match self {
            Self::ConfigConflict(conflict) => Some(conflict),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DeployError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialisation(err.to_string())
    }
}

/// Ways a domain/trigger configuration can be ambiguous.
///
/// Both kinds are fatal: nothing is submitted and the recorded state is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigConflict {
    /// Top-level domains were given alongside explicit triggers, so there is
    /// no way to tell which trigger should own them.
    #[error("Domains and Triggers cannot be set together")]
    DomainsWithTriggers,

    /// A second automatically assigned domain was found.
    #[error("Each function can only get one assigned domain name")]
    MultipleAutoDomains {
        /// Trigger holding the second automatic binding.
        trigger: String,
    },
}
