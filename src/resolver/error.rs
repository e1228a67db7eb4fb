//! Resolver error classification

use thiserror::Error;

/// Failure of a resolver operation.
///
/// Resource absence is never an error: it is reported as `NotInstalled` or an
/// empty listing, or as [`ResolverError::Precondition`] for mutations.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// kubectl cannot be run or the API server does not answer
    #[error("{message}")]
    ClusterUnreachable { message: String },

    /// The caller must fix the cluster before retrying
    #[error("{0}")]
    Precondition(String),

    /// A listing could not be decoded at all
    #[error("Failed to parse {what} response: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Any other non-zero exit, with kubectl's own text
    #[error("{context}: {diagnostic}")]
    CommandFailed { context: String, diagnostic: String },
}

impl ResolverError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        ResolverError::ClusterUnreachable {
            message: message.into(),
        }
    }

    pub fn command_failed(context: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        ResolverError::CommandFailed {
            context: context.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Declared precondition failures are the caller's to remediate
    pub fn is_precondition(&self) -> bool {
        matches!(self, ResolverError::Precondition(_))
    }
}
