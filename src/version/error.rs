use thiserror::Error;

use crate::version::registry::DispatchKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("Invalid criteria operation: {op}")]
    InvalidCriteriaOperation { op: String },

    #[error("Invalid version criteria: {criteria}")]
    InvalidVersionCriteria { criteria: String },

    #[error("Invalid version '{sentry}' in criteria")]
    InvalidSentry { sentry: String },

    #[error("Operator '{op}' takes {expected} version(s), got {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Version {} is not supported by {target}", .version.as_deref().unwrap_or("<none>"))]
    VersionNotSupport {
        target: String,
        version: Option<String>,
    },

    #[error("Nothing registered under {key}")]
    NotRegistered { key: DispatchKey },

    #[error("{member} is not a guarded member of {subject}")]
    UnguardedMember {
        subject: &'static str,
        member: String,
    },

    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

impl CheckError {
    /// The rejected version, if this is a `VersionNotSupport`.
    pub fn version(&self) -> Option<&str> {
        match self {
            CheckError::VersionNotSupport { version, .. } => version.as_deref(),
            _ => None,
        }
    }
}
