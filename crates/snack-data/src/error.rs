//! Fetch error types.

use std::time::Duration;

use snack_commerce::CommerceError;

use crate::dependency::DependencyTag;

/// Error type for fetch operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("{tag} timed out after {after:?}")]
    Timeout { tag: DependencyTag, after: Duration },

    #[error("{tag} unavailable: {reason}")]
    Unavailable { tag: DependencyTag, reason: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl FetchError {
    /// The dependency that failed, if known.
    pub fn tag(&self) -> Option<DependencyTag> {
        match self {
            Self::Timeout { tag, .. } | Self::Unavailable { tag, .. } => Some(*tag),
            Self::Deserialization(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}

impl From<FetchError> for CommerceError {
    fn from(e: FetchError) -> Self {
        match e.tag() {
            Some(DependencyTag::Reliability) => CommerceError::ScoringFailed(e.to_string()),
            Some(DependencyTag::Catalog) => CommerceError::CatalogUnavailable(e.to_string()),
            None => CommerceError::SerializationError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_by_dependency() {
        let scoring: CommerceError = FetchError::Unavailable {
            tag: DependencyTag::Reliability,
            reason: "down".to_string(),
        }
        .into();
        assert!(matches!(scoring, CommerceError::ScoringFailed(ref m) if m.contains("down")));

        let catalog: CommerceError = FetchError::Timeout {
            tag: DependencyTag::Catalog,
            after: Duration::from_millis(10),
        }
        .into();
        assert!(matches!(catalog, CommerceError::CatalogUnavailable(_)));

        let decode: CommerceError = FetchError::Deserialization("bad".to_string()).into();
        assert!(matches!(decode, CommerceError::SerializationError(_)));
    }
}
