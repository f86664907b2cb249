//! Read-only lookup contract over the artifact catalog

use metriq_core::{Artifact, ArtifactKind};

/// Errors raised by a catalog backend
///
/// A lookup miss is not an error; it is reported as `Ok(None)` from
/// [`ArtifactStore::lookup`]. These variants cover the backend itself
/// failing, which callers must not confuse with "not registered".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog query failed: {0}")]
    QueryFailed(String),

    #[error("malformed catalog data: {0}")]
    Malformed(String),
}

/// Trait for read-only artifact lookup
///
/// Name comparison policy (case folding, normalization) belongs entirely to
/// the implementation; callers pass the referenced text unchanged.
pub trait ArtifactStore: Send + Sync {
    /// Look up an artifact by kind and name
    ///
    /// Returns `Ok(None)` when no artifact of that kind and name is
    /// registered.
    fn lookup(&self, kind: ArtifactKind, name: &str) -> Result<Option<Artifact>, CatalogError>;
}
