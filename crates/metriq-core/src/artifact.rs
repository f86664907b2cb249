//! Catalog artifact handles

use serde::{Deserialize, Serialize};

/// Kind of object registered in the artifact catalog
///
/// The catalog tracks every object the pipeline knows about; artifact
/// resolution only ever asks for [`ArtifactKind::MetricsView`], but lookups
/// are keyed by kind so the same name may exist as several objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A plain warehouse table
    Table,

    /// An ingested external source
    Source,

    /// A SQL transformation materialized by the pipeline
    Model,

    /// A curated metrics view
    MetricsView,
}

impl ArtifactKind {
    /// Stable string form, matching the serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Source => "source",
            Self::Model => "model",
            Self::MetricsView => "metrics_view",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named catalog object that a SQL reference may denote
///
/// Opaque handle returned by catalog lookups. Values are immutable
/// snapshots; the catalog may change between lookups, but a returned
/// `Artifact` never does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// Object kind
    pub kind: ArtifactKind,

    /// Registered name, with the casing it was registered under
    pub name: String,
}

impl Artifact {
    /// Create an artifact handle
    pub fn new(kind: ArtifactKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for a metrics view handle
    pub fn metrics_view(name: impl Into<String>) -> Self {
        Self::new(ArtifactKind::MetricsView, name)
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
