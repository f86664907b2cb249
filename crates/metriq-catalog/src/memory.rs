//! In-memory artifact catalog
//!
//! Backs local analysis and the CLI, and doubles as the deterministic fake
//! for resolver tests: lookups can be made to fail wholesale or per name.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use metriq_catalog::{ArtifactStore, InMemoryCatalog};
//! use metriq_core::{Artifact, ArtifactKind};
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_artifact(Artifact::metrics_view("orders"));
//!
//! let hit = catalog.lookup(ArtifactKind::MetricsView, "orders")?;
//! assert!(hit.is_some());
//! ```

use crate::store::{ArtifactStore, CatalogError};
use metriq_core::{Artifact, ArtifactKind};
use std::collections::HashMap;
use std::path::Path;

/// Lookup key. Names are stored with their original casing but checked
/// case-insensitively, so the key carries the folded form.
type Key = (ArtifactKind, String);

fn key(kind: ArtifactKind, name: &str) -> Key {
    (kind, name.to_lowercase())
}

/// In-memory artifact catalog
///
/// Registration takes `&mut self`; lookups take `&self`, so a populated
/// catalog is safe to share across threads.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<Key, Artifact>,

    /// Per-name errors to simulate backend failures
    errors: HashMap<Key, CatalogError>,

    /// When set, every lookup fails with this reason
    unavailable: Option<String>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact, replacing any existing entry of the same kind
    /// and (case-insensitive) name
    pub fn register(&mut self, artifact: Artifact) {
        self.entries
            .insert(key(artifact.kind, &artifact.name), artifact);
    }

    /// Register several artifacts at once
    pub fn register_all(&mut self, artifacts: impl IntoIterator<Item = Artifact>) {
        for artifact in artifacts {
            self.register(artifact);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.register(artifact);
        self
    }

    /// Make every lookup fail, simulating an unreachable backend
    pub fn with_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    /// Make lookups of one specific entry fail with the given error
    pub fn with_lookup_error(
        mut self,
        kind: ArtifactKind,
        name: &str,
        error: CatalogError,
    ) -> Self {
        self.errors.insert(key(kind, name), error);
        self
    }

    /// Load a catalog snapshot from a JSON artifact list
    ///
    /// The format is a flat array: `[{"kind": "metrics_view", "name": "orders"}, ...]`.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let artifacts: Vec<Artifact> =
            serde_json::from_str(json).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let mut catalog = Self::new();
        catalog.register_all(artifacts);
        Ok(catalog)
    }

    /// Load a catalog snapshot from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Unavailable(format!("{}: {}", path.display(), e))
        })?;

        Self::from_json_str(&contents)
    }

    /// Number of registered artifacts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered artifacts, ordered by kind then name
    pub fn artifacts(&self) -> Vec<&Artifact> {
        let mut artifacts: Vec<&Artifact> = self.entries.values().collect();
        artifacts.sort_by_key(|a| (a.kind.as_str(), a.name.to_lowercase()));
        artifacts
    }
}

impl ArtifactStore for InMemoryCatalog {
    fn lookup(&self, kind: ArtifactKind, name: &str) -> Result<Option<Artifact>, CatalogError> {
        if let Some(reason) = &self.unavailable {
            return Err(CatalogError::Unavailable(reason.clone()));
        }

        let key = key(kind, name);
        if let Some(error) = self.errors.get(&key) {
            return Err(error.clone());
        }

        let found = self.entries.get(&key).cloned();
        tracing::debug!(kind = %kind, name, hit = found.is_some(), "catalog lookup");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_hit_and_miss() {
        let catalog = InMemoryCatalog::new().with_artifact(Artifact::metrics_view("orders"));

        let hit = catalog.lookup(ArtifactKind::MetricsView, "orders").unwrap();
        assert_eq!(hit, Some(Artifact::metrics_view("orders")));

        let miss = catalog.lookup(ArtifactKind::MetricsView, "users").unwrap();
        assert_eq!(miss, None);
    }

    #[test]
    fn lookup_is_keyed_by_kind() {
        let catalog =
            InMemoryCatalog::new().with_artifact(Artifact::new(ArtifactKind::Model, "orders"));

        // Registered as a model, so a metrics-view lookup misses
        let miss = catalog.lookup(ArtifactKind::MetricsView, "orders").unwrap();
        assert_eq!(miss, None);

        let hit = catalog.lookup(ArtifactKind::Model, "orders").unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = InMemoryCatalog::new().with_artifact(Artifact::metrics_view("Orders"));

        let hit = catalog.lookup(ArtifactKind::MetricsView, "ORDERS").unwrap();
        // The registered casing is preserved in the returned handle
        assert_eq!(hit, Some(Artifact::metrics_view("Orders")));
    }

    #[test]
    fn unavailable_catalog_fails_every_lookup() {
        let catalog = InMemoryCatalog::new()
            .with_artifact(Artifact::metrics_view("orders"))
            .with_unavailable("connection refused");

        let result = catalog.lookup(ArtifactKind::MetricsView, "orders");
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }

    #[test]
    fn per_name_error_injection() {
        let catalog = InMemoryCatalog::new()
            .with_artifact(Artifact::metrics_view("orders"))
            .with_lookup_error(
                ArtifactKind::MetricsView,
                "restricted",
                CatalogError::QueryFailed("permission denied".to_string()),
            );

        assert!(catalog.lookup(ArtifactKind::MetricsView, "orders").is_ok());
        assert!(matches!(
            catalog.lookup(ArtifactKind::MetricsView, "restricted"),
            Err(CatalogError::QueryFailed(_))
        ));
    }

    #[test]
    fn load_from_json() {
        let json = r#"[
            {"kind": "metrics_view", "name": "orders"},
            {"kind": "source", "name": "raw_orders"},
            {"kind": "model", "name": "orders"}
        ]"#;

        let catalog = InMemoryCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 3);

        let hit = catalog.lookup(ArtifactKind::MetricsView, "orders").unwrap();
        assert_eq!(hit, Some(Artifact::metrics_view("orders")));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let result = InMemoryCatalog::from_json_str("{\"kind\": \"metrics_view\"}");
        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn artifacts_are_listed_in_stable_order() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register_all([
            Artifact::metrics_view("Zulu"),
            Artifact::metrics_view("alpha"),
            Artifact::new(ArtifactKind::Model, "orders"),
        ]);

        let names: Vec<String> = catalog
            .artifacts()
            .iter()
            .map(|a| a.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["metrics_view:alpha", "metrics_view:Zulu", "model:orders"]
        );
    }

    #[test]
    fn reregistering_replaces_the_entry() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register(Artifact::metrics_view("orders"));
        catalog.register(Artifact::metrics_view("ORDERS"));

        assert_eq!(catalog.len(), 1);
        let hit = catalog.lookup(ArtifactKind::MetricsView, "orders").unwrap();
        assert_eq!(hit, Some(Artifact::metrics_view("ORDERS")));
    }
}
