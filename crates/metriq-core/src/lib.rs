//! Metriq Core
//!
//! Core domain model shared by the rest of the workspace:
//! - Catalog artifact handles ([`Artifact`], [`ArtifactKind`])
//! - Structured diagnostics with stable codes
//! - Configuration (`metriq.toml`)

pub mod artifact;
pub mod config;
pub mod diagnostic;

pub use artifact::{Artifact, ArtifactKind};
pub use config::{CatalogConfig, Config, ConfigError, DialectConfig};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
