//! Artifact-reference resolution
//!
//! Walks a reduced SQL subtree that is expected to denote a table or view
//! reference and determines which catalog artifact it names. Alias
//! expressions are transparent; a simple identifier is checked against the
//! catalog as a metrics view; every other shape is not resolvable here and
//! yields no artifact.

use crate::node::{CallKind, SqlNode};
use metriq_catalog::{ArtifactStore, CatalogError};
use metriq_core::{Artifact, ArtifactKind, Diagnostic, DiagnosticCode, Severity};

/// Failures distinct from "no artifact"
///
/// A subtree that simply does not name a known metrics view is not an
/// error; that outcome is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// An alias expression arrived without the expression it aliases.
    /// Parsers do not produce this shape; it indicates an upstream defect.
    #[error("alias expression has no target operand")]
    MalformedAlias,

    /// The catalog itself failed, as opposed to missing the name
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ResolveError {
    /// Convert to a structured diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = match self {
            Self::MalformedAlias => DiagnosticCode::MalformedAliasExpression,
            Self::Catalog(_) => DiagnosticCode::CatalogUnavailable,
        };
        Diagnostic::new(code, Severity::Error, self.to_string())
    }
}

/// Resolves table-reference subtrees to catalog artifacts
///
/// Stateless: holds only the catalog handle it is given, and never mutates
/// the tree it walks. Each [`resolve`](Self::resolve) call performs at most
/// one catalog lookup.
pub struct ArtifactResolver<'a, S: ?Sized> {
    catalog: &'a S,
}

impl<'a, S: ArtifactStore + ?Sized> ArtifactResolver<'a, S> {
    /// Create a resolver over the given catalog
    pub fn new(catalog: &'a S) -> Self {
        Self { catalog }
    }

    /// Resolve a subtree to the metrics view it references, if any
    ///
    /// Alias chains are followed through their aliased expression; the
    /// alias name itself plays no part in resolution. Qualified names,
    /// joins, subqueries, functions, and literals all resolve to `None`.
    pub fn resolve(&self, node: &SqlNode) -> Result<Option<Artifact>, ResolveError> {
        match node {
            SqlNode::Identifier(id) => match id.simple_name() {
                Some(name) => {
                    let found = self.catalog.lookup(ArtifactKind::MetricsView, name)?;
                    tracing::debug!(name, hit = found.is_some(), "resolved table reference");
                    Ok(found)
                }
                // qualified names are not resolved here
                None => Ok(None),
            },
            SqlNode::Call(call) => match call.kind {
                // "orders AS o": recurse on the aliased expression
                CallKind::As => {
                    let target = call.operands.first().ok_or(ResolveError::MalformedAlias)?;
                    self.resolve(target)
                }
                CallKind::Select | CallKind::Join | CallKind::Function | CallKind::Other => {
                    Ok(None)
                }
            },
            SqlNode::Literal(_) => Ok(None),
        }
    }
}
