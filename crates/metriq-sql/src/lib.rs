//! SQL parsing and artifact-reference resolution
//!
//! This crate handles:
//! - Parsing SQL with a configurable dialect (wrapping `sqlparser`)
//! - Lowering parser table references into the reduced [`SqlNode`] tree
//! - Resolving reference subtrees to catalog artifacts

pub mod node;
pub mod parser;
pub mod resolver;

pub use node::{Call, CallKind, Identifier, SqlNode};
pub use parser::{ParseError, ParsedSql, SqlParser};
pub use resolver::{ArtifactResolver, ResolveError};
