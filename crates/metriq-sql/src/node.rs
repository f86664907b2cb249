//! Reduced SQL tree consumed by artifact resolution
//!
//! The parser AST is far richer than resolution needs. This module keeps
//! only the shapes a table reference can take (names, alias expressions,
//! and a handful of uninterpreted call kinds), plus the lowering from
//! `sqlparser` table factors into that reduced form.

use sqlparser::ast::{
    ObjectName, Query, SetExpr, Statement, TableAlias, TableFactor, TableWithJoins,
};
use std::fmt;

/// A possibly-qualified name
///
/// `orders` is simple; `db.orders` is not. Only simple names participate in
/// artifact resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    segments: Vec<String>,
}

impl Identifier {
    /// Build an identifier from its dotted-path segments
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Build a single-segment identifier
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// True iff the name has exactly one segment
    pub fn is_simple(&self) -> bool {
        self.segments.len() == 1
    }

    /// The name text, when the identifier is simple
    pub fn simple_name(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Dotted-path segments, in order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Call kinds distinguished by reference extraction
///
/// Only `As` is interpreted; the remaining kinds exist so lowered shapes
/// stay distinguishable in debug output. Adding a kind forces a resolver
/// update: the resolver matches this enum exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Alias expression: `operands[0] AS operands[1]`
    As,

    /// A derived table (subquery)
    Select,

    /// A join tree
    Join,

    /// A table-valued function call
    Function,

    /// Anything else the parser can put in a FROM clause
    Other,
}

/// An operator applied to ordered operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub kind: CallKind,
    pub operands: Vec<SqlNode>,
}

impl Call {
    pub fn new(kind: CallKind, operands: Vec<SqlNode>) -> Self {
        Self { kind, operands }
    }
}

/// A node in the reduced SQL tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlNode {
    /// A possibly-qualified name
    Identifier(Identifier),

    /// An operator application
    Call(Call),

    /// A literal value, opaque to resolution
    Literal(String),
}

impl SqlNode {
    /// A simple identifier node
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Identifier(Identifier::simple(name))
    }

    /// Wrap `expr` in an alias expression: `expr AS alias`
    pub fn aliased(expr: SqlNode, alias: impl Into<String>) -> Self {
        Self::Call(Call::new(
            CallKind::As,
            vec![expr, SqlNode::simple(alias)],
        ))
    }

    /// Lower a parser object name into an identifier node
    pub fn from_object_name(name: &ObjectName) -> Self {
        Self::Identifier(Identifier::new(
            name.0.iter().map(|ident| ident.value.clone()).collect(),
        ))
    }

    /// Lower a parser table factor
    ///
    /// Aliased factors become `As` calls with the aliased shape as the
    /// first operand, mirroring how the parser nests `FROM t AS x`.
    pub fn from_table_factor(factor: &TableFactor) -> Self {
        match factor {
            TableFactor::Table { name, alias, .. } => {
                maybe_aliased(Self::from_object_name(name), alias.as_ref())
            }
            TableFactor::Derived { alias, .. } => maybe_aliased(
                Self::Call(Call::new(CallKind::Select, Vec::new())),
                alias.as_ref(),
            ),
            TableFactor::NestedJoin {
                table_with_joins,
                alias,
            } => maybe_aliased(
                Self::from_table_with_joins(table_with_joins),
                alias.as_ref(),
            ),
            TableFactor::TableFunction { alias, .. }
            | TableFactor::Function { alias, .. }
            | TableFactor::UNNEST { alias, .. } => maybe_aliased(
                Self::Call(Call::new(CallKind::Function, Vec::new())),
                alias.as_ref(),
            ),
            _ => Self::Call(Call::new(CallKind::Other, Vec::new())),
        }
    }

    /// Lower a FROM item
    ///
    /// A bare relation lowers to its own shape; a relation with joins lowers
    /// to a `Join` call over every joined relation.
    pub fn from_table_with_joins(table: &TableWithJoins) -> Self {
        if table.joins.is_empty() {
            return Self::from_table_factor(&table.relation);
        }

        let mut operands = Vec::with_capacity(table.joins.len() + 1);
        operands.push(Self::from_table_factor(&table.relation));
        operands.extend(
            table
                .joins
                .iter()
                .map(|join| Self::from_table_factor(&join.relation)),
        );
        Self::Call(Call::new(CallKind::Join, operands))
    }

    /// Lower the table reference of a query
    ///
    /// Curated-metrics queries address exactly one metrics view, so this
    /// takes the first FROM item of the innermost top-level SELECT. Returns
    /// `None` for set operations and FROM-less selects.
    pub fn from_query(query: &Query) -> Option<Self> {
        match query.body.as_ref() {
            SetExpr::Select(select) => select.from.first().map(Self::from_table_with_joins),
            SetExpr::Query(inner) => Self::from_query(inner),
            _ => None,
        }
    }

    /// Lower the table reference of a statement
    pub fn from_statement(statement: &Statement) -> Option<Self> {
        match statement {
            Statement::Query(query) => Self::from_query(query),
            _ => None,
        }
    }
}

fn maybe_aliased(node: SqlNode, alias: Option<&TableAlias>) -> SqlNode {
    match alias {
        Some(alias) => SqlNode::aliased(node, alias.name.value.clone()),
        None => node,
    }
}
