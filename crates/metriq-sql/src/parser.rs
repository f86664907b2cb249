//! SQL parsing with configurable dialect
//!
//! Thin wrapper over `sqlparser` that carries the original text and source
//! path alongside the parsed statements, and converts parse failures into
//! structured diagnostics.

use metriq_core::{Diagnostic, DiagnosticCode, DialectConfig, Location, Severity};
use sqlparser::ast::{Query, Statement};
use sqlparser::dialect::{Dialect, DuckDbDialect, GenericDialect, PostgreSqlDialect};
use sqlparser::parser::{Parser, ParserError};
use std::path::{Path, PathBuf};

/// SQL parser with a fixed dialect
pub struct SqlParser {
    dialect: Box<dyn Dialect>,
}

impl SqlParser {
    /// Parser for generic ANSI SQL
    pub fn new() -> Self {
        Self {
            dialect: Box::new(GenericDialect {}),
        }
    }

    /// Parser for the DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: Box::new(DuckDbDialect {}),
        }
    }

    /// Parser for the PostgreSQL dialect
    pub fn postgres() -> Self {
        Self {
            dialect: Box::new(PostgreSqlDialect {}),
        }
    }

    /// Parser for a configured dialect
    pub fn from_dialect(dialect: &DialectConfig) -> Self {
        match dialect {
            DialectConfig::DuckDb => Self::duckdb(),
            DialectConfig::Postgres => Self::postgres(),
            DialectConfig::Ansi => Self::new(),
        }
    }

    /// Parse SQL text into statements
    pub fn parse(&self, sql: &str, file_path: Option<&Path>) -> Result<ParsedSql, ParseError> {
        match Parser::parse_sql(&*self.dialect, sql) {
            Ok(statements) => Ok(ParsedSql {
                sql: sql.to_string(),
                statements,
                file_path: file_path.map(|p| p.to_path_buf()),
            }),
            Err(error) => Err(ParseError {
                sql: sql.to_string(),
                error,
                file_path: file_path.map(|p| p.to_path_buf()),
            }),
        }
    }

    /// Parse SQL from a file
    pub fn parse_file(&self, path: &Path) -> Result<ParsedSql, ParseError> {
        let sql = std::fs::read_to_string(path).map_err(|e| ParseError {
            sql: String::new(),
            error: ParserError::ParserError(format!("failed to read file: {}", e)),
            file_path: Some(path.to_path_buf()),
        })?;

        self.parse(&sql, Some(path))
    }

    /// Parse SQL, reporting failure as a diagnostic
    pub fn parse_with_diagnostic(
        &self,
        sql: &str,
        file_path: Option<&Path>,
    ) -> Result<ParsedSql, Diagnostic> {
        self.parse(sql, file_path).map_err(|e| e.to_diagnostic())
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Successfully parsed SQL
#[derive(Debug, Clone)]
pub struct ParsedSql {
    /// Original SQL text
    pub sql: String,

    /// Parsed statements
    pub statements: Vec<Statement>,

    /// Source file path, if parsed from a file
    pub file_path: Option<PathBuf>,
}

impl ParsedSql {
    /// The first statement, if any
    pub fn first_statement(&self) -> Option<&Statement> {
        self.statements.first()
    }

    /// Whether the first statement is a query
    pub fn is_select(&self) -> bool {
        matches!(self.first_statement(), Some(Statement::Query(_)))
    }

    /// The first statement as a query, if it is one
    pub fn as_query(&self) -> Option<&Query> {
        match self.first_statement() {
            Some(Statement::Query(query)) => Some(query.as_ref()),
            _ => None,
        }
    }

    /// Number of parsed statements
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}

/// SQL parsing failure
#[derive(Debug)]
pub struct ParseError {
    /// Original SQL text
    pub sql: String,

    /// Underlying parser error
    pub error: ParserError,

    /// Source file path, if parsed from a file
    pub file_path: Option<PathBuf>,
}

impl ParseError {
    /// Convert to a structured diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::new(
            DiagnosticCode::SqlParseError,
            Severity::Error,
            format!("failed to parse SQL: {}", self.error),
        );

        match &self.file_path {
            Some(path) => diag.with_location(Location::new(path.display().to_string())),
            None => diag,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SQL parse error: {}", self.error)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_select() {
        let parser = SqlParser::new();
        let parsed = parser
            .parse("SELECT revenue FROM orders WHERE region = 'emea'", None)
            .unwrap();

        assert_eq!(parsed.statement_count(), 1);
        assert!(parsed.is_select());
        assert!(parsed.as_query().is_some());
    }

    #[test]
    fn parse_invalid_sql() {
        let parser = SqlParser::new();
        let error = parser.parse("SELECT FROM WHERE", None).unwrap_err();

        let diag = error.to_diagnostic();
        assert_eq!(diag.code, DiagnosticCode::SqlParseError);
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.location.is_none());
    }

    #[test]
    fn parse_error_carries_file_location() {
        let parser = SqlParser::new();
        let path = Path::new("queries/broken.sql");
        let error = parser.parse("SELECT FROM", Some(path)).unwrap_err();

        let diag = error.to_diagnostic();
        assert_eq!(diag.location.unwrap().file, "queries/broken.sql");
    }

    #[test]
    fn all_dialects_parse_plain_selects() {
        let sql = "SELECT revenue FROM orders";

        assert!(SqlParser::new().parse(sql, None).is_ok());
        assert!(SqlParser::duckdb().parse(sql, None).is_ok());
        assert!(SqlParser::postgres().parse(sql, None).is_ok());
    }

    #[test]
    fn from_dialect_config() {
        let parsed = SqlParser::from_dialect(&DialectConfig::DuckDb)
            .parse("SELECT 1", None)
            .unwrap();
        assert!(parsed.is_select());
    }

    #[test]
    fn non_query_statement_is_not_a_select() {
        let parsed = SqlParser::new().parse("DROP TABLE orders", None).unwrap();
        assert!(!parsed.is_select());
        assert!(parsed.as_query().is_none());
    }
}
