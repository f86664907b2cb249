//! End-to-end tests: SQL text through parsing, lowering, and resolution

use metriq_catalog::{CatalogError, InMemoryCatalog};
use metriq_core::{Artifact, ArtifactKind};
use metriq_sql::{ArtifactResolver, ResolveError, SqlNode, SqlParser};
use pretty_assertions::assert_eq;

fn resolve(catalog: &InMemoryCatalog, sql: &str) -> Result<Option<Artifact>, ResolveError> {
    let parsed = SqlParser::new().parse(sql, None).expect("query parses");
    let statement = parsed.first_statement().expect("one statement");

    match SqlNode::from_statement(statement) {
        Some(node) => ArtifactResolver::new(catalog).resolve(&node),
        None => Ok(None),
    }
}

fn orders_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new().with_artifact(Artifact::metrics_view("orders"))
}

#[test]
fn bare_reference_resolves() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT revenue FROM orders").unwrap();
    assert_eq!(found, Some(Artifact::metrics_view("orders")));
}

#[test]
fn aliased_reference_resolves() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT o.revenue FROM orders AS o").unwrap();
    assert_eq!(found, Some(Artifact::metrics_view("orders")));
}

#[test]
fn implicit_alias_resolves() {
    let catalog = orders_catalog();

    // The parser treats "orders o" like "orders AS o"
    let found = resolve(&catalog, "SELECT o.revenue FROM orders o").unwrap();
    assert_eq!(found, Some(Artifact::metrics_view("orders")));
}

#[test]
fn qualified_reference_does_not_resolve() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT revenue FROM db.orders").unwrap();
    assert_eq!(found, None);
}

#[test]
fn unknown_reference_does_not_resolve() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT id FROM users").unwrap();
    assert_eq!(found, None);
}

#[test]
fn reference_casing_is_forgiven() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT revenue FROM ORDERS").unwrap();
    assert_eq!(found, Some(Artifact::metrics_view("orders")));
}

#[test]
fn derived_table_does_not_resolve() {
    let catalog = orders_catalog();

    let found = resolve(&catalog, "SELECT * FROM (SELECT revenue FROM orders) AS t").unwrap();
    assert_eq!(found, None);
}

#[test]
fn join_does_not_resolve() {
    let catalog = orders_catalog();

    let found = resolve(
        &catalog,
        "SELECT * FROM orders JOIN users ON orders.user_id = users.id",
    )
    .unwrap();
    assert_eq!(found, None);
}

#[test]
fn model_of_the_same_name_is_not_a_metrics_view() {
    let catalog =
        InMemoryCatalog::new().with_artifact(Artifact::new(ArtifactKind::Model, "orders"));

    let found = resolve(&catalog, "SELECT revenue FROM orders").unwrap();
    assert_eq!(found, None);
}

#[test]
fn catalog_failure_is_not_a_miss() {
    let catalog = orders_catalog().with_unavailable("connection refused");

    let result = resolve(&catalog, "SELECT revenue FROM orders");
    assert!(matches!(
        result,
        Err(ResolveError::Catalog(CatalogError::Unavailable(_)))
    ));
}

#[test]
fn snapshot_loaded_catalog_resolves() {
    let catalog = InMemoryCatalog::from_json_str(
        r#"[
            {"kind": "metrics_view", "name": "orders"},
            {"kind": "source", "name": "raw_orders"}
        ]"#,
    )
    .unwrap();

    let found = resolve(&catalog, "SELECT revenue FROM orders AS o").unwrap();
    assert_eq!(found, Some(Artifact::metrics_view("orders")));
}
