//! Redb table definitions for namespaces.
//!
//! Every namespace is a Redb table of raw byte keys and values. Named
//! namespaces use their name as the table name; the default namespace uses a
//! reserved name that user names cannot collide with.

use redb::TableDefinition;

use crate::engine::Namespace;

/// Table name backing the default namespace.
pub const DEFAULT_TABLE: &str = "__stones_default";

/// The Redb table definition for a namespace table.
pub type NamespaceTable<'a> = TableDefinition<'a, &'static [u8], &'static [u8]>;

/// The table name backing `ns`.
#[must_use]
pub fn table_name(ns: &Namespace) -> &str {
    ns.name().unwrap_or(DEFAULT_TABLE)
}

/// The table definition backing `ns`.
#[must_use]
pub fn definition(ns: &Namespace) -> NamespaceTable<'_> {
    TableDefinition::new(table_name(ns))
}

/// Whether a table counts against the named-namespace limit.
#[must_use]
pub fn is_named_table(name: &str) -> bool {
    name != DEFAULT_TABLE
}
