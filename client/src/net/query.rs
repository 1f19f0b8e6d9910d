//! Table query builder for the REST endpoint.
//!
//! Filters are expressed as query-string pairs (`col=eq.value`,
//! `order=col.desc`, `select=*`) so the HTTP layer can pass them straight to
//! the request builder, which handles percent-encoding.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::fmt::Display;

/// `Accept` value asking for a single object instead of an array.
pub const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    table: String,
    params: Vec<(String, String)>,
    single: bool,
}

impl Query {
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self { table: table.into(), params: Vec::new(), single: false }
    }

    /// Columns to return. A later call replaces an earlier one.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.params.retain(|(k, _)| k != "select");
        self.params.push(("select".to_owned(), columns.to_owned()));
        self
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params.push(("order".to_owned(), format!("{column}.{direction}")));
        self
    }

    /// Expect exactly one row; the backend answers 406 otherwise.
    #[must_use]
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    #[must_use]
    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Filter pairs only, for `PATCH`/`DELETE` where `select` is meaningless.
    #[must_use]
    pub fn filters(&self) -> Vec<(String, String)> {
        self.params.iter().filter(|(k, _)| k != "select" && k != "order").cloned().collect()
    }
}
