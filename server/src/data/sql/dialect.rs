//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

/// SQL dialect trait for generating database-specific SQL
///
/// Different databases have different syntax for:
/// - Parameter placeholders (? vs $1)
/// - Byte-order text comparison
/// - NULL ordering
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Case-sensitive LIKE against an escaped parameter
    fn like(&self, col: &str, param_idx: usize) -> String {
        format!("{} LIKE {} ESCAPE '\\'", col, self.placeholder(param_idx))
    }

    /// Text column compared by code point, independent of database locale
    ///
    /// - SQLite: the default BINARY collation already does this
    /// - PostgreSQL: `col COLLATE "C"`
    fn binary_collation(&self, col: &str) -> String;

    /// Generate LIMIT/OFFSET clause
    ///
    /// Most databases use `LIMIT x OFFSET y`, but syntax may vary.
    fn limit_offset(&self, limit: u32, offset: u64) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    /// Generate ORDER BY clause with NULL handling
    ///
    /// - PostgreSQL: `col DESC NULLS LAST`
    /// - SQLite: Doesn't support NULLS FIRST/LAST
    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String;
}
