//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn binary_collation(&self, col: &str) -> String {
        col.to_string()
    }

    fn order_by_with_nulls(&self, col: &str, desc: bool, nulls_last: bool) -> String {
        // SQLite doesn't support NULLS FIRST/LAST, emulate with CASE
        let dir = if desc { "DESC" } else { "ASC" };
        if nulls_last {
            format!(
                "CASE WHEN {} IS NULL THEN 1 ELSE 0 END, {} {}",
                col, col, dir
            )
        } else {
            format!(
                "CASE WHEN {} IS NULL THEN 0 ELSE 1 END, {} {}",
                col, col, dir
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_binary_collation() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.binary_collation("customer_name_lower"), "customer_name_lower");
    }

    #[test]
    fn test_like() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.like("tag_key", 3), r"tag_key LIKE ? ESCAPE '\'");
    }

    #[test]
    fn test_order_by_with_nulls() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.order_by_with_nulls("sale_date", true, true),
            "CASE WHEN sale_date IS NULL THEN 1 ELSE 0 END, sale_date DESC"
        );
        assert_eq!(
            dialect.order_by_with_nulls("name", false, false),
            "CASE WHEN name IS NULL THEN 0 ELSE 1 END, name ASC"
        );
    }
}
