//! Sales query builder
//!
//! Turns a [`SalesQuery`] into a data statement, a count statement and the
//! parameter list they share. Only fixed column names are ever interpolated;
//! every user-supplied value travels as a bound parameter.

use crate::domain::sales::{FIELDS, SalesFilters, SalesQuery, SortKey};
use crate::utils::pattern::escape_like_pattern;

use super::SqlDialect;

/// Bound parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

impl std::fmt::Display for SqlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlValue::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            SqlValue::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Positional parameters collected while building a WHERE clause
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    /// Append a value and return its 1-based index
    pub fn push(&mut self, value: SqlValue) -> usize {
        self.values.push(value);
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Statement pair for one page of a sales query
#[derive(Debug, Clone)]
pub struct SalesSql {
    pub data_sql: String,
    pub count_sql: String,
    pub params: SqlParams,
}

/// Columns selected for a sale row, surrogate id first
pub fn select_columns() -> String {
    let mut cols = vec!["id"];
    cols.extend(FIELDS.iter().map(|d| d.internal));
    cols.join(", ")
}

/// Build data and count statements sharing one parameter list
pub fn build_sales_query(query: &SalesQuery, dialect: &dyn SqlDialect) -> SalesSql {
    let mut params = SqlParams::default();
    let where_clause = build_where(query, dialect, &mut params);

    let data_sql = format!(
        "SELECT {} FROM sales{} ORDER BY {} {}",
        select_columns(),
        where_clause,
        build_order_by(query.sort, dialect),
        dialect.limit_offset(query.window.limit, query.window.offset()),
    );
    let count_sql = format!("SELECT COUNT(*) FROM sales{}", where_clause);

    tracing::trace!(dialect = dialect.name(), %data_sql, params = params.values.len(), "Built sales query");
    SalesSql {
        data_sql,
        count_sql,
        params,
    }
}

/// Totals statement over the filtered set; ignores sort and window
pub fn build_stats_query(query: &SalesQuery, dialect: &dyn SqlDialect) -> (String, SqlParams) {
    let mut params = SqlParams::default();
    let where_clause = build_where(query, dialect, &mut params);
    let sql = format!(
        "SELECT COUNT(*), \
         CAST(COALESCE(SUM(quantity), 0) AS BIGINT), \
         COALESCE(SUM(final_amount), 0.0), \
         COALESCE(SUM(total_amount - final_amount), 0.0) \
         FROM sales{}",
        where_clause
    );
    (sql, params)
}

/// WHERE clause (with leading space) or an empty string when nothing applies
pub fn build_where(query: &SalesQuery, dialect: &dyn SqlDialect, params: &mut SqlParams) -> String {
    let mut conditions = Vec::new();

    if let Some(term) = query.search_term() {
        let pattern = format!("%{}%", escape_like_pattern(&term));
        let name_idx = params.push(SqlValue::Text(pattern.clone()));
        let phone_idx = params.push(SqlValue::Text(pattern));
        // the *_lower columns hold the Unicode lowercase written at ingestion
        conditions.push(format!(
            "({} OR {})",
            dialect.like("customer_name_lower", name_idx),
            dialect.like("phone_number_lower", phone_idx)
        ));
    }

    conditions.extend(build_filter_conditions(&query.filters, dialect, params));

    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

fn build_filter_conditions(
    filters: &SalesFilters,
    dialect: &dyn SqlDialect,
    params: &mut SqlParams,
) -> Vec<String> {
    let mut conditions = Vec::new();

    for (field, values) in filters.list_filters() {
        if values.is_empty() {
            continue;
        }
        let placeholders: Vec<String> = values
            .iter()
            .map(|v| dialect.placeholder(params.push(SqlValue::Text(v.clone()))))
            .collect();
        conditions.push(format!("{} IN ({})", field.internal(), placeholders.join(", ")));
    }

    let tags = filters.normalized_tags();
    if !tags.is_empty() {
        // tag_key is ",a,b," so a delimited pattern matches whole labels only
        let any: Vec<String> = tags
            .iter()
            .map(|t| {
                let idx = params.push(SqlValue::Text(format!("%,{},%", escape_like_pattern(t))));
                dialect.like("tag_key", idx)
            })
            .collect();
        conditions.push(format!("({})", any.join(" OR ")));
    }

    if filters.has_age_bound() {
        // 0 is the coerced value for an unknown age
        conditions.push("age > 0".to_string());
        if let Some(min) = filters.age_min {
            let idx = params.push(SqlValue::Int(min));
            conditions.push(format!("age >= {}", dialect.placeholder(idx)));
        }
        if let Some(max) = filters.age_max {
            let idx = params.push(SqlValue::Int(max));
            conditions.push(format!("age <= {}", dialect.placeholder(idx)));
        }
    }

    if filters.has_date_bound() {
        conditions.push("sale_date IS NOT NULL".to_string());
        if let Some(from) = filters.date_from {
            let idx = params.push(SqlValue::Text(from.format("%Y-%m-%d").to_string()));
            conditions.push(format!("sale_date >= {}", dialect.placeholder(idx)));
        }
        if let Some(to) = filters.date_to {
            let idx = params.push(SqlValue::Text(to.format("%Y-%m-%d").to_string()));
            conditions.push(format!("sale_date <= {}", dialect.placeholder(idx)));
        }
    }

    conditions
}

/// ORDER BY body; every key ends in an id tie-break so pages are stable
pub fn build_order_by(sort: SortKey, dialect: &dyn SqlDialect) -> String {
    match sort {
        SortKey::DateNewest => {
            format!("{}, id ASC", dialect.order_by_with_nulls("sale_date", true, true))
        }
        SortKey::DateOldest => {
            format!("{}, id ASC", dialect.order_by_with_nulls("sale_date", false, true))
        }
        SortKey::QuantityHigh => "quantity DESC, id ASC".to_string(),
        SortKey::QuantityLow => "quantity ASC, id ASC".to_string(),
        SortKey::AmountHigh => "final_amount DESC, id ASC".to_string(),
        SortKey::CustomerAz => {
            format!("{} ASC, id ASC", dialect.binary_collation("customer_name_lower"))
        }
        SortKey::CustomerZa => {
            format!("{} DESC, id ASC", dialect.binary_collation("customer_name_lower"))
        }
        SortKey::IdDesc => "id DESC".to_string(),
    }
}
