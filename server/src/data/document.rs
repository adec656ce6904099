//! Document-store adapter
//!
//! Translates a [`SalesQuery`] into a MongoDB-style `find` description
//! (`filter`, `sort`, `skip`, `limit`). Stored documents carry the internal
//! field names plus derived keys mirroring the relational derived columns:
//!
//! - `sale_date`: ISO date string or null
//! - `sale_date_missing`: true when the date did not parse (sorts last)
//! - `tag_keys`: trimmed, lowercased tag labels
//! - `customer_name_lower`, `phone_number_lower`: case-folded search keys

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::domain::sales::{SalesFilters, SalesQuery, SortKey};

/// A `find` request against the `sales` collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentQuery {
    pub filter: Value,
    pub sort: Value,
    pub skip: u64,
    pub limit: u32,
}

/// Build the document-store request for a query
pub fn build_document_query(query: &SalesQuery) -> DocumentQuery {
    let mut clauses = Vec::new();

    if let Some(term) = query.search_term() {
        // term and keys are both already case-folded
        let pattern = regex::escape(&term);
        clauses.push(json!({
            "$or": [
                { "customer_name_lower": { "$regex": pattern } },
                { "phone_number_lower": { "$regex": pattern } },
            ]
        }));
    }
    clauses.extend(filter_clauses(&query.filters));

    let filter = if clauses.is_empty() {
        json!({})
    } else {
        json!({ "$and": clauses })
    };

    DocumentQuery {
        filter,
        sort: sort_spec(query.sort),
        skip: query.window.offset(),
        limit: query.window.limit,
    }
}

fn filter_clauses(filters: &SalesFilters) -> Vec<Value> {
    let mut clauses = Vec::new();

    for (field, values) in filters.list_filters() {
        if !values.is_empty() {
            clauses.push(json!({ field.internal(): { "$in": values } }));
        }
    }

    let tags = filters.normalized_tags();
    if !tags.is_empty() {
        clauses.push(json!({ "tag_keys": { "$in": tags } }));
    }

    if filters.has_age_bound() {
        let mut bounds = Map::new();
        bounds.insert("$gt".into(), json!(0));
        if let Some(min) = filters.age_min {
            bounds.insert("$gte".into(), json!(min));
        }
        if let Some(max) = filters.age_max {
            bounds.insert("$lte".into(), json!(max));
        }
        clauses.push(json!({ "age": bounds }));
    }

    if filters.has_date_bound() {
        let mut bounds = Map::new();
        bounds.insert("$ne".into(), Value::Null);
        if let Some(from) = filters.date_from {
            bounds.insert("$gte".into(), json!(from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = filters.date_to {
            bounds.insert("$lte".into(), json!(to.format("%Y-%m-%d").to_string()));
        }
        clauses.push(json!({ "sale_date": bounds }));
    }

    clauses
}

/// Ordered sort document; key order is significant
fn sort_spec(sort: SortKey) -> Value {
    match sort {
        SortKey::DateNewest => json!({ "sale_date_missing": 1, "sale_date": -1, "id": 1 }),
        SortKey::DateOldest => json!({ "sale_date_missing": 1, "sale_date": 1, "id": 1 }),
        SortKey::QuantityHigh => json!({ "quantity": -1, "id": 1 }),
        SortKey::QuantityLow => json!({ "quantity": 1, "id": 1 }),
        SortKey::AmountHigh => json!({ "final_amount": -1, "id": 1 }),
        SortKey::CustomerAz => json!({ "customer_name_lower": 1, "id": 1 }),
        SortKey::CustomerZa => json!({ "customer_name_lower": -1, "id": 1 }),
        SortKey::IdDesc => json!({ "id": -1 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sales::{FIELDS, FieldValue, SaleRecord, pipeline};
    use std::cmp::Ordering;

    /// Stored document for a record: internal field names plus derived keys
    fn to_document(record: &SaleRecord) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert("id".into(), json!(record.id));
        for def in &FIELDS {
            let value = match record.value(def.field) {
                FieldValue::Text(text) => json!(text),
                FieldValue::Integer(n) => json!(n),
                FieldValue::Decimal(x) => json!(x),
            };
            doc.insert(def.internal.into(), value);
        }

        let sale_date = record.sale_date().map(|d| d.format("%Y-%m-%d").to_string());
        doc.insert("sale_date_missing".into(), json!(sale_date.is_none()));
        doc.insert("sale_date".into(), json!(sale_date));
        let tag_keys: Vec<String> = record.tag_list().iter().map(|t| t.to_lowercase()).collect();
        doc.insert("tag_keys".into(), json!(tag_keys));
        doc.insert(
            "customer_name_lower".into(),
            json!(record.customer_name_lower()),
        );
        doc.insert(
            "phone_number_lower".into(),
            json!(record.phone_number_lower()),
        );
        doc
    }

    // Minimal evaluator for the operator subset the builder emits

    fn unescape(pattern: &str) -> String {
        let mut out = String::new();
        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn cmp_values(a: &Value, b: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Number(_) => 1,
                Value::String(_) => 2,
                Value::Bool(_) => 3,
                _ => 4,
            }
        }
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                x.as_f64().unwrap().total_cmp(&y.as_f64().unwrap())
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => rank(a).cmp(&rank(b)),
        }
    }

    fn field_matches(value: &Value, cond: &Value) -> bool {
        let Value::Object(ops) = cond else {
            return value == cond;
        };
        ops.iter().all(|(op, arg)| match op.as_str() {
            "$regex" => value
                .as_str()
                .is_some_and(|v| v.contains(&unescape(arg.as_str().unwrap()))),
            "$in" => {
                let candidates = arg.as_array().unwrap();
                match value {
                    Value::Array(items) => items.iter().any(|i| candidates.contains(i)),
                    other => candidates.contains(other),
                }
            }
            "$ne" => value != arg,
            "$gt" => !value.is_null() && cmp_values(value, arg) == Ordering::Greater,
            "$gte" => !value.is_null() && cmp_values(value, arg) != Ordering::Less,
            "$lte" => !value.is_null() && cmp_values(value, arg) != Ordering::Greater,
            other => panic!("unsupported operator {other}"),
        })
    }

    fn matches(doc: &Map<String, Value>, filter: &Value) -> bool {
        filter.as_object().unwrap().iter().all(|(key, cond)| match key.as_str() {
            "$and" => cond.as_array().unwrap().iter().all(|c| matches(doc, c)),
            "$or" => cond.as_array().unwrap().iter().any(|c| matches(doc, c)),
            field => field_matches(doc.get(field).unwrap_or(&Value::Null), cond),
        })
    }

    fn find(records: &[SaleRecord], q: &DocumentQuery) -> (Vec<i64>, u64) {
        let mut docs: Vec<Map<String, Value>> = records
            .iter()
            .map(to_document)
            .filter(|d| matches(d, &q.filter))
            .collect();
        let total = docs.len() as u64;
        let sort = q.sort.as_object().unwrap();
        docs.sort_by(|a, b| {
            for (key, dir) in sort {
                let ord = cmp_values(&a[key], &b[key]);
                let ord = if dir.as_i64() == Some(-1) { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        let ids = docs
            .iter()
            .skip(q.skip as usize)
            .take(q.limit as usize)
            .map(|d| d["id"].as_i64().unwrap())
            .collect();
        (ids, total)
    }

    fn sale(id: i64, name: &str, age: i64, date: &str, tags: &str) -> SaleRecord {
        SaleRecord {
            id,
            transaction_id: Some(format!("T-{id}")),
            customer_name: Some(name.to_string()),
            phone_number: Some(format!("98{id:08}")),
            gender: Some(if id % 2 == 0 { "Male" } else { "Female" }.to_string()),
            customer_region: Some(["North", "South", "East"][id as usize % 3].to_string()),
            age,
            date: Some(date.to_string()),
            tags: Some(tags.to_string()).filter(|t| !t.is_empty()),
            quantity: id % 4,
            final_amount: 90.0 + (id % 3) as f64,
            ..Default::default()
        }
    }

    fn dataset() -> Vec<SaleRecord> {
        vec![
            sale(1, "Bob", 20, "05-01-2023", "Electronics, Sale"),
            sale(2, "alice", 35, "2023-02-10", "Sale"),
            sale(3, "Charlie", 50, "garbage", "Clearance"),
            sale(4, "dave", 0, "20-03-2023", ""),
            sale(5, "Eve", 41, "01-04-2023", "sale, gift"),
            sale(6, "a.b (x)", 28, "", "Gift"),
            sale(7, "ÉLODIE Ünal", 33, "2023-05-02", ""),
        ]
    }

    #[test]
    fn test_empty_query() {
        let q = build_document_query(&SalesQuery::default());
        assert_eq!(q.filter, json!({}));
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 10);
        assert_eq!(
            serde_json::to_string(&q.sort).unwrap(),
            r#"{"sale_date_missing":1,"sale_date":-1,"id":1}"#
        );
    }

    #[test]
    fn test_filter_shape() {
        let q = build_document_query(&SalesQuery::from_pairs(&[
            ("search", " Ann "),
            ("gender", "Female"),
            ("tags", "Sale"),
            ("ageMax", "40"),
            ("dateFrom", "2023-01-01"),
            ("page", "3"),
            ("limit", "5"),
        ]));
        assert_eq!(
            q.filter,
            json!({ "$and": [
                { "$or": [
                    { "customer_name_lower": { "$regex": "ann" } },
                    { "phone_number_lower": { "$regex": "ann" } },
                ]},
                { "gender": { "$in": ["Female"] } },
                { "tag_keys": { "$in": ["sale"] } },
                { "age": { "$gt": 0, "$lte": 40 } },
                { "sale_date": { "$ne": null, "$gte": "2023-01-01" } },
            ]})
        );
        assert_eq!(q.skip, 10);
        assert_eq!(q.limit, 5);
    }

    #[test]
    fn test_document_derived_keys() {
        let doc = to_document(&sale(5, "Eve", 41, "01-04-2023", "sale, Gift"));
        assert_eq!(doc["id"], json!(5));
        assert_eq!(doc["customer_name"], json!("Eve"));
        assert_eq!(doc["sale_date"], json!("2023-04-01"));
        assert_eq!(doc["sale_date_missing"], json!(false));
        assert_eq!(doc["tag_keys"], json!(["sale", "gift"]));
        assert_eq!(doc["customer_name_lower"], json!("eve"));
        assert_eq!(doc["store_id"], Value::Null);

        let undated = to_document(&sale(3, "C", 1, "garbage", ""));
        assert_eq!(undated["sale_date"], Value::Null);
        assert_eq!(undated["sale_date_missing"], json!(true));
        assert_eq!(undated["tag_keys"], json!([]));
    }

    #[test]
    fn test_matches_in_memory_pipeline() {
        let records = dataset();
        let cases: Vec<Vec<(&str, &str)>> = vec![
            vec![],
            vec![("ageMin", "25"), ("ageMax", "45")],
            vec![("tags", "Sale")],
            vec![("tags", "GIFT,clearance")],
            vec![("search", "ALI")],
            vec![("search", "a.b (")],
            vec![("search", "élodie")],
            vec![("search", "ÜNAL")],
            vec![("search", "9800000003")],
            vec![("sortBy", "customer-az")],
            vec![("sortBy", "customer-za")],
            vec![("sortBy", "date-newest")],
            vec![("sortBy", "date-oldest")],
            vec![("sortBy", "quantity-high")],
            vec![("sortBy", "quantity-low")],
            vec![("sortBy", "amount-high")],
            vec![("sortBy", "nonsense")],
            vec![("dateFrom", "2023-02-10"), ("dateTo", "2023-03-20")],
            vec![("customerRegion", "North,South"), ("gender", "Male")],
            vec![("page", "2"), ("limit", "4"), ("sortBy", "date-oldest")],
        ];
        for case in cases {
            let query = SalesQuery::from_pairs(&case);
            let expected = pipeline::run_query(&records, &query);
            let (ids, total) = find(&records, &build_document_query(&query));
            let expected_ids: Vec<i64> = expected.data.iter().map(|r| r.id).collect();
            assert_eq!(ids, expected_ids, "case {case:?}");
            assert_eq!(total, expected.total_records, "case {case:?}");
        }
    }
}
