//! In-memory adapter: search -> filter -> sort -> paginate

use std::cmp::Reverse;

use super::query::{PageWindow, SalesFilters, SalesPage, SalesQuery, SortKey};
use super::record::SaleRecord;

/// Run a full query over a loaded dataset
pub fn run_query(records: &[SaleRecord], query: &SalesQuery) -> SalesPage {
    let mut matched = select(records, query);
    let total_records = matched.len() as u64;
    sort_records(&mut matched, query.sort);
    let data = paginate(matched, query.window)
        .into_iter()
        .cloned()
        .collect();
    SalesPage {
        data,
        total_records,
    }
}

/// All records passing the search term and every filter, in dataset order
pub fn select<'a>(records: &'a [SaleRecord], query: &SalesQuery) -> Vec<&'a SaleRecord> {
    let term = query.search_term();
    let tags = query.filters.normalized_tags();
    records
        .iter()
        .filter(|r| search_matches(term.as_deref(), r))
        .filter(|r| filters_match(&query.filters, &tags, r))
        .collect()
}

/// Case-insensitive substring on customer name or phone number.
/// `term` must already be lowercased.
pub fn search_matches(term: Option<&str>, record: &SaleRecord) -> bool {
    let Some(term) = term else {
        return true;
    };
    record.customer_name_lower().contains(term) || record.phone_number_lower().contains(term)
}

/// `tags` is [`SalesFilters::normalized_tags`], hoisted out of the per-record loop
pub fn filters_match(filters: &SalesFilters, tags: &[String], record: &SaleRecord) -> bool {
    for (field, allowed) in filters.list_filters() {
        if allowed.is_empty() {
            continue;
        }
        let value = record.text(field).unwrap_or("");
        if !allowed.iter().any(|a| a == value) {
            return false;
        }
    }

    if !tags.is_empty() {
        let hit = record
            .tag_list()
            .iter()
            .any(|t| tags.contains(&t.to_lowercase()));
        if !hit {
            return false;
        }
    }

    filters.age_matches(record.age) && filters.date_matches(record.sale_date())
}

/// Sort in place; ties always break by ascending id
pub fn sort_records(records: &mut [&SaleRecord], sort: SortKey) {
    match sort {
        // unparsable dates go last in both directions
        SortKey::DateNewest => records.sort_by_cached_key(|r| {
            let date = r.sale_date();
            (date.is_none(), Reverse(date), r.id)
        }),
        SortKey::DateOldest => records.sort_by_cached_key(|r| {
            let date = r.sale_date();
            (date.is_none(), date, r.id)
        }),
        SortKey::QuantityHigh => records.sort_by_key(|r| (Reverse(r.quantity), r.id)),
        SortKey::QuantityLow => records.sort_by_key(|r| (r.quantity, r.id)),
        SortKey::AmountHigh => records.sort_by(|a, b| {
            b.final_amount
                .total_cmp(&a.final_amount)
                .then(a.id.cmp(&b.id))
        }),
        SortKey::CustomerAz => records.sort_by_cached_key(|r| (r.customer_name_lower(), r.id)),
        SortKey::CustomerZa => {
            records.sort_by_cached_key(|r| (Reverse(r.customer_name_lower()), r.id))
        }
        SortKey::IdDesc => records.sort_by_key(|r| Reverse(r.id)),
    }
}

/// Slice out one page; out-of-range pages are empty
pub fn paginate<T>(items: Vec<T>, window: PageWindow) -> Vec<T> {
    let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
    items
        .into_iter()
        .skip(offset)
        .take(window.limit as usize)
        .collect()
}
