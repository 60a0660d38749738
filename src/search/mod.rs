//! Free-text filtering over already-fetched list results.
//!
//! Equality filters narrow the SQL query; the `q` parameter narrows the
//! fetched rows afterwards with a case-insensitive substring match.

/// A record that can be matched against a free-text query.
pub trait TextSearchable {
    /// Text fields the query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Normalize a raw `q` parameter; blank queries disable the filter.
pub fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Whether any search field contains the (already lowercased) needle.
pub fn matches<T: TextSearchable>(item: &T, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Keep only the items matching `query`, preserving order.
pub fn filter_by_text<T: TextSearchable>(items: Vec<T>, query: Option<&str>) -> Vec<T> {
    match normalize_query(query) {
        Some(needle) => items
            .into_iter()
            .filter(|item| matches(item, &needle))
            .collect(),
        None => items,
    }
}
