// ── Filter/page projection ──
//
// Pure functions over an in-memory collection. Recomputed on every query
// or page change; nothing here is cached or persisted.

use std::sync::Arc;

use serde::Serialize;

use crate::entities::Entity;

/// The user-controlled inputs of a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub query: String,
    pub page: usize,
    pub page_size: usize,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: String::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }
}

/// One rendered page of a collection.
#[derive(Debug, Clone)]
pub struct ListView<E> {
    pub query: String,
    pub page: usize,
    pub page_size: usize,
    /// Records in the whole collection.
    pub total: usize,
    /// Records matching the query.
    pub matching: usize,
    /// Always at least 1, even for an empty result.
    pub page_count: usize,
    pub rows: Vec<Arc<E>>,
}

impl<E: Entity> ListView<E> {
    pub fn build(records: &[Arc<E>], state: &ViewState) -> Self {
        let matching = filter(records, &state.query);
        let page_count = page_count(matching.len(), state.page_size);
        let page = state.page.min(page_count - 1);
        let rows = window(&matching, page, state.page_size)
            .iter()
            .map(|r| Arc::clone(r))
            .collect();
        Self {
            query: state.query.clone(),
            page,
            page_size: state.page_size,
            total: records.len(),
            matching: matching.len(),
            page_count,
            rows,
        }
    }
}

/// Records whose text fields contain `query`, ignoring case. An empty
/// query matches everything. Order is preserved.
pub fn filter<'a, E: Entity>(records: &'a [Arc<E>], query: &str) -> Vec<&'a Arc<E>> {
    if query.is_empty() {
        return records.iter().collect();
    }
    let needle = query.to_lowercase();
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// `max(1, ceil(len / size))`.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Highest valid page for `len` items.
pub fn last_page(len: usize, page_size: usize) -> usize {
    page_count(len, page_size) - 1
}

/// `items[page*size .. page*size+size]`, truncated at the end.
pub fn window<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}
