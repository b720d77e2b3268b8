//! Administrator-defined custom ordering.
//!
//! Entity listings, field lists and relation lists all share one ordering
//! primitive so that tie-breaking is identical everywhere.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Reorder `items` in place according to `order`.
///
/// Items whose key appears in `order` move to the front, ordered by their
/// position in `order`. Items whose key is absent keep their original relative
/// order and follow the ordered ones. If a key is listed more than once, its
/// first position counts. Items sharing a key keep their relative order.
pub fn sort_by_list<T, S, F>(items: &mut [T], order: &[S], key: F)
where
    S: AsRef<str>,
    F: Fn(&T) -> &str,
{
    if order.is_empty() {
        return;
    }

    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    for (index, name) in order.iter().enumerate() {
        positions.entry(name.as_ref()).or_insert(index);
    }

    // `sort_by_key` is stable, so absent items (all mapped to usize::MAX)
    // retain their relative order.
    items.sort_by_key(|item| positions.get(key(item)).copied().unwrap_or(usize::MAX));
}

/// Alphabetical comparison of display names, ignoring case.
///
/// Names equal up to case order lower-case first (`alpha` before `Alpha`), so
/// the result is total and deterministic.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
