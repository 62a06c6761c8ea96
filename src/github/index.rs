//! Grouping of aggregated entities by a domain attribute (label name,
//! milestone title) with first-seen key order preserved.

use std::collections::HashMap;

/// Sentinel group key for issues that carry no milestone.
pub const NO_MILESTONE: &str = "(no milestone)";

/// A grouping keyed by string attribute. Keys iterate in first-seen order;
/// repeated keys append in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Grouped<T> {
    keys: Vec<String>,
    groups: HashMap<String, Vec<T>>,
}

impl<T> Grouped<T> {
    pub fn new() -> Self {
        Grouped {
            keys: Vec::new(),
            groups: HashMap::new(),
        }
    }

    pub fn push(&mut self, key: String, item: T) {
        let group = self.groups.entry(key.clone()).or_insert_with(|| {
            self.keys.push(key);
            Vec::new()
        });
        group.push(item);
    }

    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate groups in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.keys
            .iter()
            .map(|key| (key.as_str(), self.groups[key].as_slice()))
    }
}

/// Build a `Grouped` from a flat sequence, keying each item with `key_fn`.
pub fn group_by<T, I, F>(items: I, key_fn: F) -> Grouped<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> String,
{
    let mut grouped = Grouped::new();
    for item in items {
        let key = key_fn(&item);
        grouped.push(key, item);
    }
    grouped
}
