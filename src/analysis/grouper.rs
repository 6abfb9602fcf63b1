//! Cohort grouping.

use crate::models::GroupKey;
use std::collections::HashMap;

/// Measurements buffered per [`GroupKey`], in first-seen key order.
///
/// Items within a cohort keep their insertion order.
#[derive(Debug)]
pub struct Cohorts<T> {
    index: HashMap<GroupKey, usize>,
    cohorts: Vec<(GroupKey, Vec<T>)>,
}

impl<T> Default for Cohorts<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            cohorts: Vec::new(),
        }
    }
}

impl<T> Cohorts<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to its cohort, creating the cohort on first use.
    pub fn push(&mut self, key: GroupKey, item: T) {
        let slot = self.slot(key);
        self.cohorts[slot].1.push(item);
    }

    /// Make sure a cohort exists for `key`, even if nothing is ever pushed to it.
    pub fn touch(&mut self, key: GroupKey) {
        self.slot(key);
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    fn slot(&mut self, key: GroupKey) -> usize {
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.cohorts.len();
        self.index.insert(key.clone(), slot);
        self.cohorts.push((key, Vec::new()));
        slot
    }
}

impl<T> IntoIterator for Cohorts<T> {
    type Item = (GroupKey, Vec<T>);
    type IntoIter = std::vec::IntoIter<(GroupKey, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.cohorts.into_iter()
    }
}
