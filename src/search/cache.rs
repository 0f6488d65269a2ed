use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use super::condition::Description;
use crate::data::filter::{partition, Partition};
use crate::data::model::Dataset;

/// Memoized record partitions keyed by a description's canonical string.
///
/// Owned by one search run over one dataset; entries are never invalidated.
/// Not `Sync`: a parallel driver needs one cache per worker or a lock.
#[derive(Debug, Default)]
pub struct PartitionCache {
    entries: RefCell<HashMap<String, Rc<Partition>>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl PartitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition of `dataset` by `description`, computed on first request.
    pub fn partition(&self, dataset: &Dataset, description: &Description) -> Rc<Partition> {
        let key = description.key();
        if let Some(p) = self.entries.borrow().get(&key) {
            self.hits.set(self.hits.get() + 1);
            return Rc::clone(p);
        }

        self.misses.set(self.misses.get() + 1);
        trace!("partitioning records for [{key}]");
        let p = Rc::new(partition(dataset, description));
        self.entries.borrow_mut().insert(key, Rc::clone(&p));
        p
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.get(), self.misses.get())
    }
}
