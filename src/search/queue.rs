//! Capacity-bounded priority queue of scored descriptions.
//!
//! Retrieval pops the highest quality first. Admission compares against the
//! lowest quality held: once the queue is full, an item only gets in by
//! beating the current minimum, which is then evicted.
//!
//! NaN qualities rank below every real number. They are admitted while there
//! is spare room, are the first to be evicted, and pop last.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::condition::Description;

/// A description together with its quality score.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub description: Description,
    pub quality: f64,
}

impl Item {
    pub fn new(description: Description, quality: f64) -> Self {
        Item {
            description,
            quality,
        }
    }
}

/// Order on quality with NaN at the bottom.
fn rank(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Heap entry; max-heap on quality.
#[derive(Debug)]
struct Ranked(Item);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank(self.0.quality, other.0.quality)
    }
}

/// Max-heap on quality holding at most `capacity` items.
///
/// Capacity 0 rejects every push.
#[derive(Debug)]
pub struct BoundedPriorityQueue {
    heap: BinaryHeap<Ranked>,
    capacity: usize,
}

impl BoundedPriorityQueue {
    pub fn new(capacity: usize) -> Self {
        BoundedPriorityQueue {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    /// Offer `item`. Returns whether it was admitted.
    pub fn push(&mut self, item: Item) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(Ranked(item));
            return true;
        }
        if self.capacity == 0 {
            return false;
        }

        let mut items = std::mem::take(&mut self.heap).into_vec();
        let min = items
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(i, _)| i);

        let admitted = match min {
            Some(i) if rank(item.quality, items[i].0.quality) == Ordering::Greater => {
                items.swap_remove(i);
                items.push(Ranked(item));
                true
            }
            _ => false,
        };
        self.heap = BinaryHeap::from(items);
        admitted
    }

    /// Remove and return the highest-quality item.
    pub fn pop_max(&mut self) -> Option<Item> {
        self.heap.pop().map(|r| r.0)
    }

    /// Quality of the item [`pop_max`](Self::pop_max) would return.
    pub fn peek_quality(&self) -> Option<f64> {
        self.heap.peek().map(|r| r.0.quality)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Pop everything, highest quality first.
    pub fn drain_sorted(&mut self) -> Vec<Item> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.pop_max() {
            out.push(item);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(q: f64) -> Item {
        Item::new(Description::empty(), q)
    }

    fn qualities(q: &mut BoundedPriorityQueue) -> Vec<f64> {
        q.drain_sorted().into_iter().map(|i| i.quality).collect()
    }

    #[test]
    fn keeps_top_capacity_items() {
        let mut q = BoundedPriorityQueue::new(3);
        for v in [0.5, 0.1, 0.9, 0.3, 0.7, 0.2] {
            q.push(item(v));
            assert!(q.len() <= 3);
        }
        assert_eq!(qualities(&mut q), [0.9, 0.7, 0.5]);
    }

    #[test]
    fn full_queue_rejects_items_not_above_minimum() {
        let mut q = BoundedPriorityQueue::new(2);
        assert!(q.push(item(0.4)));
        assert!(q.push(item(0.6)));
        assert!(!q.push(item(0.4)), "equal to minimum is dropped");
        assert!(!q.push(item(0.1)));
        assert!(q.push(item(0.5)));
        assert_eq!(qualities(&mut q), [0.6, 0.5]);
    }

    #[test]
    fn pops_non_increasing() {
        let mut q = BoundedPriorityQueue::new(10);
        for v in [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0] {
            q.push(item(v));
        }
        let out = qualities(&mut q);
        assert!(out.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(out.len(), 8);
        assert!(q.is_empty());
    }

    #[test]
    fn zero_capacity_rejects_everything() {
        let mut q = BoundedPriorityQueue::new(0);
        assert!(!q.push(item(1.0)));
        assert!(!q.push(item(f64::NAN)));
        assert_eq!(q.len(), 0);
        assert!(q.pop_max().is_none());
    }

    #[test]
    fn nan_ranks_below_real_qualities() {
        let mut q = BoundedPriorityQueue::new(2);
        assert!(q.push(item(f64::NAN)), "spare room admits NaN");
        assert!(q.push(item(0.0)));
        assert!(q.push(item(0.2)), "NaN is evicted first");
        assert!(!q.push(item(f64::NAN)), "NaN never beats a real minimum");
        assert_eq!(qualities(&mut q), [0.2, 0.0]);

        let mut q = BoundedPriorityQueue::new(3);
        q.push(item(f64::NAN));
        q.push(item(0.1));
        let out = qualities(&mut q);
        assert_eq!(out[0], 0.1);
        assert!(out[1].is_nan());
    }
}
