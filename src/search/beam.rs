use log::{debug, info};

use super::condition::Description;
use super::queue::{BoundedPriorityQueue, Item};
use super::{QualityMeasure, RefinementOperator};
use crate::error::Result;

/// Shape of a beam search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamParams {
    /// Descriptions carried from one level to the next.
    pub width: usize,
    /// Number of levels, i.e. the longest description produced.
    pub depth: usize,
    /// Capacity of the global result queue.
    pub results: usize,
}

/// Level-by-level beam search starting from the empty description.
///
/// Every child of every seed is scored once and offered to both the level
/// beam (capacity `width`) and the global result queue (capacity `results`);
/// each queue admits or drops it on its own. The drained beam seeds the next
/// level. Exactly `depth` levels run.
///
/// Returns the global result queue; pop it with
/// [`BoundedPriorityQueue::pop_max`] for descending quality.
///
/// # Errors
/// Whatever the refinement operator reports, which aborts the search.
pub fn beam_search<Q, R>(quality: &Q, refinement: &R, params: &BeamParams) -> Result<BoundedPriorityQueue>
where
    Q: QualityMeasure + ?Sized,
    R: RefinementOperator + ?Sized,
{
    let mut seeds = vec![Description::empty()];
    let mut results = BoundedPriorityQueue::new(params.results);

    for level in 0..params.depth {
        let mut beam = BoundedPriorityQueue::new(params.width);
        let mut scored = 0usize;

        for seed in &seeds {
            let children = refinement.refine(seed)?;
            debug!("level {level}: [{seed}] has {} children", children.len());

            for child in children {
                let score = quality.quality(&child);
                let item = Item::new(child, score);
                scored += 1;
                beam.push(item.clone());
                results.push(item);
            }
        }

        info!(
            "level {level}: scored {scored} descriptions from {} seeds, best {:?}",
            seeds.len(),
            beam.peek_quality()
        );
        seeds = beam.drain_sorted().into_iter().map(|i| i.description).collect();
    }

    Ok(results)
}
