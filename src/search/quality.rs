//! Subgroup quality: how differently the condition ↔ outcome association
//! behaves inside a subgroup compared to outside it.
//!
//! ```text
//! quality(d) = |Q(matching) − Q(non-matching)| × H(|matching| / |all|)
//! ```
//!
//! `Q` is Yule's Q on the 2×2 condition/outcome table and `H` the binary
//! entropy of the split. Zero denominators yield NaN and are left that way.

use super::cache::PartitionCache;
use super::condition::Description;
use super::QualityMeasure;
use crate::data::model::Dataset;

/// 2×2 counts over (condition, outcome).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Contingency {
    /// condition true, outcome false
    pub n1: f64,
    /// condition true, outcome true
    pub n2: f64,
    /// condition false, outcome false
    pub n3: f64,
    /// condition false, outcome true
    pub n4: f64,
}

impl Contingency {
    /// Tabulate the records at `indices`. Records with a null condition or
    /// outcome are not counted.
    pub fn tabulate(dataset: &Dataset, indices: &[usize], condition: usize, outcome: usize) -> Self {
        let mut t = Contingency::default();
        for &i in indices {
            let record = &dataset.records[i];
            let (Some(c), Some(o)) = (
                record.get(condition).and_then(|v| v.as_bool()),
                record.get(outcome).and_then(|v| v.as_bool()),
            ) else {
                continue;
            };
            match (c, o) {
                (true, false) => t.n1 += 1.0,
                (true, true) => t.n2 += 1.0,
                (false, false) => t.n3 += 1.0,
                (false, true) => t.n4 += 1.0,
            }
        }
        t
    }

    /// Yule's Q, `(n1·n4 − n2·n3) / (n1·n4 + n2·n3)`. NaN when both products are 0.
    pub fn yules_q(&self) -> f64 {
        let ad = self.n1 * self.n4;
        let bc = self.n2 * self.n3;
        (ad - bc) / (ad + bc)
    }
}

/// Binary entropy (natural log) of a split where `matching` of `total`
/// records fall on one side. `0·ln 0` counts as 0; an empty total is NaN.
pub fn split_entropy(matching: usize, total: usize) -> f64 {
    let p = matching as f64 / total as f64;
    let p_bar = (total - matching) as f64 / total as f64;
    entropy_term(p) + entropy_term(p_bar)
}

fn entropy_term(p: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        -p * p.ln()
    }
}

/// Yule's Q gap weighted by split entropy, over the partitions in a shared cache.
pub struct YuleQuality<'a> {
    dataset: &'a Dataset,
    cache: &'a PartitionCache,
    condition: usize,
    outcome: usize,
}

impl<'a> YuleQuality<'a> {
    /// `condition` and `outcome` are column indices of boolean attributes.
    pub fn new(dataset: &'a Dataset, cache: &'a PartitionCache, condition: usize, outcome: usize) -> Self {
        YuleQuality {
            dataset,
            cache,
            condition,
            outcome,
        }
    }
}

impl QualityMeasure for YuleQuality<'_> {
    fn quality(&self, description: &Description) -> f64 {
        let split = self.cache.partition(self.dataset, description);

        let inside = Contingency::tabulate(self.dataset, &split.matching, self.condition, self.outcome);
        let outside = Contingency::tabulate(self.dataset, &split.non_matching, self.condition, self.outcome);
        let gap = (inside.yules_q() - outside.yules_q()).abs();

        gap * split_entropy(split.matching.len(), self.dataset.len())
    }
}
