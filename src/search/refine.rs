use std::collections::BTreeSet;

use log::debug;

use super::cache::PartitionCache;
use super::condition::{Condition, Description, Predicate, ThresholdMode};
use super::RefinementOperator;
use crate::data::model::{Attribute, AttributeKind, AttributeValue, Dataset};
use crate::error::{DiscoveryError, Result};

/// Split points for a numeric attribute.
///
/// Takes the distinct values, sorted ascending, and with
/// `n = min(bins, distinct)` returns the values at positions `1..=n-2`.
/// The smallest and largest observed values are never split points, so
/// fewer than three distinct values give none.
pub fn numeric_splits(mut values: Vec<f64>, bins: usize) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b).is_eq());

    let n = bins.min(values.len());
    values
        .get(1..n.saturating_sub(1))
        .map(<[f64]>::to_vec)
        .unwrap_or_default()
}

/// Refines a description by one condition on each attribute it does not use
/// yet, drawing candidate values from the records it currently matches.
pub struct AttributeRefinement<'a> {
    dataset: &'a Dataset,
    cache: &'a PartitionCache,
    bins: usize,
}

impl<'a> AttributeRefinement<'a> {
    pub fn new(dataset: &'a Dataset, cache: &'a PartitionCache, bins: usize) -> Self {
        AttributeRefinement {
            dataset,
            cache,
            bins,
        }
    }

    /// Present values of `column` among `rows`, checked against the schema kind.
    fn observed(&self, column: usize, attr: &Attribute, rows: &[usize]) -> Result<Vec<&AttributeValue>> {
        let mut out = Vec::with_capacity(rows.len());
        for &i in rows {
            let Some(value) = self.dataset.records[i].get(column) else {
                continue;
            };
            if value.kind() != attr.kind {
                return Err(DiscoveryError::KindMismatch {
                    attribute: attr.name.clone(),
                    expected: attr.kind,
                    found: value.kind().to_string(),
                });
            }
            out.push(value);
        }
        Ok(out)
    }

    fn candidates(&self, column: usize, attr: &Attribute, rows: &[usize]) -> Result<Vec<Predicate>> {
        let out = match attr.kind {
            AttributeKind::Boolean => vec![Predicate::BoolEquals(true), Predicate::BoolEquals(false)],
            AttributeKind::Categorical => {
                let seen: BTreeSet<&str> = self
                    .observed(column, attr, rows)?
                    .into_iter()
                    .filter_map(AttributeValue::as_str)
                    .collect();
                seen.into_iter()
                    .flat_map(|value| {
                        [false, true].map(|negate| Predicate::CategoryEquals {
                            value: value.to_string(),
                            negate,
                        })
                    })
                    .collect()
            }
            AttributeKind::Numeric => {
                let values = self
                    .observed(column, attr, rows)?
                    .into_iter()
                    .filter_map(AttributeValue::as_f64)
                    .collect();
                numeric_splits(values, self.bins)
                    .into_iter()
                    .flat_map(|value| {
                        [ThresholdMode::Above, ThresholdMode::Below]
                            .map(|mode| Predicate::Threshold { value, mode })
                    })
                    .collect()
            }
        };
        Ok(out)
    }
}

impl RefinementOperator for AttributeRefinement<'_> {
    fn refine(&self, description: &Description) -> Result<Vec<Description>> {
        let subgroup = self.cache.partition(self.dataset, description);
        let mut out = Vec::new();

        for (column, attr) in self.dataset.schema.attributes().iter().enumerate() {
            if description.uses(column) || self.dataset.is_target(&attr.name) {
                continue;
            }
            for predicate in self.candidates(column, attr, &subgroup.matching)? {
                out.push(description.refined(Condition::at(column, &attr.name, predicate)));
            }
        }

        debug!(
            "refined [{description}] over {} records into {} children",
            subgroup.matching.len(),
            out.len()
        );
        Ok(out)
    }
}
