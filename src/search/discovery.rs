use log::{debug, info, warn};

use super::beam::{beam_search, BeamParams};
use super::cache::PartitionCache;
use super::condition::Description;
use super::quality::YuleQuality;
use super::queue::Item;
use super::refine::AttributeRefinement;
use crate::config::SearchConfig;
use crate::data::model::Dataset;
use crate::error::{DiscoveryError, Result};

/// One discovery run over a dataset: Yule's Q quality, per-kind refinement
/// and a partition cache shared by both.
pub struct SubgroupDiscovery<'a> {
    dataset: &'a Dataset,
    params: BeamParams,
    bins: usize,
    condition: usize,
    outcome: usize,
    cache: PartitionCache,
}

impl<'a> SubgroupDiscovery<'a> {
    /// Prepare a run. `dataset` must already reserve every target in `config`
    /// (see [`SearchConfig::reserve_targets`]).
    pub fn new(dataset: &'a Dataset, config: &SearchConfig) -> Result<Self> {
        config.validate(&dataset.schema)?;
        if let Some(name) = config.target_names().into_iter().find(|n| !dataset.is_target(n)) {
            return Err(DiscoveryError::InvalidConfig(format!(
                "attribute {name} is a target but not reserved in the dataset"
            )));
        }

        let condition = dataset.schema.column(&config.condition)?;
        let outcome = dataset.schema.column(&config.outcome)?;

        let incomplete = dataset
            .records
            .iter()
            .filter(|r| r.get(condition).is_none() || r.get(outcome).is_none())
            .count();
        if incomplete > 0 {
            warn!(
                "{incomplete} of {} records have no {} or {} value and are left out of the association counts",
                dataset.len(),
                config.condition,
                config.outcome
            );
        }

        Ok(SubgroupDiscovery {
            dataset,
            params: config.beam_params(),
            bins: config.bins,
            condition,
            outcome,
            cache: PartitionCache::new(),
        })
    }

    /// Run the beam search and return the results, best first.
    ///
    /// # Errors
    /// A record value whose kind disagrees with the schema aborts the run.
    pub fn run(&self) -> Result<Vec<Item>> {
        info!(
            "starting beam search on {} rows of {} columns with {} targets",
            self.dataset.len(),
            self.dataset.schema.len(),
            self.dataset.targets.len()
        );
        info!(
            "width {}, depth {}, results {}, bins {}",
            self.params.width, self.params.depth, self.params.results, self.bins
        );

        let quality = YuleQuality::new(self.dataset, &self.cache, self.condition, self.outcome);
        let refinement = AttributeRefinement::new(self.dataset, &self.cache, self.bins);
        let mut results = beam_search(&quality, &refinement, &self.params)?;

        let (hits, misses) = self.cache.stats();
        debug!("partition cache: {hits} hits, {misses} misses");
        Ok(results.drain_sorted())
    }

    /// Number of records matching `description`.
    pub fn subgroup_size(&self, description: &Description) -> usize {
        self.cache.partition(self.dataset, description).matching.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AttributeValue::Bool;

    #[test]
    fn unreserved_target_is_rejected() {
        let ds = Dataset::from_columns(
            vec!["condition_1".into(), "clicked".into()],
            vec![vec![Some(Bool(true)), Some(Bool(true))]],
        )
        .unwrap();
        let err = SubgroupDiscovery::new(&ds, &SearchConfig::default()).err();
        assert!(matches!(err, Some(DiscoveryError::InvalidConfig(_))));
    }

    #[test]
    fn only_target_columns_yields_no_results() {
        let cfg = SearchConfig::default();
        let ds = cfg
            .reserve_targets(
                Dataset::from_columns(
                    vec!["condition_1".into(), "clicked".into()],
                    vec![vec![Some(Bool(true)), Some(Bool(false))]],
                )
                .unwrap(),
            )
            .unwrap();
        let run = SubgroupDiscovery::new(&ds, &cfg).unwrap();
        assert!(run.run().unwrap().is_empty());
        assert_eq!(run.subgroup_size(&Description::empty()), 1);
    }
}
