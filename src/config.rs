use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::model::{AttributeKind, Dataset, Schema};
use crate::error::{DiscoveryError, Result};
use crate::search::beam::BeamParams;

/// Attributes reserved for the quality measure.
///
/// Accepts either a plain list or a map of flags (`{"clicked": true}`); in
/// the map form every key is reserved whatever its flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSpec {
    List(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

impl Default for TargetSpec {
    fn default() -> Self {
        TargetSpec::List(Vec::new())
    }
}

impl TargetSpec {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let (list, flags) = match self {
            TargetSpec::List(v) => (Some(v), None),
            TargetSpec::Flags(m) => (None, Some(m)),
        };
        list.into_iter()
            .flatten()
            .map(String::as_str)
            .chain(flags.into_iter().flat_map(|m| m.keys().map(String::as_str)))
    }
}

/// Parameters of one discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Beam width.
    pub width: usize,
    /// Search depth (maximum conditions per description).
    pub depth: usize,
    /// Number of results kept.
    pub results: usize,
    /// Upper bound on numeric split candidates per attribute and node.
    pub bins: usize,
    /// Boolean attribute whose association with `outcome` is measured.
    pub condition: String,
    /// Boolean outcome attribute.
    pub outcome: String,
    /// Further attributes excluded from refinement.
    pub targets: TargetSpec,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            width: 10,
            depth: 3,
            results: 10,
            bins: 5,
            condition: "condition_1".to_string(),
            outcome: "clicked".to_string(),
            targets: TargetSpec::default(),
        }
    }
}

impl SearchConfig {
    /// Every reserved attribute: `targets` plus the condition and outcome.
    pub fn target_names(&self) -> BTreeSet<String> {
        self.targets
            .names()
            .map(str::to_string)
            .chain([self.condition.clone(), self.outcome.clone()])
            .collect()
    }

    pub fn beam_params(&self) -> BeamParams {
        BeamParams {
            width: self.width,
            depth: self.depth,
            results: self.results,
        }
    }

    /// Check the configuration against `schema`.
    ///
    /// Width and results may be 0 (every candidate is dropped); bins may not.
    pub fn validate(&self, schema: &Schema) -> Result<()> {
        if self.bins == 0 {
            return Err(DiscoveryError::InvalidConfig("bins must be at least 1".into()));
        }
        for name in [&self.condition, &self.outcome] {
            match schema.kind_of(name) {
                None => return Err(DiscoveryError::UnknownAttribute(name.clone())),
                Some(AttributeKind::Boolean) => {}
                Some(_) => return Err(DiscoveryError::TargetNotBoolean(name.clone())),
            }
        }
        for name in self.targets.names() {
            schema.column(name)?;
        }
        Ok(())
    }

    /// Validate against `dataset` and reserve every target attribute in it.
    pub fn reserve_targets(&self, dataset: Dataset) -> Result<Dataset> {
        self.validate(&dataset.schema)?;
        dataset.with_targets(self.target_names())
    }
}
