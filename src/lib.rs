//! Subgroup discovery by beam search.
//!
//! Given a table of boolean, categorical and numeric attributes, find the
//! conjunctive descriptions whose subgroup shows the strongest difference in
//! condition ↔ outcome association compared to the rest of the data.

pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod search;

pub use config::{SearchConfig, TargetSpec};
pub use data::model::{AttributeKind, AttributeValue, Dataset, Record, Schema};
pub use error::{DiscoveryError, Result};
pub use search::beam::{beam_search, BeamParams};
pub use search::condition::{Condition, Description, Predicate, ThresholdMode};
pub use search::discovery::SubgroupDiscovery;
pub use search::queue::{BoundedPriorityQueue, Item};
