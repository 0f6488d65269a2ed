/// Search layer: descriptions, scoring, refinement and the beam driver.
///
/// Architecture:
/// ```text
///   empty description
///        │
///        ▼
///   ┌────────────┐     ┌──────────────┐
///   │   refine    │ ──▶ │   quality     │  score each child
///   └────────────┘     └──────────────┘
///        ▲                    │
///        │                    ▼
///   ┌────────────┐     ┌──────────────┐
///   │ beam (width)│ ◀── │ results (top-K)│
///   └────────────┘     └──────────────┘
/// ```
///
/// The beam driver only sees the two traits below; [`discovery`] binds them
/// to a dataset with Yule's Q scoring and per-kind refinement.

pub mod beam;
pub mod cache;
pub mod condition;
pub mod discovery;
pub mod quality;
pub mod queue;
pub mod refine;

use crate::error::Result;
use condition::Description;

/// Scores a description. Higher is better.
pub trait QualityMeasure {
    fn quality(&self, description: &Description) -> f64;
}

/// Produces the one-condition-longer children of a description.
pub trait RefinementOperator {
    fn refine(&self, description: &Description) -> Result<Vec<Description>>;
}

impl<F> QualityMeasure for F
where
    F: Fn(&Description) -> f64,
{
    fn quality(&self, description: &Description) -> f64 {
        self(description)
    }
}

impl<F> RefinementOperator for F
where
    F: Fn(&Description) -> Result<Vec<Description>>,
{
    fn refine(&self, description: &Description) -> Result<Vec<Description>> {
        self(description)
    }
}
