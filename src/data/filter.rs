use super::model::{AttributeValue, Dataset, Record};
use crate::search::condition::{Condition, Description, Predicate, ThresholdMode};

// ---------------------------------------------------------------------------
// Record matching
// ---------------------------------------------------------------------------

/// Whether `record` satisfies a single condition.
///
/// A null cell never satisfies anything, and neither does a cell whose value
/// is of a different kind than the predicate expects.
pub fn condition_holds(condition: &Condition, record: &Record) -> bool {
    let Some(value) = record.get(condition.column()) else {
        return false;
    };

    match (condition.predicate(), value) {
        (Predicate::BoolEquals(want), AttributeValue::Bool(got)) => want == got,
        (Predicate::CategoryEquals { value: want, negate }, AttributeValue::Categorical(got)) => {
            (want == got) != *negate
        }
        (Predicate::Threshold { value: split, mode }, AttributeValue::Numeric(x)) => match mode {
            ThresholdMode::Above => x < split,
            ThresholdMode::Below => x > split,
        },
        _ => false,
    }
}

/// A record matches a description when every condition holds. The empty
/// description matches everything.
pub fn matches(description: &Description, record: &Record) -> bool {
    description
        .conditions()
        .iter()
        .all(|c| condition_holds(c, record))
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Record indices split by whether they match a description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub matching: Vec<usize>,
    pub non_matching: Vec<usize>,
}

/// Split every record of `dataset` into matching and non-matching indices.
pub fn partition(dataset: &Dataset, description: &Description) -> Partition {
    let mut out = Partition::default();
    for (i, record) in dataset.records.iter().enumerate() {
        if matches(description, record) {
            out.matching.push(i);
        } else {
            out.non_matching.push(i);
        }
    }
    out
}
