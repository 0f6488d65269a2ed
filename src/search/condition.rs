use std::fmt;

use crate::data::model::{AttributeKind, Schema};
use crate::error::{DiscoveryError, Result};

// ---------------------------------------------------------------------------
// Predicate – the kind-specific part of a condition
// ---------------------------------------------------------------------------

/// Which side of a numeric split a condition selects.
///
/// `Above` renders as `>=` but holds for values strictly below the split
/// point; `Below` renders as `<=` but holds for values strictly above it.
/// Both the rendering and the evaluation are kept as they are: existing
/// result files are keyed by the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThresholdMode {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `attr == value` on a boolean attribute.
    BoolEquals(bool),
    /// `attr == value`, or `attr != value` when `negate` is set.
    CategoryEquals { value: String, negate: bool },
    /// Numeric split at `value`; see [`ThresholdMode`].
    Threshold { value: f64, mode: ThresholdMode },
}

impl Predicate {
    /// The attribute kind this predicate applies to.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Predicate::BoolEquals(_) => AttributeKind::Boolean,
            Predicate::CategoryEquals { .. } => AttributeKind::Categorical,
            Predicate::Threshold { .. } => AttributeKind::Numeric,
        }
    }
}

// ---------------------------------------------------------------------------
// Condition – a predicate bound to one attribute
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    attribute: String,
    column: usize,
    predicate: Predicate,
}

impl Condition {
    /// Bind `predicate` to the attribute `name`, checking that the attribute
    /// exists and has the kind the predicate expects.
    pub fn new(schema: &Schema, name: &str, predicate: Predicate) -> Result<Self> {
        let column = schema.column(name)?;
        let kind = schema.attributes()[column].kind;
        if kind != predicate.kind() {
            return Err(DiscoveryError::KindMismatch {
                attribute: name.to_string(),
                expected: kind,
                found: predicate.kind().to_string(),
            });
        }
        Ok(Self::at(column, name, predicate))
    }

    /// Bind without schema checks. The caller guarantees `column` holds `attribute`.
    pub(crate) fn at(column: usize, attribute: &str, predicate: Predicate) -> Self {
        Condition {
            attribute: attribute.to_string(),
            column,
            predicate,
        }
    }

    pub fn boolean(schema: &Schema, name: &str, value: bool) -> Result<Self> {
        Self::new(schema, name, Predicate::BoolEquals(value))
    }

    pub fn category(schema: &Schema, name: &str, value: &str, negate: bool) -> Result<Self> {
        Self::new(
            schema,
            name,
            Predicate::CategoryEquals {
                value: value.to_string(),
                negate,
            },
        )
    }

    pub fn threshold(schema: &Schema, name: &str, value: f64, mode: ThresholdMode) -> Result<Self> {
        Self::new(schema, name, Predicate::Threshold { value, mode })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = &self.attribute;
        match &self.predicate {
            Predicate::BoolEquals(v) => write!(f, "{attr} == {v}"),
            Predicate::CategoryEquals { value, negate } => {
                let op = if *negate { "!=" } else { "==" };
                write!(f, "{attr} {op} {value}")
            }
            Predicate::Threshold { value, mode } => {
                let op = match mode {
                    ThresholdMode::Above => ">=",
                    ThresholdMode::Below => "<=",
                };
                write!(f, "{attr} {op} {value}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Description – an ordered conjunction of conditions
// ---------------------------------------------------------------------------

/// A conjunction of conditions, each on a distinct attribute.
///
/// The rendered form (conditions joined by `" AND "`, in order) is the
/// identity used for memoization, so the same conditions in a different
/// order form a different key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    conditions: Vec<Condition>,
}

impl Description {
    /// The empty description, matching every record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from conditions. Two conditions on the same attribute are rejected.
    pub fn from_conditions(conditions: Vec<Condition>) -> Result<Self> {
        let mut d = Description::empty();
        for c in conditions {
            if d.uses(c.column) {
                return Err(DiscoveryError::InvalidConfig(format!(
                    "attribute {} appears twice in one description",
                    c.attribute
                )));
            }
            d.conditions.push(c);
        }
        Ok(d)
    }

    /// A copy of `self` with `condition` appended last.
    pub fn refined(&self, condition: Condition) -> Self {
        let mut conditions = Vec::with_capacity(self.conditions.len() + 1);
        conditions.extend(self.conditions.iter().cloned());
        conditions.push(condition);
        Description { conditions }
    }

    /// Whether some condition already constrains `column`.
    pub fn uses(&self, column: usize) -> bool {
        self.conditions.iter().any(|c| c.column == column)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Canonical string used as the cache key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
