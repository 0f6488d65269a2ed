use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::error::{DiscoveryError, Result};

// ---------------------------------------------------------------------------
// AttributeKind – the fixed type of a column
// ---------------------------------------------------------------------------

/// The kind of an attribute. Every attribute has exactly one kind for the
/// lifetime of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Boolean,
    Categorical,
    Numeric,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Boolean => write!(f, "boolean"),
            AttributeKind::Categorical => write!(f, "categorical"),
            AttributeKind::Numeric => write!(f, "numeric"),
        }
    }
}

// ---------------------------------------------------------------------------
// AttributeValue – a single non-null cell
// ---------------------------------------------------------------------------

/// A present cell value. Absent cells are `None` in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Categorical(String),
    Numeric(f64),
}

impl AttributeValue {
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Bool(_) => AttributeKind::Boolean,
            AttributeValue::Categorical(_) => AttributeKind::Categorical,
            AttributeValue::Numeric(_) => AttributeKind::Numeric,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Categorical(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Numeric(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Categorical(s) => write!(f, "{s}"),
            AttributeValue::Numeric(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – attribute name → column index and kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

/// Ordered attribute list with a name index built once at load time.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        let mut index = HashMap::with_capacity(attributes.len());
        for (i, attr) in attributes.iter().enumerate() {
            if index.insert(attr.name.clone(), i).is_some() {
                return Err(DiscoveryError::InvalidConfig(format!(
                    "duplicate attribute {}",
                    attr.name
                )));
            }
        }
        Ok(Schema { attributes, index })
    }

    /// Column index of `name`, if the schema has it.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Like [`Schema::index_of`] but unknown names are an error.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| DiscoveryError::UnknownAttribute(name.to_string()))
    }

    pub fn kind_of(&self, name: &str) -> Option<AttributeKind> {
        self.index_of(name).map(|i| self.attributes[i].kind)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// One row: an optional value per schema column, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<Option<AttributeValue>>,
}

impl Record {
    pub fn new(values: Vec<Option<AttributeValue>>) -> Self {
        Record { values }
    }

    /// Value at `column`; `None` when null or out of range.
    pub fn get(&self, column: usize) -> Option<&AttributeValue> {
        self.values.get(column).and_then(Option::as_ref)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full in-memory table. Read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
    /// Attributes reserved for the quality measure, never refined on.
    pub targets: BTreeSet<String>,
}

impl Dataset {
    /// Build a dataset from column names and row-major cells, inferring the
    /// kind of each column from its non-null values.
    ///
    /// A column mixing kinds is a [`DiscoveryError::KindMismatch`]. A column
    /// with no values at all is treated as categorical.
    pub fn from_columns(names: Vec<String>, rows: Vec<Vec<Option<AttributeValue>>>) -> Result<Self> {
        let mut kinds: Vec<Option<AttributeKind>> = vec![None; names.len()];

        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(DiscoveryError::InvalidConfig(format!(
                    "row {row_no} has {} values but the table has {} columns",
                    row.len(),
                    names.len()
                )));
            }
            for (col, value) in row.iter().enumerate() {
                let Some(value) = value else { continue };
                match kinds[col] {
                    None => kinds[col] = Some(value.kind()),
                    Some(kind) if kind != value.kind() => {
                        return Err(DiscoveryError::KindMismatch {
                            attribute: names[col].clone(),
                            expected: kind,
                            found: value.kind().to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let attributes = names
            .into_iter()
            .zip(kinds)
            .map(|(name, kind)| Attribute {
                name,
                kind: kind.unwrap_or(AttributeKind::Categorical),
            })
            .collect();

        Ok(Dataset {
            schema: Schema::new(attributes)?,
            records: rows.into_iter().map(Record::new).collect(),
            targets: BTreeSet::new(),
        })
    }

    /// Build a dataset from name → value maps. Columns are the union of all
    /// keys in sorted order; a missing key is a null cell.
    pub fn from_maps(rows: Vec<BTreeMap<String, Option<AttributeValue>>>) -> Result<Self> {
        let names: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let cells = rows
            .into_iter()
            .map(|mut row| {
                names
                    .iter()
                    .map(|name| row.remove(name).flatten())
                    .collect()
            })
            .collect();

        Self::from_columns(names, cells)
    }

    /// Reserve `targets` for the quality measure. Every name must be in the schema.
    pub fn with_targets<I, S>(mut self, targets: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in targets {
            let name = name.into();
            self.schema.column(&name)?;
            self.targets.insert(name);
        }
        Ok(self)
    }

    pub fn is_target(&self, name: &str) -> bool {
        self.targets.contains(name)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(v: bool) -> Option<AttributeValue> {
        Some(AttributeValue::Bool(v))
    }

    #[test]
    fn infers_kinds_from_first_present_value() {
        let ds = Dataset::from_columns(
            vec!["flag".into(), "city".into(), "age".into()],
            vec![
                vec![None, Some(AttributeValue::Categorical("Oslo".into())), None],
                vec![b(true), None, Some(AttributeValue::Numeric(31.0))],
            ],
        )
        .unwrap();

        assert_eq!(ds.schema.kind_of("flag"), Some(AttributeKind::Boolean));
        assert_eq!(ds.schema.kind_of("city"), Some(AttributeKind::Categorical));
        assert_eq!(ds.schema.kind_of("age"), Some(AttributeKind::Numeric));
        assert_eq!(ds.len(), 2);
        assert!(ds.records[0].get(0).is_none());
    }

    #[test]
    fn mixed_column_is_kind_mismatch() {
        let err = Dataset::from_columns(
            vec!["x".into()],
            vec![vec![b(true)], vec![Some(AttributeValue::Numeric(1.0))]],
        )
        .unwrap_err();
        assert!(matches!(err, DiscoveryError::KindMismatch { .. }));
    }

    #[test]
    fn all_null_column_is_categorical() {
        let ds = Dataset::from_columns(vec!["empty".into()], vec![vec![None], vec![None]]).unwrap();
        assert_eq!(ds.schema.kind_of("empty"), Some(AttributeKind::Categorical));
    }

    #[test]
    fn from_maps_uses_sorted_union_of_keys() {
        let mut r1 = BTreeMap::new();
        r1.insert("b".to_string(), b(true));
        let mut r2 = BTreeMap::new();
        r2.insert("a".to_string(), Some(AttributeValue::Numeric(2.0)));

        let ds = Dataset::from_maps(vec![r1, r2]).unwrap();
        let names: Vec<_> = ds.schema.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(ds.records[0].get(0).is_none());
        assert_eq!(ds.records[1].get(0), Some(&AttributeValue::Numeric(2.0)));
    }

    #[test]
    fn unknown_target_is_rejected() {
        let ds = Dataset::from_columns(vec!["a".into()], vec![vec![b(true)]]).unwrap();
        let err = ds.with_targets(["missing"]).unwrap_err();
        assert!(matches!(err, DiscoveryError::UnknownAttribute(name) if name == "missing"));
    }
}
