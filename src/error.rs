use thiserror::Error;

use crate::data::model::AttributeKind;

/// Errors raised by the discovery engine and its configuration layer.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// An attribute name that is not part of the dataset schema.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A value (or column type) that does not fit the kind declared for an attribute.
    #[error("attribute {attribute}: expected {expected} value, found {found}")]
    KindMismatch {
        attribute: String,
        expected: AttributeKind,
        found: String,
    },

    /// An input column whose type has no attribute kind.
    #[error("attribute {attribute}: unsupported value type {found}")]
    UnsupportedType { attribute: String, found: String },

    /// The condition and outcome attributes must both be boolean.
    #[error("target attribute {0} must be boolean")]
    TargetNotBoolean(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
