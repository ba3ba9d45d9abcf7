//! Attribute Values and Kind Conversion
//!
//! Well and marker attributes are typed scalars. Instead of choosing a typed
//! accessor at runtime, every value is an [`AttributeValue`] and conversion
//! between kinds is a single match on `(value, target kind)`.
//!
//! ## Undefined values
//!
//! - `Integer`: [`UNDEFINED_DISCRETE`] (`i32::MIN`)
//! - `Real`: `NaN`
//! - `Text`: empty string
//!
//! Undefined converts to undefined of the target kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel stored in discrete attributes for "no value".
pub const UNDEFINED_DISCRETE: i32 = i32::MIN;

// ============================================================================
// Descriptors
// ============================================================================

/// Scalar kind carried by an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Integer,
    Real,
    Text,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Integer => write!(f, "integer"),
            AttributeKind::Real => write!(f, "real"),
            AttributeKind::Text => write!(f, "text"),
        }
    }
}

/// Discrete attributes hold codes from a dictionary, continuous ones hold measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeRole {
    Discrete,
    Continuous,
}

/// Which entity an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeScope {
    Well,
    Marker,
}

/// Declared shape of an attribute, looked up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub scope: AttributeScope,
    pub role: AttributeRole,
    pub kind: AttributeKind,
    /// Shared template (dictionary or measurement type), e.g. "Facies" or "Porosity".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl AttributeDescriptor {
    pub fn new(
        name: impl Into<String>,
        scope: AttributeScope,
        role: AttributeRole,
        kind: AttributeKind,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            role,
            kind,
            template: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Integer discrete attributes are the only ones usable as well filters.
    pub fn is_discrete_integer(&self) -> bool {
        self.role == AttributeRole::Discrete && self.kind == AttributeKind::Integer
    }

    /// Marker-scoped counterpart used when copying this well attribute onto tops.
    ///
    /// Integer discrete and real continuous attributes keep their template;
    /// every other combination falls back to the bare native kind.
    pub fn marker_counterpart(&self) -> AttributeDescriptor {
        let template = match (self.role, self.kind) {
            (AttributeRole::Discrete, AttributeKind::Integer)
            | (AttributeRole::Continuous, AttributeKind::Real) => self.template.clone(),
            _ => None,
        };
        AttributeDescriptor {
            name: self.name.clone(),
            scope: AttributeScope::Marker,
            role: self.role,
            kind: self.kind,
            template,
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A typed scalar attribute value.
///
/// Serialized untagged: `3` reads as `Integer`, `3.5` as `Real`, `"x"` as `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i32),
    Real(f64),
    Text(String),
}

/// Failure converting a value between kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("value {value} is out of range for {to}")]
    OutOfRange { value: f64, to: AttributeKind },

    #[error("cannot parse '{text}' as {to}")]
    Unparsable { text: String, to: AttributeKind },
}

impl AttributeValue {
    /// The "no value" marker of a kind.
    pub fn undefined(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Integer => AttributeValue::Integer(UNDEFINED_DISCRETE),
            AttributeKind::Real => AttributeValue::Real(f64::NAN),
            AttributeKind::Text => AttributeValue::Text(String::new()),
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Integer(_) => AttributeKind::Integer,
            AttributeValue::Real(_) => AttributeKind::Real,
            AttributeValue::Text(_) => AttributeKind::Text,
        }
    }

    pub fn is_undefined(&self) -> bool {
        match self {
            AttributeValue::Integer(v) => *v == UNDEFINED_DISCRETE,
            AttributeValue::Real(v) => v.is_nan(),
            AttributeValue::Text(s) => s.is_empty(),
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            AttributeValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to another kind.
    ///
    /// Reals round half-to-even when narrowed to integers; text is trimmed
    /// before parsing.
    pub fn convert(&self, to: AttributeKind) -> Result<AttributeValue, ConversionError> {
        if self.is_undefined() {
            return Ok(AttributeValue::undefined(to));
        }

        match (self, to) {
            (AttributeValue::Integer(v), AttributeKind::Integer) => Ok(AttributeValue::Integer(*v)),
            (AttributeValue::Integer(v), AttributeKind::Real) => Ok(AttributeValue::Real(f64::from(*v))),
            (AttributeValue::Integer(v), AttributeKind::Text) => Ok(AttributeValue::Text(v.to_string())),

            (AttributeValue::Real(v), AttributeKind::Integer) => real_to_integer(*v),
            (AttributeValue::Real(v), AttributeKind::Real) => Ok(AttributeValue::Real(*v)),
            (AttributeValue::Real(v), AttributeKind::Text) => Ok(AttributeValue::Text(v.to_string())),

            (AttributeValue::Text(s), AttributeKind::Integer) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(AttributeValue::undefined(to));
                }
                trimmed
                    .parse::<i32>()
                    .ok()
                    .filter(|v| *v != UNDEFINED_DISCRETE)
                    .map(AttributeValue::Integer)
                    .ok_or_else(|| ConversionError::Unparsable { text: s.clone(), to })
            }
            (AttributeValue::Text(s), AttributeKind::Real) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(AttributeValue::undefined(to));
                }
                trimmed
                    .parse::<f64>()
                    .map(AttributeValue::Real)
                    .map_err(|_| ConversionError::Unparsable { text: s.clone(), to })
            }
            (AttributeValue::Text(s), AttributeKind::Text) => Ok(AttributeValue::Text(s.clone())),
        }
    }
}

fn real_to_integer(value: f64) -> Result<AttributeValue, ConversionError> {
    let rounded = value.round_ties_even();
    // i32::MIN is reserved for the undefined sentinel
    if !rounded.is_finite() || rounded <= f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(ConversionError::OutOfRange {
            value,
            to: AttributeKind::Integer,
        });
    }
    Ok(AttributeValue::Integer(rounded as i32))
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            return write!(f, "<undefined>");
        }
        match self {
            AttributeValue::Integer(v) => write!(f, "{v}"),
            AttributeValue::Real(v) => write!(f, "{v}"),
            AttributeValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
