//! Tagged representation of a taxonomy reference value.
//!
//! JSON reaching the wizard carries taxonomy references either as bare id
//! lists or as `{id, label}` objects, sometimes as a lone scalar or object.
//! The shape is resolved exactly once, when the JSON is parsed, into a
//! [`TaxonomyValue`]; nothing further down inspects raw JSON shapes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{TaxonomyId, TaxonomyItem};
use crate::domain::foundation::ValidationError;

/// A taxonomy reference in either its raw or hydrated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyValue {
    /// Bare identifiers.
    Raw(Vec<TaxonomyId>),
    /// Identifier plus display label.
    Hydrated(Vec<TaxonomyItem>),
}

impl TaxonomyValue {
    /// An empty value.
    pub fn empty() -> Self {
        TaxonomyValue::Raw(Vec::new())
    }

    /// Parses any JSON shape the backend or a form may produce.
    ///
    /// `field` is only used for error reporting.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null => Ok(Self::empty()),
            Value::Array(elements) => Self::from_elements(field, elements),
            Value::Object(_) => Ok(TaxonomyValue::Hydrated(vec![parse_item(field, value)?])),
            Value::String(_) | Value::Number(_) => {
                Ok(TaxonomyValue::Raw(parse_id(field, value)?.into_iter().collect()))
            }
            Value::Bool(_) => Err(ValidationError::invalid_format(
                field,
                "boolean is not a taxonomy reference",
            )),
        }
    }

    fn from_elements(field: &str, elements: &[Value]) -> Result<Self, ValidationError> {
        if elements.is_empty() {
            return Ok(Self::empty());
        }

        let objects = elements.iter().filter(|e| e.is_object()).count();
        if objects == elements.len() {
            let items = elements
                .iter()
                .map(|e| parse_item(field, e))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(TaxonomyValue::Hydrated(items));
        }
        if objects > 0 {
            return Err(ValidationError::invalid_format(
                field,
                "mixes bare ids and labelled items",
            ));
        }

        let mut ids = Vec::with_capacity(elements.len());
        for element in elements {
            ids.extend(parse_id(field, element)?);
        }
        Ok(TaxonomyValue::Raw(ids))
    }

    /// Returns true when no reference is present.
    pub fn is_empty(&self) -> bool {
        match self {
            TaxonomyValue::Raw(ids) => ids.is_empty(),
            TaxonomyValue::Hydrated(items) => items.is_empty(),
        }
    }

    /// Returns true for the `{id, label}` form.
    pub fn is_hydrated(&self) -> bool {
        matches!(self, TaxonomyValue::Hydrated(_))
    }

    /// Identifiers in order, regardless of form.
    pub fn ids(&self) -> Vec<TaxonomyId> {
        match self {
            TaxonomyValue::Raw(ids) => ids.clone(),
            TaxonomyValue::Hydrated(items) => items.iter().map(|i| i.id.clone()).collect(),
        }
    }

    /// Renders the value back to JSON in its current form.
    pub fn to_json(&self) -> Value {
        let rendered = match self {
            TaxonomyValue::Raw(ids) => serde_json::to_value(ids),
            TaxonomyValue::Hydrated(items) => serde_json::to_value(items),
        };
        rendered.unwrap_or(Value::Array(Vec::new()))
    }
}

impl Default for TaxonomyValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for TaxonomyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TaxonomyValue::Raw(ids) => ids.serialize(serializer),
            TaxonomyValue::Hydrated(items) => items.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TaxonomyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TaxonomyValue::from_json("value", &value).map_err(serde::de::Error::custom)
    }
}

fn parse_id(field: &str, value: &Value) -> Result<Option<TaxonomyId>, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|n| Some(TaxonomyId::Int(n)))
            .ok_or_else(|| ValidationError::invalid_format(field, format!("id {} is not an integer", n))),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(TaxonomyId::Text(trimmed.to_string())))
            }
        }
        other => Err(ValidationError::invalid_format(
            field,
            format!("unexpected id {}", other),
        )),
    }
}

fn parse_item(field: &str, value: &Value) -> Result<TaxonomyItem, ValidationError> {
    let id = value
        .get("id")
        .map(|id| parse_id(field, id))
        .transpose()?
        .flatten()
        .ok_or_else(|| ValidationError::invalid_format(field, "labelled item without id"))?;

    let label = value
        .get("label")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Ok(TaxonomyItem::new(id, label))
}
