// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named element parameters.

use crate::ids::ElementId;
use rustc_hash::FxHashMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stored value of a parameter.
///
/// Lengths are stored as doubles in internal units. Serialized externally
/// tagged (`{"Double": 0.5}`) so the storage type survives a round trip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParameterValue {
    Double(f64),
    Integer(i64),
    String(String),
    ElementId(ElementId),
}

impl ParameterValue {
    /// Numeric value, if the storage type is numeric.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParameterValue::Double(v) => Some(*v),
            ParameterValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn storage_type(&self) -> &'static str {
        match self {
            ParameterValue::Double(_) => "Double",
            ParameterValue::Integer(_) => "Integer",
            ParameterValue::String(_) => "String",
            ParameterValue::ElementId(_) => "ElementId",
        }
    }
}

/// Parameters of one element, looked up by exact name.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ParameterSet {
    values: FxHashMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style [`ParameterSet::set`].
    pub fn with(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_exact() {
        let params = ParameterSet::new().with("Диаметр", ParameterValue::Double(0.5));
        assert_eq!(params.lookup("Диаметр").and_then(|v| v.as_double()), Some(0.5));
        assert!(params.lookup("диаметр").is_none());
    }

    #[test]
    fn test_integer_reads_as_double() {
        assert_eq!(ParameterValue::Integer(3).as_double(), Some(3.0));
        assert_eq!(ParameterValue::String("3".into()).as_double(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_keeps_storage_type() {
        let values = [
            ParameterValue::Double(3.0),
            ParameterValue::Integer(3),
            ParameterValue::String("3".into()),
            ParameterValue::ElementId(ElementId(3)),
        ];
        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let back: ParameterValue = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value, "{}", json);
        }
        assert_eq!(
            serde_json::to_string(&ParameterValue::Integer(3)).unwrap(),
            r#"{"Integer":3}"#
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_set_in_document_json() {
        let params: ParameterSet =
            serde_json::from_str(r#"{"Диаметр":{"Double":0.5},"Марка":{"ElementId":7}}"#).unwrap();
        assert_eq!(params.lookup("Диаметр"), Some(&ParameterValue::Double(0.5)));
        assert_eq!(params.lookup("Марка"), Some(&ParameterValue::ElementId(ElementId(7))));
    }
}
