//! Typed view of an employee document.
//!
//! Storage keeps employees as open documents. This projection only
//! interprets the fields the service looks at; everything else rides
//! along in `extra`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::store::{Document, ObjectId};

/// Seniority. Not enforced on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    Mid,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Mid => "mid",
            Level::Senior => "senior",
        }
    }

    /// Parse a level string; anything unrecognized is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "junior" => Some(Level::Junior),
            "mid" => Some(Level::Mid),
            "senior" => Some(Level::Senior),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strongly typed projection of an employee document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Level>,

    /// Fields the service does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    /// Project a stored document. Fails only if `_id` is missing or malformed.
    pub fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }
}

/// Unknown or non-string levels project to `None` instead of failing.
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(Level::parse))
}

/// Fields accepted when creating or updating an employee.
///
/// Every field is optional so the same type serves partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_keeps_unknown_fields() {
        let doc = json!({
            "_id": "63f6fa23925a8e8f91cc0855",
            "name": "A",
            "position": "Eng",
            "level": "senior",
            "team": "platform"
        });
        let employee = Employee::from_document(doc.as_object().unwrap().clone()).unwrap();
        assert_eq!(employee.id.to_hex(), "63f6fa23925a8e8f91cc0855");
        assert_eq!(employee.level, Some(Level::Senior));
        assert_eq!(employee.extra["team"], "platform");

        assert_eq!(serde_json::to_value(&employee).unwrap(), doc);
    }

    #[test]
    fn test_unknown_level_is_not_an_error() {
        let doc = json!({"_id": "63f6fa23925a8e8f91cc0855", "level": "principal"});
        let employee = Employee::from_document(doc.as_object().unwrap().clone()).unwrap();
        assert_eq!(employee.level, None);
        assert_eq!(employee.name, None);

        let doc = json!({"_id": "63f6fa23925a8e8f91cc0855", "level": 3});
        assert_eq!(Employee::from_document(doc.as_object().unwrap().clone()).unwrap().level, None);
    }

    #[test]
    fn test_projection_requires_valid_id() {
        let doc = json!({"_id": "zzz", "name": "A"});
        assert!(Employee::from_document(doc.as_object().unwrap().clone()).is_err());
        let doc = json!({"name": "A"});
        assert!(Employee::from_document(doc.as_object().unwrap().clone()).is_err());
    }

    #[test]
    fn test_partial_fields_serialize_sparsely() {
        let fields = EmployeeFields {
            level: Some(Level::Mid),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&fields).unwrap(), json!({"level": "mid"}));
    }
}
