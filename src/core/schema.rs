//! Payload validation schema

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Field-presence rules a payload must satisfy before routing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSchema {
    /// Top-level keys every payload must contain
    #[serde(default, deserialize_with = "lenient_required")]
    pub required: Vec<String>,
}

/// `required` values that are not a list of strings are treated as absent
fn lenient_required<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Required {
        List(Vec<String>),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Required::deserialize(deserializer)? {
        Required::List(fields) => fields,
        Required::Other(_) => Vec::new(),
    })
}

impl ValidationSchema {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }

    /// Check a payload, returning the names of missing required fields
    pub fn validate(&self, data: &Value) -> Result<(), Vec<String>> {
        if self.required.is_empty() {
            return Ok(());
        }

        let missing: Vec<String> = match data.as_object() {
            Some(object) => self
                .required
                .iter()
                .filter(|field| !object.contains_key(field.as_str()))
                .cloned()
                .collect(),
            None => self.required.clone(),
        };

        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}
