//! Bundler lifecycle events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One bundler lifecycle occurrence (progress, completion, error, ...).
///
/// Events are opaque: the orchestrator forwards them unchanged to every
/// subscriber. The only convention is an optional string `type` field that
/// renderers may use to pick a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReporterEvent(Value);

impl ReporterEvent {
    /// Create an event of the given kind with extra fields.
    pub fn new(kind: &str, fields: Map<String, Value>) -> Self {
        let mut object = fields;
        object.insert("type".to_string(), Value::String(kind.to_string()));
        Self(Value::Object(object))
    }

    /// Create an event that only carries a kind.
    pub fn kind_only(kind: &str) -> Self {
        Self::new(kind, Map::new())
    }

    /// The `type` field, when present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Look up a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ReporterEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
