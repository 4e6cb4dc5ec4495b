//! View-model bags handed to the rendering layer

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::aggregate::RelatedSet;
use crate::error::AppResult;

/// Named values for one rendered page
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ViewBag(#[schema(value_type = Object)] Map<String, Value>);

impl ViewBag {
    pub fn titled(title: impl Into<String>) -> Self {
        let mut values = Map::new();
        values.insert("title".to_string(), Value::String(title.into()));
        Self(values)
    }

    pub fn with(mut self, key: &str, value: impl Serialize) -> AppResult<Self> {
        self.0.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    /// Add every related list under its own name
    pub fn with_related(mut self, related: &RelatedSet) -> AppResult<Self> {
        for (name, records) in related {
            self.0.insert(name.to_string(), records.to_view()?);
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }
}
