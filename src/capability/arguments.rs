//! Typed accessors over capability call arguments.

use serde::de::DeserializeOwned;

use crate::error::TrellisError;

/// Arguments passed to a capability, backed by a JSON value.
#[derive(Debug, Clone, Default)]
pub struct CapabilityArguments {
    value: serde_json::Value,
}

impl CapabilityArguments {
    /// Wrap a raw JSON value.
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// The underlying JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str, TrellisError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| missing(key, "string"))
    }

    /// Required integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, TrellisError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| missing(key, "integer"))
    }

    /// Required number argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, TrellisError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| missing(key, "number"))
    }

    /// Required boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, TrellisError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| missing(key, "boolean"))
    }

    /// Optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Optional integer argument.
    pub fn get_i64_opt(&self, key: &str) -> Option<i64> {
        self.value.get(key).and_then(|v| v.as_i64())
    }

    /// Deserialize the full argument object into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, TrellisError> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
}

fn missing(key: &str, expected: &str) -> TrellisError {
    TrellisError::InvalidState(format!("missing or non-{expected} argument '{key}'"))
}
