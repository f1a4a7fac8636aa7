//! Ordered parameter sink
//!
//! Derivation steps append named parameters to one shared sink; names are
//! unique within a run and insertion order is preserved so output is
//! reproducible byte-for-byte. Three entry kinds exist: plain values, secret
//! values (redacted from debug output, rendered securely downstream), and
//! secret references resolved later against a key vault, never here.

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::{Error, Result};

/// A single parameter value, tagged by kind
#[derive(Clone, PartialEq)]
pub enum ParamValue {
    /// Plain value, rendered as-is into the template
    Literal(Value),
    /// Secret value; the consumer must render it as a protected parameter
    Secret(String),
    /// Indirect value resolved against a key vault by the consumer
    SecretRef {
        /// Resource ID of the vault
        vault_id: String,
        /// Secret name within the vault
        secret_name: String,
        /// Secret version; empty selects the latest
        secret_version: String,
    },
}

impl ParamValue {
    /// Render into the template parameter-file shape
    ///
    /// Literals and secrets become `{"value": ...}`; references become a
    /// `{"reference": ...}` object the template engine resolves at deploy
    /// time. The version key is omitted when empty.
    pub fn to_template_value(&self) -> Value {
        match self {
            Self::Literal(v) => json!({ "value": v }),
            Self::Secret(v) => json!({ "value": v }),
            Self::SecretRef { vault_id, secret_name, secret_version } => {
                let mut reference = json!({
                    "keyVault": { "id": vault_id },
                    "secretName": secret_name,
                });
                if !secret_version.is_empty() {
                    reference["secretVersion"] = json!(secret_version);
                }
                json!({ "reference": reference })
            }
        }
    }
}

// Secrets never appear in debug or log output.
impl std::fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Secret(_) => f.debug_tuple("Secret").field(&"<redacted>").finish(),
            Self::SecretRef { vault_id, secret_name, .. } => f
                .debug_struct("SecretRef")
                .field("vault_id", vault_id)
                .field("secret_name", secret_name)
                .finish_non_exhaustive(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Literal(Value::from(v))
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Literal(Value::from(v))
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        Self::Literal(Value::from(v))
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Literal(Value::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Literal(Value::from(v))
    }
}

impl From<&[String]> for ParamValue {
    fn from(v: &[String]) -> Self {
        Self::Literal(Value::from(v.to_vec()))
    }
}

impl From<Value> for ParamValue {
    fn from(v: Value) -> Self {
        Self::Literal(v)
    }
}

/// Append-only ordered mapping built up during one derivation run
#[derive(Debug, Default)]
pub struct ParameterSink {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain parameter
    ///
    /// Fails if the name is already present: a colliding name means two
    /// derivation steps disagree about the output, and a corrupted map must
    /// never reach the template engine.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::duplicate_parameter(name));
        }
        self.entries.insert(name, value.into());
        Ok(())
    }

    /// Add a secret parameter
    ///
    /// When the value is empty and `always_include_empty` is false the call
    /// is a no-op, so optional secrets don't surface as empty-but-required
    /// template parameters. Windows admin passwords pass `true`: the
    /// parameter is contractually present even when blank.
    pub fn put_secret(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        always_include_empty: bool,
    ) -> Result<()> {
        let value = value.into();
        if value.is_empty() && !always_include_empty {
            return Ok(());
        }
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::duplicate_parameter(name));
        }
        self.entries.insert(name, ParamValue::Secret(value));
        Ok(())
    }

    /// Add a key-vault reference parameter; the sink never resolves it
    pub fn put_secret_ref(
        &mut self,
        name: impl Into<String>,
        vault_id: impl Into<String>,
        secret_name: impl Into<String>,
        secret_version: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::duplicate_parameter(name));
        }
        self.entries.insert(
            name,
            ParamValue::SecretRef {
                vault_id: vault_id.into(),
                secret_name: secret_name.into(),
                secret_version: secret_version.into(),
            },
        );
        Ok(())
    }

    /// Add or overwrite a parameter, keeping the original insertion position
    ///
    /// Reserved for the orchestrator-specific stage, which runs last and is
    /// permitted to overwrite earlier entries but never remove them.
    pub fn upsert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Number of entries accumulated so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been emitted yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the sink, producing the finalized ordered mapping
    pub fn finalize(self) -> ParameterMap {
        ParameterMap { entries: self.entries }
    }
}

/// Finalized, read-only ordered parameter mapping
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterMap {
    entries: IndexMap<String, ParamValue>,
}

impl ParameterMap {
    /// Look up a parameter by name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    /// Returns true if the named parameter is present
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Render the whole map into template parameter-file JSON
    ///
    /// Key order follows insertion order (the underlying map is
    /// insertion-ordered and serde_json preserves it).
    pub fn to_template_parameters(&self) -> Value {
        let mut out = serde_json::Map::new();
        for (name, value) in &self.entries {
            out.insert(name.clone(), value.to_template_value());
        }
        Value::Object(out)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let mut sink = ParameterSink::new();
        sink.put("location", "westus2").unwrap();
        let err = sink.put("location", "eastus").unwrap_err();
        assert!(matches!(err, Error::DuplicateParameter(ref n) if n == "location"));
    }

    #[test]
    fn preserves_insertion_order() {
        let mut sink = ParameterSink::new();
        sink.put("zulu", "1").unwrap();
        sink.put("alpha", "2").unwrap();
        sink.put("mike", "3").unwrap();
        let map = sink.finalize();
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn empty_secret_is_dropped_unless_forced() {
        let mut sink = ParameterSink::new();
        sink.put_secret("dnsServer", "", false).unwrap();
        sink.put_secret("windowsAdminPassword", "", true).unwrap();
        let map = sink.finalize();
        assert!(!map.contains("dnsServer"));
        assert!(map.contains("windowsAdminPassword"));
    }

    #[test]
    fn upsert_keeps_position() {
        let mut sink = ParameterSink::new();
        sink.put("first", "a").unwrap();
        sink.put("second", "b").unwrap();
        sink.upsert("first", "overridden");
        let map = sink.finalize();
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(map.get("first"), Some(&ParamValue::Literal("overridden".into())));
    }

    #[test]
    fn secrets_redact_in_debug() {
        let secret = ParamValue::Secret("hunter2".into());
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn secret_ref_renders_as_reference() {
        let value = ParamValue::SecretRef {
            vault_id: "/subscriptions/s/vaults/kv".into(),
            secret_name: "ext-params".into(),
            secret_version: "".into(),
        };
        let rendered = value.to_template_value();
        assert_eq!(rendered["reference"]["keyVault"]["id"], "/subscriptions/s/vaults/kv");
        assert_eq!(rendered["reference"]["secretName"], "ext-params");
        assert!(rendered["reference"].get("secretVersion").is_none());
    }
}
