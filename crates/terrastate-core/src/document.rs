//! The state document stored per environment.
//!
//! A [`StateDocument`] is an opaque JSON value with a thin envelope:
//! `version`, `serial` and `modules`, each module carrying `path`,
//! `outputs` and `resources`. Only the envelope is typed. Every other field,
//! at the document level or inside a [`Module`], is kept as a
//! [`serde_json::Value`] and written back as it was received.
//!
//! Decoding goes through a plain JSON map first and then takes the envelope
//! out of it, so opaque values are never re-parsed. With serde_json's
//! `arbitrary_precision` feature, numbers keep their exact digits, and
//! integers above `u64::MAX` are not turned into floats.
//!
//! The document knows nothing about where it is persisted; that is the
//! store's job.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;

/// Schema version written into freshly created documents.
pub const STATE_FORMAT_VERSION: u64 = 1;

/// Path of the root module.
pub const ROOT_MODULE: &str = "root";

const DOCUMENT_FIELDS: [&str; 3] = ["version", "serial", "modules"];
const MODULE_FIELDS: [&str; 3] = ["path", "outputs", "resources"];

/// One environment's infrastructure state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDocument {
    /// Schema version of the document.
    pub version: u64,
    /// Write counter. Never compared against the stored value (last writer wins).
    pub serial: u64,
    /// Module entries in client order.
    pub modules: Vec<Module>,
    /// Fields outside the envelope (`lineage`, `terraform_version`, ...).
    pub extra: Map<String, Value>,
}

/// A module entry inside a [`StateDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Module nesting, `["root"]` for the root module.
    pub path: Vec<String>,
    pub outputs: IndexMap<String, Value>,
    pub resources: IndexMap<String, Value>,
    pub extra: Map<String, Value>,
}

impl Module {
    /// An empty root module.
    pub fn root() -> Self {
        Module {
            path: vec![ROOT_MODULE.to_string()],
            outputs: IndexMap::new(),
            resources: IndexMap::new(),
            extra: Map::new(),
        }
    }

    fn from_value(index: usize, value: Value) -> Result<Self, String> {
        let Value::Object(mut fields) = value else {
            return Err(format!("`modules[{index}]` must be an object"));
        };
        let context = |field: &str| format!("modules[{index}].{field}");

        let path = match take(&mut fields, "path", &context("path"))? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    _ => Err(format!("`{}` must contain only strings", context("path"))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(format!("`{}` must be an array", context("path"))),
        };
        let outputs = take_object(&mut fields, "outputs", &context("outputs"))?;
        let resources = take_object(&mut fields, "resources", &context("resources"))?;

        Ok(Module {
            path,
            outputs,
            resources,
            extra: fields,
        })
    }
}

impl Default for StateDocument {
    /// The document returned for an environment that has never been written.
    fn default() -> Self {
        StateDocument {
            version: STATE_FORMAT_VERSION,
            serial: 0,
            modules: vec![Module::root()],
            extra: Map::new(),
        }
    }
}

impl StateDocument {
    /// Decodes a document from raw JSON bytes.
    ///
    /// Fails if the bytes are not a JSON object or the envelope fields are
    /// missing or of the wrong type.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn from_fields(mut fields: Map<String, Value>) -> Result<Self, String> {
        let version = take_u64(&mut fields, "version")?;
        let serial = take_u64(&mut fields, "serial")?;
        let modules = match take(&mut fields, "modules", "modules")? {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| Module::from_value(index, item))
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err("`modules` must be an array".to_string()),
        };

        Ok(StateDocument {
            version,
            serial,
            modules,
            extra: fields,
        })
    }
}

fn take(fields: &mut Map<String, Value>, key: &str, name: &str) -> Result<Value, String> {
    fields
        .remove(key)
        .ok_or_else(|| format!("missing field `{name}`"))
}

fn take_u64(fields: &mut Map<String, Value>, key: &str) -> Result<u64, String> {
    take(fields, key, key)?
        .as_u64()
        .ok_or_else(|| format!("`{key}` must be a non-negative integer"))
}

fn take_object(
    fields: &mut Map<String, Value>,
    key: &str,
    name: &str,
) -> Result<IndexMap<String, Value>, String> {
    match take(fields, key, name)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(format!("`{name}` must be an object")),
    }
}

impl<'de> Deserialize<'de> for StateDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        StateDocument::from_fields(fields).map_err(D::Error::custom)
    }
}

impl Serialize for StateDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("version", &self.version)?;
        map.serialize_entry("serial", &self.serial)?;
        map.serialize_entry("modules", &self.modules)?;
        for (key, value) in &self.extra {
            if !DOCUMENT_FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl Serialize for Module {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("path", &self.path)?;
        map.serialize_entry("outputs", &self.outputs)?;
        map.serialize_entry("resources", &self.resources)?;
        for (key, value) in &self.extra {
            if !MODULE_FIELDS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_document_matches_empty_state() {
        let value = serde_json::to_value(StateDocument::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "serial": 0,
                "modules": [{ "path": ["root"], "outputs": {}, "resources": {} }]
            })
        );
    }

    #[test]
    fn unknown_fields_survive_decode_and_encode() {
        let input = json!({
            "version": 1,
            "serial": 7,
            "lineage": "2f1c0d2e",
            "terraform_version": "0.9.3",
            "modules": [{
                "path": ["root", "network"],
                "outputs": { "vpc_id": { "type": "string", "value": "vpc-1" } },
                "resources": { "aws_vpc.main": { "type": "aws_vpc", "primary": { "id": "vpc-1" } } },
                "depends_on": []
            }]
        });

        let doc = StateDocument::from_slice(input.to_string().as_bytes()).unwrap();
        assert_eq!(doc.serial, 7);
        assert_eq!(doc.extra["lineage"], json!("2f1c0d2e"));
        assert_eq!(doc.modules[0].path, vec!["root", "network"]);
        assert!(doc.modules[0].extra.contains_key("depends_on"));

        assert_eq!(serde_json::to_value(&doc).unwrap(), input);
    }

    #[test]
    fn empty_module_list_is_accepted() {
        let doc = StateDocument::from_slice(br#"{"version":1,"serial":0,"modules":[]}"#).unwrap();
        assert!(doc.modules.is_empty());
        assert!(doc.extra.is_empty());
    }

    #[test]
    fn module_fields_are_required() {
        let full = StateDocument::from_slice(
            br#"{"version":1,"serial":3,"modules":[{"path":["root"],"outputs":{},"resources":{}}]}"#,
        )
        .unwrap();
        assert_eq!(full.modules[0], Module::root());

        for body in [
            &br#"{"version":1,"serial":3,"modules":[{"path":["root"]}]}"#[..],
            br#"{"version":1,"serial":3,"modules":[{"path":["root"],"outputs":{}}]}"#,
            br#"{"version":1,"serial":3,"modules":[{"path":["root"],"resources":{}}]}"#,
        ] {
            let err = StateDocument::from_slice(body).unwrap_err();
            assert!(err.to_string().contains("missing field"), "{err}");
        }
    }

    #[test]
    fn integers_beyond_u64_keep_their_digits() {
        let input = r#"{"version":1,"serial":2,"big":18446744073709551616,"modules":[{"path":["root"],"outputs":{"n":{"value":123456789012345678901234567890}},"resources":{"r":{"ratio":0.1000000000000000055511151231257827}},"limit":-99999999999999999999}]}"#;

        let doc = StateDocument::from_slice(input.as_bytes()).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.contains(r#""big":18446744073709551616"#), "{text}");
        assert!(text.contains("123456789012345678901234567890"), "{text}");
        assert!(text.contains("0.1000000000000000055511151231257827"), "{text}");
        assert!(text.contains("-99999999999999999999"), "{text}");

        let again = StateDocument::from_slice(text.as_bytes()).unwrap();
        assert_eq!(again, doc);
    }

    #[test]
    fn serial_must_fit_the_envelope() {
        for body in [
            &br#"{"version":1,"serial":-1,"modules":[]}"#[..],
            br#"{"version":1,"serial":1.5,"modules":[]}"#,
            br#"{"version":1,"serial":18446744073709551616,"modules":[]}"#,
        ] {
            assert!(StateDocument::from_slice(body).is_err());
        }
    }

    #[test]
    fn envelope_keys_in_extra_are_not_duplicated() {
        let mut doc = StateDocument::default();
        doc.extra.insert("serial".to_string(), json!(99));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["serial"], json!(0));
    }

    #[test]
    fn envelope_is_required() {
        let bodies: [&[u8]; 7] = [
            b"",
            b"not json",
            b"[]",
            br#"{"version":1,"modules":[]}"#,
            br#"{"version":1,"serial":"one","modules":[]}"#,
            br#"{"version":1,"serial":0,"modules":{}}"#,
            br#"{"version":1,"serial":0,"modules":[{"outputs":{}}]}"#,
        ];
        for body in bodies {
            assert!(
                matches!(StateDocument::from_slice(body), Err(CoreError::MalformedDocument(_))),
                "accepted {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }
}
