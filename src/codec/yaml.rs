//! YAML codec backed by `serde_yml`
//!
//! Mappings become container nodes followed by their children, sequences of
//! scalars become multi-valued leaves and scalars become single-valued
//! leaves. Encoding rebuilds the nesting from the dotted paths. Comments are
//! not preserved.
//!
//! A key containing `.` is read as a dotted path, so `"a.b": 1` is saved back
//! as `b: 1` nested under `a`, alongside any other children of `a`.

use std::io::{Read, Write};

use serde_yml::{Mapping, Value};

use super::NodeCodec;
use crate::error::{CodecError, Result};
use crate::node::{Node, SEPARATOR};
use crate::section::ConfigSection;

/// YAML implementation of [`NodeCodec`]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl YamlCodec {
    /// Create a YAML codec
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode nodes from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not YAML, the root is not a mapping,
    /// or a sequence holds nested collections.
    pub fn decode_str(&self, text: &str) -> Result<Vec<Node>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();
        match untag(&serde_yml::from_str::<Value>(text)?) {
            Value::Null => {}
            Value::Mapping(mapping) => walk("", mapping, &mut nodes)?,
            other => return Err(CodecError::NotAMapping(kind(other))),
        }
        Ok(nodes)
    }

    /// Encode nodes as YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if a key holds both values and children.
    pub fn encode_string(&self, nodes: &[Node]) -> Result<String> {
        let tree = ConfigSection::from_nodes(nodes.iter().cloned());
        Ok(serde_yml::to_string(&section_value(&tree)?)?)
    }
}

impl NodeCodec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<Vec<Node>> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.decode_str(&text)
    }

    fn encode(&self, writer: &mut dyn Write, nodes: &[Node]) -> Result<()> {
        let text = self.encode_string(nodes)?;
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

fn untag(mut value: &Value) -> &Value {
    while let Value::Tagged(tagged) = value {
        value = &tagged.value;
    }
    value
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

/// Render a scalar as its stored string
fn scalar_string(path: &str, value: &Value) -> Result<String> {
    match untag(value) {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text.clone()),
        other => Err(CodecError::Unsupported {
            path: path.to_string(),
            reason: format!("expected a scalar, found {}", kind(other)),
        }),
    }
}

fn walk(prefix: &str, mapping: &Mapping, nodes: &mut Vec<Node>) -> Result<()> {
    for (key, value) in mapping {
        let key = scalar_string(prefix, key)?;
        let path = child_path(prefix, &key);

        match untag(value) {
            Value::Mapping(children) => {
                nodes.push(Node::container(path.clone()));
                walk(&path, children, nodes)?;
            }
            Value::Sequence(items) => {
                let values = items
                    .iter()
                    .map(|item| scalar_string(&path, item))
                    .collect::<Result<Vec<_>>>()?;
                nodes.push(Node::new(path, values));
            }
            Value::Null => nodes.push(Node::container(path)),
            scalar => {
                let value = scalar_string(&path, scalar)?;
                nodes.push(Node::new(path, [value]));
            }
        }
    }
    Ok(())
}

/// Emit a stored string, unquoted when YAML reads it back identically
fn scalar_value(raw: &str) -> Value {
    match serde_yml::from_str::<Value>(raw) {
        Ok(Value::Bool(flag)) if flag.to_string() == raw => Value::Bool(flag),
        Ok(Value::Number(number)) if number.to_string() == raw => Value::Number(number),
        _ => Value::String(raw.to_string()),
    }
}

fn section_value(section: &ConfigSection) -> Result<Value> {
    let mut mapping = Mapping::new();

    for (key, child) in section.children() {
        let values = child.own_node().map(Node::values).unwrap_or_default();

        let value = if child.is_empty() {
            match values {
                [] => Value::Mapping(Mapping::new()),
                [single] => scalar_value(single),
                many => Value::Sequence(many.iter().map(|v| scalar_value(v)).collect()),
            }
        } else if values.is_empty() {
            section_value(child)?
        } else {
            return Err(CodecError::Unsupported {
                path: child.path().to_string(),
                reason: "key holds both values and child keys".to_string(),
            });
        };

        mapping.insert(Value::String(key.to_string()), value);
    }

    Ok(Value::Mapping(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Core:
  Server:
    Name: Main
    Port: 25565
  Debug: false
Worlds:
  - world
  - world_nether
Empty:
Ratio: 0.75
"#;

    fn pairs(nodes: &[Node]) -> Vec<(&str, Vec<&str>)> {
        nodes
            .iter()
            .map(|n| (n.path(), n.values().iter().map(String::as_str).collect()))
            .collect()
    }

    #[test]
    fn test_decode_parent_before_child() {
        let nodes = YamlCodec::new().decode_str(SAMPLE).unwrap();

        assert_eq!(
            pairs(&nodes),
            vec![
                ("Core", vec![]),
                ("Core.Server", vec![]),
                ("Core.Server.Name", vec!["Main"]),
                ("Core.Server.Port", vec!["25565"]),
                ("Core.Debug", vec!["false"]),
                ("Worlds", vec!["world", "world_nether"]),
                ("Empty", vec![]),
                ("Ratio", vec!["0.75"]),
            ]
        );
    }

    #[test]
    fn test_decode_empty_document() {
        let codec = YamlCodec::new();

        assert!(codec.decode_str("").unwrap().is_empty());
        assert!(codec.decode_str("   \n# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_non_mapping_root() {
        let err = YamlCodec::new().decode_str("- a\n- b\n").unwrap_err();

        assert!(matches!(err, CodecError::NotAMapping("a sequence")));
    }

    #[test]
    fn test_decode_rejects_nested_sequence_items() {
        let err = YamlCodec::new()
            .decode_str("Items:\n  - name: a\n")
            .unwrap_err();

        assert!(err.to_string().contains("Items"));
    }

    #[test]
    fn test_decode_invalid_yaml() {
        let err = YamlCodec::new().decode_str("Core: [unclosed").unwrap_err();

        assert!(matches!(err, CodecError::Yaml(_)));
    }

    #[test]
    fn test_encode_then_decode_preserves_nodes() {
        let codec = YamlCodec::new();
        let nodes = codec.decode_str(SAMPLE).unwrap();

        let text = codec.encode_string(&nodes).unwrap();
        let again = codec.decode_str(&text).unwrap();

        assert_eq!(pairs(&again), pairs(&nodes));
    }

    #[test]
    fn test_encode_keeps_types_and_quotes_lookalikes() {
        let codec = YamlCodec::new();
        let nodes = vec![
            Node::new("Port", ["8080"]),
            Node::new("Enabled", ["true"]),
            Node::new("Zip", ["007"]),
            Node::new("Label", ["yes please"]),
        ];

        let text = codec.encode_string(&nodes).unwrap();

        assert!(text.contains("Port: 8080"));
        assert!(text.contains("Enabled: true"));

        let again = codec.decode_str(&text).unwrap();
        assert_eq!(pairs(&again), pairs(&nodes));
    }

    #[test]
    fn test_encode_rejects_values_with_children() {
        let nodes = vec![Node::new("Core", ["1"]), Node::new("Core.Name", ["a"])];

        let err = YamlCodec::new().encode_string(&nodes).unwrap_err();

        assert!(matches!(err, CodecError::Unsupported { .. }));
    }

    #[test]
    fn test_dotted_key_nested_on_encode() {
        let codec = YamlCodec::new();
        let nodes = codec.decode_str("\"a.b\": 1\na:\n  c: 2\n").unwrap();

        assert_eq!(
            pairs(&nodes),
            vec![("a.b", vec!["1"]), ("a", vec![]), ("a.c", vec!["2"])]
        );

        let text = codec.encode_string(&nodes).unwrap();
        let again = codec.decode_str(&text).unwrap();

        assert_eq!(
            pairs(&again),
            vec![("a", vec![]), ("a.b", vec!["1"]), ("a.c", vec!["2"])]
        );
    }

    #[test]
    fn test_stream_round_trip() {
        let codec = YamlCodec::new();
        let nodes = vec![Node::container("A"), Node::new("A.B", ["1", "2"])];

        let mut buffer = Vec::new();
        codec.encode(&mut buffer, &nodes).unwrap();
        let decoded = codec.decode(&mut buffer.as_slice()).unwrap();

        assert_eq!(pairs(&decoded), pairs(&nodes));
    }
}
