//! Text rendering of the walked tree.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::DriverResult;

/// Pretty-print `value` with `indent` spaces per level and `\n` line endings.
///
/// Strings use `"` quotes; backslashes and quotes are escaped exactly once.
pub fn render(value: &Value, indent: usize) -> DriverResult<String> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_with_configured_indent() {
        let value = json!({ "A": { "B": 1 } });
        assert_eq!(render(&value, 2).unwrap(), "{\n  \"A\": {\n    \"B\": 1\n  }\n}");
        assert_eq!(render(&value, 4).unwrap(), "{\n    \"A\": {\n        \"B\": 1\n    }\n}");
    }

    #[test]
    fn escapes_backslash_once() {
        let value = json!({ "Path": "C:\\temp\\\"x\"" });
        assert_eq!(render(&value, 2).unwrap(), "{\n  \"Path\": \"C:\\\\temp\\\\\\\"x\\\"\"\n}");
    }

    #[test]
    fn preserves_insertion_order() {
        let mut map = serde_json::Map::new();
        map.insert("Zed".into(), json!(1));
        map.insert("Alpha".into(), json!(2));
        let text = render(&Value::Object(map), 2).unwrap();
        assert!(text.find("Zed").unwrap() < text.find("Alpha").unwrap());
    }
}
