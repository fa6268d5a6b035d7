use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a remote tabular index.
///
/// No schema is enforced: fields such as `path`, `locale` or `authorUrl`
/// are interpreted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record { fields: Map::new() }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the field as a string slice, if it holds a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.fields.get(field).cloned().unwrap_or(Value::Null)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets `field`, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Record { fields }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_accessors() {
        let mut record: Record = [("path", "/blog/one"), ("locale", "en")]
            .into_iter()
            .collect();

        assert_eq!(record.get_str("path"), Some("/blog/one"));
        assert_eq!(record.get_value("missing"), Value::Null);
        assert!(record.contains("locale"));

        let previous = record.insert("locale", "de");
        assert_eq!(previous, Some(json!("en")));
        assert_eq!(record.get_str("locale"), Some("de"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_non_string_field_is_not_a_str() {
        let record: Record = serde_json::from_value(json!({ "id": 7, "title": "Hello" })).unwrap();

        assert_eq!(record.get_str("id"), None);
        assert_eq!(record.get("id"), Some(&json!(7)));
        assert_eq!(record.get_str("title"), Some("Hello"));
    }

    #[test]
    fn test_record_serializes_as_plain_object() {
        let record: Record = [("id", json!(1)), ("title", json!("x"))].into_iter().collect();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "id": 1, "title": "x" }));
    }
}
