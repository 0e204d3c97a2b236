//! JSON <-> Firestore value mapping.
//!
//! Firestore's REST API types every field
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...); the
//! daydesk protocol carries plain JSON objects. RFC3339 strings become
//! `timestampValue` so instants keep the store's timestamp ordering
//! semantics, matching how the original documents were written.

use anyhow::{Result, bail};
use chrono::DateTime;
use serde_json::{Map, Value, json};

/// Convert a plain JSON object into a Firestore `fields` map.
pub fn to_firestore_fields(fields: &Value) -> Result<Value> {
    let Some(obj) = fields.as_object() else {
        bail!("Document fields must be a JSON object");
    };

    let mapped: Map<String, Value> = obj
        .iter()
        .map(|(k, v)| (k.clone(), to_firestore_value(v)))
        .collect();
    Ok(Value::Object(mapped))
}

fn to_firestore_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // Firestore integers travel as decimal strings
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => {
            if DateTime::parse_from_rfc3339(s).is_ok() {
                json!({ "timestampValue": s })
            } else {
                json!({ "stringValue": s })
            }
        }
        Value::Array(items) => json!({
            "arrayValue": {
                "values": items.iter().map(to_firestore_value).collect::<Vec<_>>()
            }
        }),
        Value::Object(obj) => json!({
            "mapValue": {
                "fields": obj
                    .iter()
                    .map(|(k, v)| (k.clone(), to_firestore_value(v)))
                    .collect::<Map<String, Value>>()
            }
        }),
    }
}

/// Convert a Firestore `fields` map back into a plain JSON object.
pub fn from_firestore_fields(fields: &Value) -> Value {
    let mapped: Map<String, Value> = fields
        .as_object()
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), from_firestore_value(v)))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(mapped)
}

fn from_firestore_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };

    if let Some((kind, inner)) = obj.iter().next() {
        match kind.as_str() {
            "nullValue" => Value::Null,
            "booleanValue" | "doubleValue" | "stringValue" | "timestampValue" => inner.clone(),
            "integerValue" => inner
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(|i| json!(i))
                .unwrap_or(Value::Null),
            "arrayValue" => {
                let items = inner
                    .get("values")
                    .and_then(|v| v.as_array())
                    .map(|items| items.iter().map(from_firestore_value).collect())
                    .unwrap_or_default();
                Value::Array(items)
            }
            "mapValue" => {
                let fields = inner.get("fields").cloned().unwrap_or(json!({}));
                from_firestore_fields(&fields)
            }
            _ => Value::Null,
        }
    } else {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_fields_round_trip() {
        let fields = json!({
            "title": "Write report",
            "completed": false,
            "progress": 12.5,
            "priority": "High",
            "userId": "user-1",
            "createdAt": "2025-06-01T08:00:00Z",
            "description": null,
        });

        let firestore = to_firestore_fields(&fields).unwrap();
        assert_eq!(firestore["title"], json!({ "stringValue": "Write report" }));
        assert_eq!(firestore["completed"], json!({ "booleanValue": false }));
        assert_eq!(firestore["progress"], json!({ "doubleValue": 12.5 }));
        assert_eq!(
            firestore["createdAt"],
            json!({ "timestampValue": "2025-06-01T08:00:00Z" })
        );

        assert_eq!(from_firestore_fields(&firestore), fields);
    }

    #[test]
    fn test_nested_recurrence_round_trips() {
        let fields = json!({
            "recurrence": {
                "rule": "WEEKLY",
                "interval": 1,
                "daysOfWeek": ["MON", "WED"],
            }
        });

        let firestore = to_firestore_fields(&fields).unwrap();
        assert!(firestore["recurrence"].get("mapValue").is_some());
        assert_eq!(
            firestore["recurrence"]["mapValue"]["fields"]["interval"],
            json!({ "integerValue": "1" })
        );

        assert_eq!(from_firestore_fields(&firestore), fields);
    }

    #[test]
    fn test_plain_strings_stay_strings() {
        let fields = json!({ "color": "blue" });
        let firestore = to_firestore_fields(&fields).unwrap();
        assert_eq!(firestore["color"], json!({ "stringValue": "blue" }));
    }

    #[test]
    fn test_non_object_fields_are_rejected() {
        assert!(to_firestore_fields(&json!("just a string")).is_err());
    }
}
