//! JSON parser for timeline documents.
//!
//! A document is `{ "groups": [...], "items": [...] }`. Record property names
//! come from [`Keys`], so callers can keep their own shape. A bad record is
//! reported as a [`MalformedRecord`] and skipped; only a document that is not
//! a JSON object is fatal.
//!
//! Accepted value forms:
//! - ids and group references: non-empty strings or numbers;
//! - times: integer (or finite float) milliseconds, or RFC 3339 strings;
//! - capability flags: `canMove`/`can_move` etc., with `canResize` taking
//!   `false | true | "left" | "right" | "both"`.

use crate::model::{
    EpochMillis, Group, GroupId, Item, ItemId, Keys, MalformedRecord, ParseError, RecordKind,
    ResizeCapability,
};
use chrono::DateTime;
use serde_json::{Map, Value};

/// Groups and items read from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineDocument {
    /// Groups in document order.
    pub groups: Vec<Group>,
    /// Items that parsed.
    pub items: Vec<Item>,
    /// Records that were skipped.
    pub malformed: Vec<MalformedRecord>,
}

/// Result of parsing a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult<T> {
    /// The record parsed.
    Valid(T),
    /// The record was rejected.
    Malformed(MalformedRecord),
}

/// Parse a whole document.
///
/// Missing `groups` or `items` arrays are treated as empty.
///
/// # Errors
///
/// `InvalidJson` (reported at record 0) when `raw` is not JSON or not an
/// object, or when `groups`/`items` is present but not an array.
pub fn parse_document(raw: &str, keys: &Keys) -> Result<TimelineDocument, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        record: 0,
        message: e.to_string(),
    })?;
    let Value::Object(root) = value else {
        return Err(ParseError::InvalidJson {
            record: 0,
            message: "document must be a JSON object".to_string(),
        });
    };

    let mut document = TimelineDocument::default();

    for (index, record) in records(&root, "groups")?.iter().enumerate() {
        match parse_group_graceful(record, index, keys) {
            ParseResult::Valid(group) => document.groups.push(group),
            ParseResult::Malformed(bad) => document.malformed.push(bad),
        }
    }

    for (index, record) in records(&root, "items")?.iter().enumerate() {
        match parse_item_graceful(record, index, keys) {
            ParseResult::Valid(item) => document.items.push(item),
            ParseResult::Malformed(bad) => document.malformed.push(bad),
        }
    }

    if !document.malformed.is_empty() {
        tracing::warn!(
            malformed = document.malformed.len(),
            "skipped malformed timeline records"
        );
    }
    tracing::debug!(
        groups = document.groups.len(),
        items = document.items.len(),
        "parsed timeline document"
    );
    Ok(document)
}

fn records<'a>(root: &'a Map<String, Value>, name: &str) -> Result<&'a [Value], ParseError> {
    match root.get(name) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(ParseError::InvalidJson {
            record: 0,
            message: format!("'{name}' must be an array"),
        }),
    }
}

/// Parse a group, wrapping failures as a [`MalformedRecord`].
pub fn parse_group_graceful(record: &Value, index: usize, keys: &Keys) -> ParseResult<Group> {
    match parse_group(record, index, keys) {
        Ok(group) => ParseResult::Valid(group),
        Err(error) => ParseResult::Malformed(MalformedRecord::new(RecordKind::Group, index, error)),
    }
}

/// Parse an item, wrapping failures as a [`MalformedRecord`].
pub fn parse_item_graceful(record: &Value, index: usize, keys: &Keys) -> ParseResult<Item> {
    match parse_item(record, index, keys) {
        Ok(item) => ParseResult::Valid(item),
        Err(error) => ParseResult::Malformed(MalformedRecord::new(RecordKind::Item, index, error)),
    }
}

/// Parse one group record.
///
/// # Errors
///
/// Returns the first problem found in the record.
pub fn parse_group(record: &Value, index: usize, keys: &Keys) -> Result<Group, ParseError> {
    let object = as_object(record, index)?;
    let id = identifier(object, index, &keys.group_id_key)?;
    let id = GroupId::new(id).map_err(|_| ParseError::InvalidIdentifier {
        record: index,
        field: keys.group_id_key.clone(),
        raw: String::new(),
    })?;

    Ok(Group {
        id,
        title: text(object, &keys.group_title_key),
    })
}

/// Parse one item record.
///
/// # Errors
///
/// Returns the first problem found in the record.
pub fn parse_item(record: &Value, index: usize, keys: &Keys) -> Result<Item, ParseError> {
    let object = as_object(record, index)?;

    let id = ItemId::new(identifier(object, index, &keys.item_id_key)?).map_err(|_| {
        ParseError::InvalidIdentifier {
            record: index,
            field: keys.item_id_key.clone(),
            raw: String::new(),
        }
    })?;
    let group = GroupId::new(identifier(object, index, &keys.item_group_key)?).map_err(|_| {
        ParseError::InvalidIdentifier {
            record: index,
            field: keys.item_group_key.clone(),
            raw: String::new(),
        }
    })?;
    let start_time = timestamp(object, index, &keys.item_time_start_key)?;
    let end_time = timestamp(object, index, &keys.item_time_end_key)?;

    Ok(Item {
        id,
        group,
        start_time,
        end_time,
        title: text(object, &keys.item_title_key),
        class_name: flag_value(object, "className", "class_name")
            .and_then(Value::as_str)
            .map(str::to_string),
        can_move: bool_flag(object, "canMove", "can_move"),
        can_resize: flag_value(object, "canResize", "can_resize").and_then(resize_capability),
        can_change_group: bool_flag(object, "canChangeGroup", "can_change_group"),
        can_select: bool_flag(object, "canSelect", "can_select"),
    })
}

fn as_object(record: &Value, index: usize) -> Result<&Map<String, Value>, ParseError> {
    record.as_object().ok_or_else(|| ParseError::InvalidJson {
        record: index,
        message: "record must be a JSON object".to_string(),
    })
}

fn required<'a>(object: &'a Map<String, Value>, index: usize, field: &str) -> Result<&'a Value, ParseError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ParseError::MissingField {
            record: index,
            field: field.to_string(),
        }),
        Some(value) => Ok(value),
    }
}

fn identifier(object: &Map<String, Value>, index: usize, field: &str) -> Result<String, ParseError> {
    match required(object, index, field)? {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ParseError::InvalidIdentifier {
            record: index,
            field: field.to_string(),
            raw: other.to_string(),
        }),
    }
}

fn timestamp(object: &Map<String, Value>, index: usize, field: &str) -> Result<EpochMillis, ParseError> {
    let value = required(object, index, field)?;
    let invalid = || ParseError::InvalidTimestamp {
        record: index,
        field: field.to_string(),
        raw: value.to_string(),
    };

    match value {
        Value::Number(n) => match n.as_i64() {
            Some(ms) => Ok(ms),
            None => n
                .as_f64()
                .filter(|ms| ms.is_finite() && ms.abs() < i64::MAX as f64)
                .map(|ms| ms.round() as i64)
                .ok_or_else(invalid),
        },
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag_value<'a>(object: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    object.get(camel).or_else(|| object.get(snake))
}

fn bool_flag(object: &Map<String, Value>, camel: &str, snake: &str) -> Option<bool> {
    flag_value(object, camel, snake).and_then(Value::as_bool)
}

fn resize_capability(value: &Value) -> Option<ResizeCapability> {
    match value {
        Value::Bool(enabled) => Some(ResizeCapability::from(*enabled)),
        Value::String(s) => ResizeCapability::parse(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys() -> Keys {
        Keys::default()
    }

    #[test]
    fn parses_groups_and_items() {
        let raw = r#"{
            "groups": [{"id": "g1", "title": "Group 1"}, {"id": 2}],
            "items": [{"id": 1, "group": "g1", "title": "A", "start_time": 0, "end_time": 3600000}]
        }"#;
        let doc = parse_document(raw, &keys()).unwrap();

        assert_eq!(doc.groups.len(), 2);
        assert_eq!(doc.groups[1].id.as_str(), "2");
        assert_eq!(doc.groups[0].title.as_deref(), Some("Group 1"));
        assert_eq!(doc.items[0].id.as_str(), "1");
        assert_eq!(doc.items[0].end_time, 3_600_000);
        assert!(doc.malformed.is_empty());
    }

    #[test]
    fn missing_arrays_are_empty() {
        let doc = parse_document("{}", &keys()).unwrap();
        assert_eq!(doc, TimelineDocument::default());
    }

    #[test]
    fn non_object_document_is_fatal() {
        assert!(matches!(
            parse_document("[1, 2]", &keys()),
            Err(ParseError::InvalidJson { record: 0, .. })
        ));
        assert!(parse_document("{not json", &keys()).is_err());
        assert!(parse_document(r#"{"items": 3}"#, &keys()).is_err());
    }

    #[test]
    fn rfc3339_times_are_converted() {
        let record = json!({
            "id": "a", "group": "g",
            "start_time": "1970-01-01T01:00:00Z",
            "end_time": "1970-01-01T02:00:00+01:00"
        });
        let item = parse_item(&record, 0, &keys()).unwrap();
        assert_eq!(item.start_time, 3_600_000);
        assert_eq!(item.end_time, 3_600_000);
    }

    #[test]
    fn float_times_are_rounded() {
        let record = json!({"id": "a", "group": "g", "start_time": 10.6, "end_time": 20});
        assert_eq!(parse_item(&record, 0, &keys()).unwrap().start_time, 11);
    }

    #[test]
    fn remapped_keys_are_used_and_reported() {
        let keys = Keys {
            item_time_start_key: "from".to_string(),
            item_time_end_key: "to".to_string(),
            item_group_key: "row".to_string(),
            ..Keys::default()
        };
        let ok = json!({"id": "a", "row": "g", "from": 1, "to": 2});
        assert_eq!(parse_item(&ok, 0, &keys).unwrap().group.as_str(), "g");

        let missing = json!({"id": "a", "row": "g", "from": 1});
        assert_eq!(
            parse_item(&missing, 4, &keys),
            Err(ParseError::MissingField {
                record: 4,
                field: "to".to_string()
            })
        );
    }

    #[test]
    fn capability_flags_accept_both_spellings() {
        let record = json!({
            "id": "a", "group": "g", "start_time": 0, "end_time": 1,
            "canMove": false, "can_resize": "left", "canSelect": true, "className": "busy"
        });
        let item = parse_item(&record, 0, &keys()).unwrap();
        assert_eq!(item.can_move, Some(false));
        assert_eq!(item.can_resize, Some(ResizeCapability::Left));
        assert_eq!(item.can_select, Some(true));
        assert_eq!(item.can_change_group, None);
        assert_eq!(item.class_name.as_deref(), Some("busy"));
    }

    #[test]
    fn resize_true_means_right() {
        let record = json!({"id": "a", "group": "g", "start_time": 0, "end_time": 1, "canResize": true});
        assert_eq!(
            parse_item(&record, 0, &keys()).unwrap().can_resize,
            Some(ResizeCapability::Right)
        );
    }

    #[test]
    fn bad_records_are_collected_not_fatal() {
        let raw = r#"{
            "groups": [{"id": ""}, {"id": "g"}],
            "items": [
                {"id": "ok", "group": "g", "start_time": 0, "end_time": 1},
                {"id": "bad", "group": "g", "start_time": "yesterday", "end_time": 1},
                "not an object"
            ]
        }"#;
        let doc = parse_document(raw, &keys()).unwrap();

        assert_eq!(doc.groups.len(), 1);
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.malformed.len(), 3);

        let kinds: Vec<_> = doc.malformed.iter().map(|m| (m.kind(), m.index())).collect();
        assert_eq!(
            kinds,
            vec![(RecordKind::Group, 0), (RecordKind::Item, 1), (RecordKind::Item, 2)]
        );
        assert!(matches!(
            doc.malformed[1].error(),
            ParseError::InvalidTimestamp { raw, .. } if raw == "\"yesterday\""
        ));
    }

    #[test]
    fn boolean_id_is_invalid_identifier() {
        let record = json!({"id": true, "group": "g", "start_time": 0, "end_time": 1});
        assert!(matches!(
            parse_item(&record, 0, &keys()),
            Err(ParseError::InvalidIdentifier { .. })
        ));
    }
}
