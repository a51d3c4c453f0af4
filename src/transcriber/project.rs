//! Project records as returned by the Beey API.
//!
//! The service is loose about its payloads: fields come and go, arrive as
//! `null`, or sit under a `Data` wrapper. [`Project::from_response`] absorbs
//! all of that and hands back a fully populated value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::state::ProcessingState;

/// One transcription project on the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    /// Capability token required to add or remove tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_token: i64,
    #[serde(default, with = "timestamp")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub delete_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub description: Option<ProjectDescription>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_read_only: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_team_project: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords_highlight: Vec<KeywordHighlight>,
    /// Duration exactly as the service formats it
    #[serde(default, deserialize_with = "null_as_default")]
    pub length: String,
    #[serde(default)]
    pub media_info: Option<MediaInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processing_state: ProcessingState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub share_count: i64,
    #[serde(default, deserialize_with = "unique_tags")]
    pub tags: Vec<String>,
    /// Service-owned configuration, passed through untouched
    #[serde(default)]
    pub transcription_config: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescription {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, with = "timestamp")]
    pub start: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordHighlight {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_video: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_packaged: bool,
}

impl Project {
    /// Builds a project from a response body, unwrapping a top-level `Data` key if present.
    ///
    /// # Errors
    /// - If `id` is missing
    /// - If a field has the wrong JSON type or a timestamp cannot be parsed
    pub fn from_response(payload: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(unwrap_data(payload))
    }

    /// Serializes back into the shape the API uses, with timestamps in one fixed format.
    pub fn to_wire_format(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Returns the value under a top-level `Data` key, or the payload itself.
pub(crate) fn unwrap_data(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) => match map.remove("Data") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tags behave as a set: later duplicates are dropped, first-seen order is kept.
fn unique_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags: Vec<String> = null_as_default(deserializer)?;
    Ok(dedupe(tags))
}

pub(crate) fn dedupe(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

/// Timestamps in, fixed `YYYY-MM-DDTHH:MM:SS.mmmZ` out.
///
/// The service sometimes omits the offset; such values are taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unparsable timestamp '{raw}'")))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_payload() -> Value {
        json!({
            "id": 42,
            "accessToken": 7001,
            "created": "2024-03-01T10:15:30.000Z",
            "updated": "2024-03-01T11:00:00.250Z",
            "deleteAt": null,
            "expirationDate": "2024-06-01T00:00:00.000Z",
            "creatorId": 9,
            "description": {
                "author": "Jana",
                "name": "Interview",
                "notes": "second take",
                "start": "2024-03-01T09:00:00.000Z"
            },
            "isReadOnly": false,
            "isTeamProject": true,
            "keywordsHighlight": [
                {
                    "category": "names",
                    "highlight": "yellow",
                    "text": "Novak",
                    "timestampMs": 1500,
                    "type": "speaker"
                }
            ],
            "length": "00:12:05.4000000",
            "mediaInfo": { "hasVideo": true, "isPackaged": false },
            "processingState": "Completed",
            "shareCount": 3,
            "tags": ["news", "radio"],
            "transcriptionConfig": { "lang": "cs-CZ", "profile": { "ppc": true } }
        })
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let project = Project::from_response(json!({ "id": 5 })).unwrap();
        assert_eq!(project.id, 5);
        assert_eq!(project.access_token, 0);
        assert!(project.created.is_none());
        assert!(project.updated.is_none());
        assert!(project.delete_at.is_none());
        assert!(project.expiration_date.is_none());
        assert!(project.creator_id.is_none());
        assert!(project.description.is_none());
        assert!(!project.is_read_only);
        assert!(!project.is_team_project);
        assert!(project.keywords_highlight.is_empty());
        assert_eq!(project.length, "");
        assert!(project.media_info.is_none());
        assert_eq!(project.processing_state, ProcessingState::None);
        assert_eq!(project.share_count, 0);
        assert!(project.tags.is_empty());
        assert_eq!(project.transcription_config, Value::Null);
    }

    #[test]
    fn test_null_fields_default() {
        let project = Project::from_response(json!({
            "id": 5,
            "accessToken": null,
            "isReadOnly": null,
            "keywordsHighlight": null,
            "length": null,
            "processingState": null,
            "shareCount": null,
            "tags": null
        }))
        .unwrap();
        assert_eq!(project.access_token, 0);
        assert!(!project.is_read_only);
        assert!(project.keywords_highlight.is_empty());
        assert_eq!(project.processing_state, ProcessingState::None);
        assert!(project.tags.is_empty());
    }

    #[test]
    fn test_data_wrapper_is_transparent() {
        let wrapped = Project::from_response(json!({ "Data": full_payload() })).unwrap();
        let bare = Project::from_response(full_payload()).unwrap();
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_round_trip_reproduces_payload() {
        let payload = full_payload();
        let project = Project::from_response(payload.clone()).unwrap();
        assert_eq!(project.to_wire_format().unwrap(), payload);
    }

    #[test]
    fn test_keyword_without_text_round_trips() {
        let mut payload = full_payload();
        payload["keywordsHighlight"][0]["text"] = Value::Null;
        let project = Project::from_response(payload.clone()).unwrap();
        assert!(project.keywords_highlight[0].text.is_none());
        assert_eq!(project.to_wire_format().unwrap(), payload);
    }

    #[test]
    fn test_timestamps_are_normalized() {
        let mut payload = full_payload();
        payload["created"] = json!("2024-03-01T12:15:30+02:00");
        payload["updated"] = json!("2024-03-01T11:00:00.25");
        let wire = Project::from_response(payload).unwrap().to_wire_format().unwrap();
        assert_eq!(wire["created"], json!("2024-03-01T10:15:30.000Z"));
        assert_eq!(wire["updated"], json!("2024-03-01T11:00:00.250Z"));
    }

    #[test]
    fn test_unparsable_timestamp_fails() {
        let err = Project::from_response(json!({ "id": 1, "created": "yesterday" })).unwrap_err();
        assert!(err.to_string().contains("unparsable timestamp"));
    }

    #[test]
    fn test_missing_id_fails() {
        assert!(Project::from_response(json!({ "length": "00:01:00" })).is_err());
    }

    #[test]
    fn test_duplicate_tags_collapse_in_order() {
        let project =
            Project::from_response(json!({ "id": 1, "tags": ["b", "a", "b", "c", "a"] })).unwrap();
        assert_eq!(project.tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_unknown_processing_state_is_malformed() {
        assert!(Project::from_response(json!({ "id": 1, "processingState": "Queued" })).is_err());
    }
}
