//! Conversation records as found in the raw export
//!
//! Records are extracted field by field from the raw JSON so that a single
//! malformed record never aborts the run. Fields that are missing or have the
//! wrong type fall back to defaults and are reported as [`Anomaly`] values.
//! The raw element is kept so `conversations.json` can be re-emitted verbatim.

use serde_json::{Map, Value};

/// Number of phenomenology rating dimensions
pub const RATING_COUNT: usize = 8;

/// Display names of the rating dimensions, in `rating_1..rating_8` order
pub const DIMENSION_NAMES: [&str; RATING_COUNT] = [
    "Flow Quality",
    "Affective Temperature",
    "Cohesion",
    "Agency",
    "Metacognition",
    "Attention Breadth",
    "Resolution",
    "Thought Complexity",
];

/// Fallback for a missing `model` or `api`
pub const UNKNOWN: &str = "unknown";

/// A record-level shape problem tolerated with a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    /// Field that was missing, mistyped or inconsistent
    pub field: &'static str,
    /// What was wrong with it
    pub reason: &'static str,
}

impl Anomaly {
    fn missing(field: &'static str) -> Self {
        Anomaly {
            field,
            reason: "missing",
        }
    }

    fn wrong_type(field: &'static str) -> Self {
        Anomaly {
            field,
            reason: "wrong type",
        }
    }
}

/// One logged trial
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub model: String,
    pub api: String,
    pub timestamp: Option<String>,
    /// The model's freely chosen prompt
    pub prompt: Option<String>,
    pub response: Option<String>,
    pub response_length: u64,
    pub success: bool,
    pub error: Option<String>,
    /// Phase-3 introspective report
    pub introspection: Option<String>,
    pub introspection_length: u64,
    /// All eight ratings, only when the record is rated
    pub ratings: Option<[i64; RATING_COUNT]>,
    /// The element exactly as read from the export
    pub raw: Value,
}

impl ConversationRecord {
    /// Extract a record from one element of the export array
    pub fn from_value(value: Value) -> (Self, Vec<Anomaly>) {
        let mut anomalies = Vec::new();
        let empty = Map::new();
        let fields = match &value {
            Value::Object(map) => map,
            _ => {
                anomalies.push(Anomaly {
                    field: "record",
                    reason: "not an object",
                });
                &empty
            }
        };

        let model = required_str(fields, "model", &mut anomalies).unwrap_or_else(|| UNKNOWN.into());
        let api = required_str(fields, "api", &mut anomalies).unwrap_or_else(|| UNKNOWN.into());
        let timestamp = required_str(fields, "timestamp", &mut anomalies);

        let success = match fields.get("success") {
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                anomalies.push(Anomaly::wrong_type("success"));
                false
            }
            None => {
                anomalies.push(Anomaly::missing("success"));
                false
            }
        };

        let response = optional_str(fields, "response", &mut anomalies);
        let error = optional_str(fields, "error", &mut anomalies);
        if success && error.is_some() {
            anomalies.push(Anomaly {
                field: "error",
                reason: "set on a successful record",
            });
        }

        let response_length = match fields.get("response_length") {
            Some(v) => v.as_u64().unwrap_or_else(|| {
                anomalies.push(Anomaly::wrong_type("response_length"));
                0
            }),
            None => {
                anomalies.push(Anomaly::missing("response_length"));
                0
            }
        };

        let prompt = chosen_prompt(fields, &mut anomalies);
        let introspection = optional_str(fields, "prompt3_response", &mut anomalies);
        let introspection_length = match fields.get("prompt3_response_length") {
            None | Some(Value::Null) => 0,
            Some(v) => v.as_u64().unwrap_or_else(|| {
                anomalies.push(Anomaly::wrong_type("prompt3_response_length"));
                0
            }),
        };

        let ratings = extract_ratings(fields, &mut anomalies);

        let record = ConversationRecord {
            model,
            api,
            timestamp,
            prompt,
            response,
            response_length,
            success,
            error,
            introspection,
            introspection_length,
            ratings,
            raw: value,
        };
        (record, anomalies)
    }

    /// True when the record completed phase 3 with a non-empty report
    pub fn has_introspection(&self) -> bool {
        self.introspection.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// True when the record carries all eight ratings
    pub fn is_rated(&self) -> bool {
        self.ratings.is_some()
    }

    /// The raw element annotated with its conversation id. Elements that
    /// are not objects are returned unchanged.
    pub fn annotated(&self, id: usize) -> Value {
        let mut raw = self.raw.clone();
        if let Value::Object(map) = &mut raw {
            map.insert("id".to_string(), Value::from(id));
        }
        raw
    }
}

fn required_str(
    raw: &Map<String, Value>,
    field: &'static str,
    anomalies: &mut Vec<Anomaly>,
) -> Option<String> {
    match raw.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            anomalies.push(Anomaly::missing(field));
            None
        }
        Some(_) => {
            anomalies.push(Anomaly::wrong_type(field));
            None
        }
    }
}

fn optional_str(
    raw: &Map<String, Value>,
    field: &'static str,
    anomalies: &mut Vec<Anomaly>,
) -> Option<String> {
    match raw.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => None,
        Some(_) => {
            anomalies.push(Anomaly::wrong_type(field));
            None
        }
    }
}

/// The chosen prompt lives in `conversation_context.prompt1_response`; older
/// exports carried it as a top-level `prompt`.
fn chosen_prompt(raw: &Map<String, Value>, anomalies: &mut Vec<Anomaly>) -> Option<String> {
    match raw.get("conversation_context") {
        Some(Value::Object(ctx)) => optional_str(ctx, "prompt1_response", anomalies),
        Some(Value::Null) | None => optional_str(raw, "prompt", anomalies),
        Some(_) => {
            anomalies.push(Anomaly::wrong_type("conversation_context"));
            None
        }
    }
}

fn extract_ratings(
    raw: &Map<String, Value>,
    anomalies: &mut Vec<Anomaly>,
) -> Option<[i64; RATING_COUNT]> {
    if !matches!(raw.get("has_ratings"), Some(Value::Bool(true))) {
        return None;
    }

    let mut ratings = [0i64; RATING_COUNT];
    for (slot, rating) in ratings.iter_mut().enumerate() {
        let key = format!("rating_{}", slot + 1);
        match raw.get(&key).and_then(Value::as_i64) {
            Some(v) => *rating = v,
            None => {
                anomalies.push(Anomaly {
                    field: "has_ratings",
                    reason: "set without all eight numeric ratings",
                });
                return None;
            }
        }
    }

    if ratings.iter().any(|r| !(1..=10).contains(r)) {
        anomalies.push(Anomaly {
            field: "ratings",
            reason: "outside 1..=10",
        });
    }

    Some(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_record() -> Value {
        json!({
            "agent_id": "agent-7",
            "model": "anthropic/claude-3.7",
            "api": "openrouter",
            "temperature": 1.0,
            "prompt_num": 2,
            "timestamp": "2025-10-10T12:00:00",
            "conversation_context": {
                "prompt1_question": "What would you like to talk about?",
                "prompt1_response": "Describe a quiet room.",
                "prompt2_request": "Please respond to your prompt."
            },
            "response": "The room hums.",
            "response_length": 14,
            "success": true,
            "error": null,
            "prompt3_response": "It felt calm.",
            "prompt3_response_length": 13,
            "has_ratings": true,
            "rating_1": 7, "rating_2": 5, "rating_3": 8, "rating_4": 6,
            "rating_5": 9, "rating_6": 4, "rating_7": 7, "rating_8": 6
        })
    }

    #[test]
    fn test_full_record_has_no_anomalies() {
        let (record, anomalies) = ConversationRecord::from_value(full_record());
        assert!(anomalies.is_empty(), "{:?}", anomalies);
        assert_eq!(record.model, "anthropic/claude-3.7");
        assert_eq!(record.prompt.as_deref(), Some("Describe a quiet room."));
        assert_eq!(record.response_length, 14);
        assert_eq!(record.introspection_length, 13);
        assert!(record.has_introspection());
        assert_eq!(record.ratings, Some([7, 5, 8, 6, 9, 4, 7, 6]));
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let (record, anomalies) = ConversationRecord::from_value(json!({}));
        assert_eq!(record.model, UNKNOWN);
        assert_eq!(record.api, UNKNOWN);
        assert_eq!(record.response_length, 0);
        assert!(!record.success);
        assert!(record.timestamp.is_none());
        let fields: Vec<_> = anomalies.iter().map(|a| a.field).collect();
        assert_eq!(
            fields,
            vec!["model", "api", "timestamp", "success", "response_length"]
        );
    }

    #[test]
    fn test_non_object_record_is_tolerated() {
        let (record, anomalies) = ConversationRecord::from_value(json!(42));
        assert_eq!(record.model, UNKNOWN);
        assert_eq!(anomalies[0].field, "record");
    }

    #[test]
    fn test_non_object_record_is_emitted_unchanged() {
        let (record, _) = ConversationRecord::from_value(json!("garbage"));
        assert_eq!(record.annotated(5), json!("garbage"));

        let (record, _) = ConversationRecord::from_value(json!([1, 2]));
        assert_eq!(record.annotated(0), json!([1, 2]));
    }

    #[test]
    fn test_wrong_type_model_is_unknown() {
        let mut value = full_record();
        value["model"] = json!(17);
        let (record, anomalies) = ConversationRecord::from_value(value);
        assert_eq!(record.model, UNKNOWN);
        assert_eq!(anomalies, vec![Anomaly::wrong_type("model")]);
    }

    #[test]
    fn test_has_ratings_without_all_ratings_is_unrated() {
        let mut value = full_record();
        value.as_object_mut().unwrap().remove("rating_8");
        let (record, anomalies) = ConversationRecord::from_value(value);
        assert!(!record.is_rated());
        assert_eq!(anomalies[0].field, "has_ratings");
    }

    #[test]
    fn test_ratings_ignored_without_flag() {
        let mut value = full_record();
        value["has_ratings"] = json!(false);
        let (record, anomalies) = ConversationRecord::from_value(value);
        assert!(record.ratings.is_none());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_out_of_range_rating_is_kept_but_reported() {
        let mut value = full_record();
        value["rating_3"] = json!(11);
        let (record, anomalies) = ConversationRecord::from_value(value);
        assert_eq!(record.ratings.unwrap()[2], 11);
        assert_eq!(anomalies[0].field, "ratings");
    }

    #[test]
    fn test_error_on_success_is_reported() {
        let mut value = full_record();
        value["error"] = json!("timeout");
        let (_, anomalies) = ConversationRecord::from_value(value);
        assert_eq!(anomalies[0].field, "error");
    }

    #[test]
    fn test_top_level_prompt_fallback() {
        let (record, _) = ConversationRecord::from_value(json!({
            "model": "m", "api": "a", "timestamp": "t", "success": false,
            "response_length": 0, "prompt": "legacy prompt"
        }));
        assert_eq!(record.prompt.as_deref(), Some("legacy prompt"));
    }

    #[test]
    fn test_annotated_appends_id_and_keeps_fields() {
        let (record, _) = ConversationRecord::from_value(full_record());
        let annotated = record.annotated(3);
        assert_eq!(annotated["id"], 3);
        assert_eq!(annotated["agent_id"], "agent-7");
        let keys: Vec<_> = annotated.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("agent_id"));
        assert_eq!(keys.last().map(String::as_str), Some("id"));
    }
}
