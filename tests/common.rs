use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn transcripts() -> Command {
    cargo_bin_cmd!("transcripts")
}

/// Write `records` as the export at the default input location
pub fn write_export(root: &Path, records: &Value) {
    let path = root.join("data").join("conversations_full.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(records).unwrap()).unwrap();
}

#[allow(dead_code)]
pub fn read_output(root: &Path, name: &str) -> Value {
    let path = root.join("client").join("public").join("data").join(name);
    serde_json::from_slice(&fs::read(&path).unwrap()).unwrap()
}

/// One fully populated, rated record
#[allow(dead_code)]
pub fn rated_record(model: &str, response: &str) -> Value {
    let mut record = serde_json::json!({
        "agent_id": "agent-1",
        "model": model,
        "api": "openrouter",
        "temperature": 1.0,
        "prompt_num": 2,
        "timestamp": "2025-10-10T12:00:00",
        "conversation_context": {
            "prompt1_question": "If you could ask anything, what would it be?",
            "prompt1_response": "Describe the feeling of finishing a long proof.",
            "prompt2_request": "Please answer the prompt you chose."
        },
        "response": response,
        "response_length": response.chars().count(),
        "success": true,
        "error": null,
        "prompt3_response": "Attention narrowed, then widened.",
        "prompt3_response_length": 33,
        "has_ratings": true
    });
    for i in 1..=8 {
        record[format!("rating_{}", i)] = serde_json::json!(i + 1);
    }
    record
}
