use serde_json::Value;
use std::{fs, path::PathBuf};

/// # Errors
///
/// Will return `Err` if the file is not readable or is not a json object with
/// only the fixture sections
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents =
        fs::read_to_string(&path).map_err(|e| format!("The json file '{file}' is not readable: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Shallow shape check; the full decode happens when seeding.
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
fn validate_json_format(json: &Value) -> Result<(), String> {
    let Some(object) = json.as_object() else {
        return Err("The json file is not in the correct format. Expected an object.".to_string());
    };

    let expected_keys = ["tournaments", "players", "rounds", "matches"];
    for (key, value) in object {
        if !expected_keys.contains(&key.as_str()) {
            return Err(format!(
                "The json file is not in the correct format. Expected keys: {expected_keys:?}"
            ));
        }
        if !value.is_array() {
            return Err(format!(
                "The json key {key} is not in the correct format. Expected an array."
            ));
        }
    }

    if let Some(matches) = object.get("matches").and_then(Value::as_array) {
        for m in matches {
            if !m["id"].is_string() || !m["roundId"].is_string() {
                return Err(
                    "Every match needs string id and roundId keys.".to_string(),
                );
            }
        }
    }
    Ok(())
}
