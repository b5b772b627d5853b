pub mod json_text;
pub mod model_path;
pub mod traversal;
pub mod value;

use serde_json::Value;

/// Key of the root node in expansion state and row identifiers.
pub const ROOT_NODE_KEY: &str = "Root";

/// Storage key for the last accepted input text.
pub const INPUT_JSON_STORAGE_KEY: &str = "inputJson";

/// Document shown when no previous input was stored.
pub fn sample_json() -> Value {
    serde_json::json!({
        "a": {
            "b": 0,
            "c": [
                1,
                {
                    "d": 2,
                    "e": "Hello world"
                }
            ],
            "f": {
                "g": null,
                "h": [3, 4, 5]
            },
            "My key": "My value",
            "i": true
        }
    })
}
