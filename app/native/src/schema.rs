//! JSON Schema for the Backdrop configuration file.

use crate::config::BackdropConfig;

/// Identifier embedded in the generated schema.
const SCHEMA_ID: &str = "https://raw.githubusercontent.com/backdrop-wm/backdrop/main/backdrop.schema.json";

/// Generates a JSON Schema for the Backdrop configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(BackdropConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!(SCHEMA_ID));
    }

    schema
}

/// Generates a pretty-printed JSON Schema string for the Backdrop configuration.
#[must_use]
pub fn print_schema() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
