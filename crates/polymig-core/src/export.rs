use serde::Serialize;

/// Pretty-prints any serializable value as indented JSON, the format the
/// CLI dumps emitted rule-set policies and external networks in.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
