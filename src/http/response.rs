use serde::Serialize;
use serde_json::Value;

/// Raw bodies that do not parse as JSON are kept up to this many characters.
pub const MAX_TEXT_BODY_CHARS: usize = 500;

/// Response body as recorded on an outcome: parsed JSON when possible, otherwise a
/// truncated copy of the text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => {
                let text = String::from_utf8_lossy(bytes);
                ResponseBody::Text(text.chars().take(MAX_TEXT_BODY_CHARS).collect())
            }
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResponseBody::Json(value) => value.is_null(),
            ResponseBody::Text(text) => text.is_empty(),
        }
    }

    /// Top-level keys from `required` that are absent. Only meaningful for JSON
    /// objects; any other body shape reports nothing missing.
    pub fn missing_fields(&self, required: &[String]) -> Vec<String> {
        let Some(Value::Object(map)) = self.as_json() else {
            return Vec::new();
        };
        required
            .iter()
            .filter(|field| !map.contains_key(field.as_str()))
            .cloned()
            .collect()
    }

    /// Pretty-printed body cut to `max_chars`, for console excerpts.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let full = match self {
            ResponseBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ResponseBody::Text(text) => text.clone(),
        };
        full.chars().take(max_chars).collect()
    }
}
