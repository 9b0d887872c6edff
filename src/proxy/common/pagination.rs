// Page envelope normalizer
// Projects the downstream's loosely typed page body onto PageResult

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Article, PageResult};
use crate::proxy::error::{FacadeError, FacadeResult};

/// Recognized envelope fields. Everything else is dropped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageEnvelope {
    #[serde(default)]
    content: Option<Vec<Article>>,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_elements: Option<u64>,
}

/// Convert a downstream page envelope into a [`PageResult`].
///
/// Absent or `null` fields become zero values. A non-object envelope, or a
/// recognized field of the wrong type, is a downstream contract violation.
pub fn normalize_page(envelope: Value) -> FacadeResult<PageResult> {
    let envelope = match envelope {
        Value::Null => PageEnvelope::default(),
        object @ Value::Object(_) => serde_json::from_value::<PageEnvelope>(object)
            .map_err(|e| FacadeError::Decode(format!("Invalid page envelope: {}", e)))?,
        other => {
            return Err(FacadeError::Decode(format!(
                "Page envelope must be an object, got {}",
                json_kind(&other)
            )))
        }
    };

    Ok(PageResult {
        content: envelope.content.unwrap_or_default(),
        size: envelope.size.unwrap_or_default(),
        number: envelope.number.unwrap_or_default(),
        total_pages: envelope.total_pages.unwrap_or_default(),
        total_elements: envelope.total_elements.unwrap_or_default(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
