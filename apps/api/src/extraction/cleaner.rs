//! Response cleaner: turns raw model output into a best-effort JSON object string.
//!
//! Steps, in order (each a no-op when its trigger is absent):
//! 1. trim
//! 2. drop the first `<think>…</think>` reasoning block
//! 3. keep only the first ```` ```json ```` fence, else the first plain fence
//! 4. slice from the first `{` to the last `}`
//! 5. trim

use crate::extraction::error::ExtractionError;

pub const REASONING_OPEN: &str = "<think>";
pub const REASONING_CLOSE: &str = "</think>";

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

pub fn clean_response(raw: &str) -> Result<String, ExtractionError> {
    let text = strip_reasoning(raw.trim());
    let text = unfence(&text);
    slice_object(text)
        .map(|json| json.trim().to_string())
        .ok_or(ExtractionError::NoJsonFound)
}

/// Removes the first opening marker through the first closing marker after it.
fn strip_reasoning(text: &str) -> String {
    let Some(start) = text.find(REASONING_OPEN) else {
        return text.to_string();
    };
    let Some(close) = text[start..].find(REASONING_CLOSE) else {
        return text.to_string();
    };
    let end = start + close + REASONING_CLOSE.len();

    let mut kept = String::with_capacity(text.len() - (end - start));
    kept.push_str(&text[..start]);
    kept.push_str(text[end..].trim());
    kept
}

/// Content of the first fenced block, preferring a block tagged `json`.
/// An unterminated fence runs to the end of the text.
fn unfence(text: &str) -> &str {
    let after = if let Some(start) = text.find(JSON_FENCE) {
        &text[start + JSON_FENCE.len()..]
    } else if let Some(start) = text.find(FENCE) {
        &text[start + FENCE.len()..]
    } else {
        return text;
    };

    match after.find(FENCE) {
        Some(end) => &after[..end],
        None => after,
    }
}

fn slice_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
