//! Reading page properties and building blocks.

use serde_json::{json, Value};

/// Text of a `title` or `rich_text` property. `None` when empty.
pub(super) fn plain_text(property: &Value) -> Option<String> {
    let runs = property["title"]
        .as_array()
        .or_else(|| property["rich_text"].as_array())?;
    let text: String = runs
        .iter()
        .filter_map(|run| run["plain_text"].as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

pub(super) fn checkbox(property: &Value) -> bool {
    property["checkbox"].as_bool().unwrap_or(false)
}

pub(super) fn number(property: &Value) -> Option<f64> {
    property["number"].as_f64()
}

/// Start of a `date` property as `YYYY-MM-DD`.
pub(super) fn date_start(property: &Value) -> Option<String> {
    let start = property["date"]["start"].as_str()?;
    start.get(..10).map(str::to_string)
}

/// A formula shown as text: its string result, or a non-zero number as `"{n}H"`.
pub(super) fn formula_text(property: &Value) -> Option<String> {
    let formula = &property["formula"];
    if let Some(s) = formula["string"].as_str().filter(|s| !s.is_empty()) {
        return Some(s.to_string());
    }
    formula["number"]
        .as_f64()
        .filter(|n| *n != 0.0)
        .map(|n| format!("{n}H"))
}

/// URL of the first file in a `files` property, uploaded or external.
pub(super) fn first_file_url(property: &Value) -> Option<String> {
    let file = property["files"].get(0)?;
    file["file"]["url"]
        .as_str()
        .or_else(|| file["external"]["url"].as_str())
        .map(str::to_string)
}

pub(super) fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

pub(super) fn heading_3(content: &str) -> Value {
    json!({ "type": "heading_3", "heading_3": { "rich_text": rich_text(content) } })
}

pub(super) fn paragraph(content: &str) -> Value {
    json!({ "type": "paragraph", "paragraph": { "rich_text": rich_text(content) } })
}

/// Text of a `heading_3` block, `None` for other block types.
pub(super) fn heading_3_text(block: &Value) -> Option<String> {
    if block["type"].as_str() != Some("heading_3") {
        return None;
    }
    plain_text(&block["heading_3"])
}
