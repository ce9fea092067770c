//! Click details.
//!
//! A click is reduced to the hover text of the element under the cursor;
//! the detail panel then shows that text or a prompt.

use serde_json::Value;

use crate::constants::DETAIL_PLACEHOLDER;

/// Hover text of the first clicked point in a Plotly click payload.
///
/// Returns `None` for empty payloads and for elements without hover text
/// (Earth, stars).
pub fn clicked_hovertext(click: &Value) -> Option<String> {
    let point = click.get("points")?.get(0)?;
    match point.get("hovertext")? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Text for the detail panel given the last stored click.
pub fn detail_text(stored: Option<&str>) -> String {
    match stored {
        Some(text) if !text.is_empty() => format!("Details: {}", text),
        _ => DETAIL_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_before_any_click() {
        assert_eq!(detail_text(None), "Click on a line to see details...");
    }

    #[test]
    fn test_detail_prefix() {
        assert_eq!(
            detail_text(Some("Time to Kepler-1b: 32.62 years")),
            "Details: Time to Kepler-1b: 32.62 years"
        );
    }

    #[test]
    fn test_empty_text_shows_placeholder() {
        assert_eq!(detail_text(Some("")), DETAIL_PLACEHOLDER);
    }

    #[test]
    fn test_clicked_route() {
        let click = json!({
            "points": [{"curveNumber": 3, "pointNumber": 1, "hovertext": "Time to A: 4.24 years"}]
        });
        assert_eq!(clicked_hovertext(&click).as_deref(), Some("Time to A: 4.24 years"));
    }

    #[test]
    fn test_click_without_hovertext() {
        assert!(clicked_hovertext(&json!({"points": [{"curveNumber": 2}]})).is_none());
        assert!(clicked_hovertext(&json!({"points": []})).is_none());
        assert!(clicked_hovertext(&json!(null)).is_none());
    }
}
