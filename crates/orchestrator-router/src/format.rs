use serde_json::Value;

/// Spec §4.2 step 11: prefer `summary`, else `message`/`content`/
/// `response`/`text`, else a tabular preview for row-shaped data, else
/// JSON pretty-print.
pub fn format_output(output: &Value) -> String {
    if let Some(text) = preferred_text_field(output) {
        return text;
    }
    if let Some(table) = tabular_preview(output) {
        return table;
    }
    serde_json::to_string_pretty(output).unwrap_or_else(|_| output.to_string())
}

fn preferred_text_field(output: &Value) -> Option<String> {
    let object = output.as_object()?;
    for key in ["summary", "message", "content", "response", "text"] {
        if let Some(Value::String(s)) = object.get(key) {
            return Some(s.clone());
        }
    }
    None
}

/// Row-shaped data: an array of objects, or a single top-level key whose
/// value is such an array (e.g. `{"rows": [...]}`, `{"results": [...]}`).
fn tabular_preview(output: &Value) -> Option<String> {
    let rows = match output {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.values().find_map(|v| v.as_array().cloned())?,
        _ => return None,
    };
    if rows.is_empty() || !rows.iter().all(|r| r.is_object()) {
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        if let Some(obj) = row.as_object() {
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str(&columns.join(" | "));
    out.push('\n');
    for row in &rows {
        let obj = row.as_object().unwrap();
        let cells: Vec<String> = columns
            .iter()
            .map(|c| obj.get(c).map(render_cell).unwrap_or_default())
            .collect();
        out.push_str(&cells.join(" | "));
        out.push('\n');
    }
    Some(out.trim_end().to_string())
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Appends blocked-tool notices to a formatted response (spec §4.2 step
/// 12).
pub fn append_blocked_notices(mut response: String, blocked_reasons: &[String]) -> String {
    for reason in blocked_reasons {
        response.push_str("\n\n");
        response.push_str(reason);
    }
    response
}
