use orchestrator_core::Parameters;
use serde_json::Value;

/// The chain placeholders recognized inside string parameter values, per
/// spec §6. `{AI_GENERATED}` is accepted for parity with the sentinel
/// list even though no built-in tool currently produces it.
pub struct PlaceholderContext {
    pub previous_output: Option<String>,
    pub search_results: Option<String>,
    pub scraped_data: Option<String>,
    pub ai_generated: Option<String>,
}

impl PlaceholderContext {
    pub fn empty() -> Self {
        Self {
            previous_output: None,
            search_results: None,
            scraped_data: None,
            ai_generated: None,
        }
    }

    fn substitutions(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("{PREVIOUS_OUTPUT}", self.previous_output.as_deref()),
            ("{SEARCH_RESULTS}", self.search_results.as_deref()),
            ("{SCRAPED_DATA}", self.scraped_data.as_deref()),
            ("{AI_GENERATED}", self.ai_generated.as_deref()),
        ]
    }
}

/// Resolves placeholder tokens inside every string value of `parameters`.
/// This is an intentional textual concatenation protocol (design note
/// §9): the literal surface syntax is preserved and substitution is a
/// plain substring replace, not templating. Non-string values pass
/// through untouched, so a parameter record with no placeholder tokens is
/// returned unchanged under structural equality (placeholder purity).
pub fn resolve_placeholders(parameters: &Parameters, ctx: &PlaceholderContext) -> Parameters {
    parameters
        .iter()
        .map(|(key, value)| (key.clone(), resolve_value(value, ctx)))
        .collect()
}

fn resolve_value(value: &Value, ctx: &PlaceholderContext) -> Value {
    match value {
        Value::String(s) => Value::String(resolve_string(s, ctx)),
        Value::Array(items) => Value::Array(items.iter().map(|v| resolve_value(v, ctx)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, ctx)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve_string(input: &str, ctx: &PlaceholderContext) -> String {
    let mut out = input.to_string();
    for (token, replacement) in ctx.substitutions() {
        if let Some(replacement) = replacement {
            out = out.replace(token, replacement);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn purity_with_no_tokens() {
        let mut params = Parameters::new();
        params.insert("q".into(), json!("dogs"));
        params.insert("limit".into(), json!(5));
        let ctx = PlaceholderContext {
            previous_output: Some("anything".into()),
            ..PlaceholderContext::empty()
        };
        let resolved = resolve_placeholders(&params, &ctx);
        assert_eq!(Value::Object(resolved), Value::Object(params));
    }

    #[test]
    fn substitutes_search_results_into_prompt() {
        let mut params = Parameters::new();
        params.insert(
            "prompt".into(),
            json!("summarize {SEARCH_RESULTS}"),
        );
        let ctx = PlaceholderContext {
            search_results: Some(r#"[{"title":"A"}]"#.into()),
            ..PlaceholderContext::empty()
        };
        let resolved = resolve_placeholders(&params, &ctx);
        assert_eq!(
            resolved.get("prompt").unwrap().as_str().unwrap(),
            r#"summarize [{"title":"A"}]"#
        );
    }

    #[test]
    fn non_string_values_pass_through() {
        let mut params = Parameters::new();
        params.insert("count".into(), json!(3));
        params.insert("flag".into(), json!(true));
        let ctx = PlaceholderContext::empty();
        let resolved = resolve_placeholders(&params, &ctx);
        assert_eq!(resolved.get("count"), Some(&json!(3)));
        assert_eq!(resolved.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn missing_placeholder_value_leaves_token_unresolved() {
        let mut params = Parameters::new();
        params.insert("prompt".into(), json!("use {PREVIOUS_OUTPUT} here"));
        let ctx = PlaceholderContext::empty();
        let resolved = resolve_placeholders(&params, &ctx);
        // No previous output registered: literal token stays, documenting
        // the "resolved-but-missing" hazard from design note §9.
        assert_eq!(
            resolved.get("prompt").unwrap().as_str().unwrap(),
            "use {PREVIOUS_OUTPUT} here"
        );
    }
}
