use regex::Regex;
use std::sync::OnceLock;

fn ecommerce_host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)shopee|lazada|amazon|tokopedia|alibaba|taobao|ebay|zalora").unwrap()
    })
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

/// Spec §4.2 step 6: e-commerce URLs redirect web-fetch tools to the
/// JS-rendering variant. `fetchWebPage` is the only tool this rewrite
/// applies to; any other tool id (including `fetchJsPage` itself) passes
/// through unchanged.
pub fn ecommerce_auto_switch(tool_id: &str, url: Option<&str>) -> String {
    if tool_id != "fetchWebPage" {
        return tool_id.to_string();
    }
    match url {
        Some(url) if ecommerce_host_pattern().is_match(url) => "fetchJsPage".to_string(),
        _ => "fetchWebPage".to_string(),
    }
}

/// True if the raw user message contains a bare URL alongside a chat tool
/// invocation, marking it to prefetch the URL before the chat call (spec
/// §4.2 step 6).
pub fn bare_url_in_message(message: &str) -> Option<&str> {
    url_pattern().find(message).map(|m| m.as_str())
}
