use crate::error::ToolError;
use crate::tool::{Tool, ToolContext};
use async_trait::async_trait;
use orchestrator_core::Parameters;
use serde_json::{json, Value};

fn require_url(parameters: &Parameters) -> Result<&str, ToolError> {
    parameters
        .get("url")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParameters("missing required string parameter \"url\"".into()))
}

async fn fetch_and_extract(url: &str) -> Result<Value, ToolError> {
    url::Url::parse(url).map_err(|e| ToolError::InvalidParameters(format!("invalid url: {e}")))?;

    let body = reqwest::get(url)
        .await
        .map_err(|e| ToolError::BackendUnavailable(e.to_string()))?
        .text()
        .await
        .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

    let document = scraper::Html::parse_document(&body);
    let title = document
        .select(&scraper::Selector::parse("title").unwrap())
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let body_selector = scraper::Selector::parse("body").unwrap();
    let text: String = document
        .select(&body_selector)
        .next()
        .map(|el| {
            el.text()
                .collect::<Vec<_>>()
                .join(" ")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Ok(json!({ "url": url, "title": title.trim(), "text": text }))
}

/// Fetches a static HTML page and returns its title plus flattened visible
/// text. Grounded in the "Web Research" fetch step of the desktop research
/// assistant teacher, rebuilt on `reqwest` + `scraper` over async/await.
pub struct FetchWebPage;

#[async_trait]
impl Tool for FetchWebPage {
    fn id(&self) -> &str {
        "fetchWebPage"
    }

    fn description(&self) -> &str {
        "Fetches a web page by URL and returns its title and visible text content."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let url = require_url(parameters)?;
        fetch_and_extract(url).await
    }
}

/// Same extraction path as [`FetchWebPage`], routed to separately by the
/// e-commerce auto-switch (spec §4.2 step 3) for storefronts that render
/// their content client-side. This crate has no headless-browser backend,
/// so it shares the static fetch; a real JS-rendering backend would swap
/// the body of `call` for a CDP-driven render before extraction.
pub struct FetchJsPage;

#[async_trait]
impl Tool for FetchJsPage {
    fn id(&self) -> &str {
        "fetchJsPage"
    }

    fn description(&self) -> &str {
        "Fetches a JavaScript-rendered page (e.g. e-commerce storefronts) and returns its text content."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let url = require_url(parameters)?;
        fetch_and_extract(url).await
    }
}

/// Result-page search backed by a configurable HTML search endpoint
/// (defaults to DuckDuckGo's lite HTML frontend, which requires no API
/// key). Returns `{results: [{title, url}]}` so chained `aiChat` calls can
/// summarize `{SEARCH_RESULTS}`.
pub struct SearchWeb {
    endpoint: String,
}

impl SearchWeb {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

impl Default for SearchWeb {
    fn default() -> Self {
        Self::new("https://html.duckduckgo.com/html/")
    }
}

#[async_trait]
impl Tool for SearchWeb {
    fn id(&self) -> &str {
        "searchWeb"
    }

    fn description(&self) -> &str {
        "Searches the web for a query string and returns matching result titles and URLs."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let query = parameters
            .get("q")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidParameters("missing required string parameter \"q\"".into()))?;

        let client = reqwest::Client::new();
        let body = client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ToolError::BackendUnavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;

        let document = scraper::Html::parse_document(&body);
        let result_selector = scraper::Selector::parse("a.result__a").unwrap();
        let results: Vec<Value> = document
            .select(&result_selector)
            .take(10)
            .map(|el| {
                let title = el.text().collect::<String>();
                let href = el.value().attr("href").unwrap_or_default();
                json!({ "title": title.trim(), "url": href })
            })
            .collect();

        Ok(json!({ "results": results }))
    }
}
