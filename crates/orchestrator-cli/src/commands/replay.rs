use orchestrator_config::AppConfig;
use orchestrator_core::{RequestContext, UnifiedMessage};
use std::io::Read;
use std::path::Path;

/// Reads a JSON-encoded [`UnifiedMessage`] from `file` (or stdin if none
/// given), runs it through one pipeline built fresh for this process, and
/// prints the resulting `PipelineResult` as JSON.
pub async fn run(config: &AppConfig, file: Option<&Path>, user_id: &str) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let message: UnifiedMessage = serde_json::from_str(&raw)?;

    let app = crate::composition::build(config);
    let result = app.pipeline.process(message, RequestContext::new(user_id)).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
