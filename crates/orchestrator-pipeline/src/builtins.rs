use crate::collaborators::Database;
use orchestrator_core::{PipelineResult, RequestContext, ResultType};
use orchestrator_provider::HealthTable;

const HELP_TEXT: &str = "Available commands:\n\
/help - show this message\n\
/status - system and provider health\n\
/flows - list flows configured for this account\n\
/agents - list agents configured for this account";

/// Spec §4.1 step 8: content beginning with `/` whose first token matches
/// a built-in. Returns `None` for anything else, including an unknown
/// `/word` (which falls through to the intent router like any other
/// message).
pub async fn handle(
    content: &str,
    context: &RequestContext,
    database: &dyn Database,
    health: &HealthTable,
) -> Option<PipelineResult> {
    let trimmed = content.trim();
    let rest = trimmed.strip_prefix('/')?;
    let command = rest.split_whitespace().next()?.to_lowercase();

    let response = match command.as_str() {
        "help" => HELP_TEXT.to_string(),
        "status" => status_report(health).await,
        "flows" => flows_report(context, database).await,
        "agents" => agents_report(context, database).await,
        _ => return None,
    };

    Some(
        PipelineResult::new(ResultType::ToolExecuted)
            .with_response(response)
            .with_metadata(serde_json::json!({ "command": command })),
    )
}

async fn status_report(health: &HealthTable) -> String {
    let mut lines = vec!["System Status: Online".to_string()];
    for tag in health.tags().await {
        let snapshot = health.snapshot(&tag).await;
        lines.push(format!(
            "- {tag}: {} consecutive failure(s)",
            snapshot.consecutive_failures
        ));
    }
    lines.join("\n")
}

async fn flows_report(context: &RequestContext, database: &dyn Database) -> String {
    match database.list_flows(&context.user_id).await {
        Ok(flows) if flows.is_empty() => "No flows configured.".to_string(),
        Ok(flows) => flows
            .into_iter()
            .map(|f| format!("- {} ({}){}", f.name, f.flow_id, if f.enabled { "" } else { " [disabled]" }))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(err) => {
            log::warn!("/flows lookup failed: {err}");
            "Could not load flows right now.".to_string()
        }
    }
}

async fn agents_report(context: &RequestContext, database: &dyn Database) -> String {
    match database.list_agents(&context.user_id).await {
        Ok(agents) if agents.is_empty() => "No agents configured.".to_string(),
        Ok(agents) => agents
            .into_iter()
            .map(|a| format!("- {} ({}): {}", a.name, a.agent_id, a.processing_mode))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(err) => {
            log::warn!("/agents lookup failed: {err}");
            "Could not load agents right now.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::test_support::InMemoryDatabase;

    #[tokio::test]
    async fn status_reports_online() {
        let database = InMemoryDatabase::default();
        let health = HealthTable::default();
        let result = handle("/status", &RequestContext::new("u1"), &database, &health)
            .await
            .unwrap();
        assert!(result.response.unwrap().contains("System Status: Online"));
    }

    #[tokio::test]
    async fn unknown_command_falls_through() {
        let database = InMemoryDatabase::default();
        let health = HealthTable::default();
        assert!(handle("/frobnicate", &RequestContext::new("u1"), &database, &health).await.is_none());
    }

    #[tokio::test]
    async fn non_slash_content_falls_through() {
        let database = InMemoryDatabase::default();
        let health = HealthTable::default();
        assert!(handle("hello there", &RequestContext::new("u1"), &database, &health).await.is_none());
    }
}
