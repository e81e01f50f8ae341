use crate::tool::{Tool, ToolDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory id -> tool lookup. Registration happens once at composition
/// root startup; lookups afterward are read-only, so a plain `HashMap`
/// behind an `Arc` (no lock) is enough — unlike the mutable tables in
/// `orchestrator-provider`/`orchestrator-gating` that change at runtime.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.id().to_string(), tool);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    pub fn definitions_for(&self, enabled_ids: &[String]) -> Vec<ToolDefinition> {
        enabled_ids
            .iter()
            .filter_map(|id| self.tools.get(id))
            .map(ToolDefinition::of)
            .collect()
    }

    pub fn all_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(ToolDefinition::of).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tools.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::tool::ToolContext;
    use async_trait::async_trait;
    use orchestrator_core::{Parameters, RequestContext, ToolChain};
    use serde_json::Value;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn id(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "echoes its input"
        }

        async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
            Ok(Value::Object(parameters.clone()))
        }
    }

    fn ctx() -> ToolContext {
        ToolContext::new(RequestContext::new("u"), ToolChain::new())
    }

    #[tokio::test]
    async fn register_then_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        assert!(registry.contains("echo"));
        let tool = registry.get("echo").unwrap();
        let out = tool.call(&Parameters::new(), &ctx()).await.unwrap();
        assert_eq!(out, Value::Object(Parameters::new()));
    }

    #[test]
    fn definitions_for_filters_to_enabled_ids() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        let defs = registry.definitions_for(&["echo".to_string(), "missing".to_string()]);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, "echo");
    }
}
