use crate::error::ToolError;
use crate::tool::{Tool, ToolContext};
use async_trait::async_trait;
use orchestrator_core::Parameters;
use serde_json::{json, Value};
use std::sync::Arc;

/// The actual wire delivery for an outbound message. Platform adapters
/// (WhatsApp/Telegram/SMTP clients) live one layer above this crate, so
/// the built-in messaging tools depend only on this trait — matching the
/// teacher's pattern of routing egress through a narrow capability rather
/// than each tool owning its own HTTP client.
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    async fn send(&self, channel: &str, to: &str, body: &str) -> Result<(), ToolError>;
}

fn require_str<'a>(parameters: &'a Parameters, key: &str) -> Result<&'a str, ToolError> {
    parameters
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing required string parameter \"{key}\"")))
}

macro_rules! messaging_tool {
    ($name:ident, $id:literal, $channel:literal, $description:literal) => {
        pub struct $name {
            dispatcher: Arc<dyn MessageDispatcher>,
        }

        impl $name {
            pub fn new(dispatcher: Arc<dyn MessageDispatcher>) -> Self {
                Self { dispatcher }
            }
        }

        #[async_trait]
        impl Tool for $name {
            fn id(&self) -> &str {
                $id
            }

            fn description(&self) -> &str {
                $description
            }

            fn is_messaging_tool(&self) -> bool {
                true
            }

            async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
                let to = require_str(parameters, "to")?;
                let body = require_str(parameters, "body")?;
                self.dispatcher.send($channel, to, body).await?;
                Ok(json!({ "sent": true, "to": to }))
            }
        }
    };
}

messaging_tool!(SendWhatsApp, "sendWhatsApp", "whatsapp", "Sends a WhatsApp message to a recipient.");
messaging_tool!(SendTelegram, "sendTelegram", "telegram", "Sends a Telegram message to a recipient.");
messaging_tool!(SendEmail, "sendEmail", "email", "Sends an email to a recipient.");

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::{RequestContext, ToolChain};
    use std::sync::Mutex;

    struct RecordingDispatcher {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl MessageDispatcher for RecordingDispatcher {
        async fn send(&self, channel: &str, to: &str, body: &str) -> Result<(), ToolError> {
            self.sent
                .lock()
                .unwrap()
                .push((channel.to_string(), to.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn send_whatsapp_delegates_to_dispatcher() {
        let dispatcher = Arc::new(RecordingDispatcher { sent: Mutex::new(Vec::new()) });
        let tool = SendWhatsApp::new(dispatcher.clone());
        let mut params = Parameters::new();
        params.insert("to".into(), json!("+1555"));
        params.insert("body".into(), json!("hi"));
        let ctx = ToolContext::new(RequestContext::new("u"), ToolChain::new());

        let out = tool.call(&params, &ctx).await.unwrap();
        assert_eq!(out.get("sent"), Some(&json!(true)));
        assert_eq!(dispatcher.sent.lock().unwrap().len(), 1);
        assert_eq!(dispatcher.sent.lock().unwrap()[0].0, "whatsapp");
        assert!(tool.is_messaging_tool());
    }

    #[tokio::test]
    async fn missing_body_is_invalid_parameters() {
        let dispatcher = Arc::new(RecordingDispatcher { sent: Mutex::new(Vec::new()) });
        let tool = SendTelegram::new(dispatcher);
        let mut params = Parameters::new();
        params.insert("to".into(), json!("@someone"));
        let ctx = ToolContext::new(RequestContext::new("u"), ToolChain::new());
        let err = tool.call(&params, &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }
}
