use orchestrator_core::UnifiedMessage;
use serde::Serialize;
use serde_json::Value;

/// The flat trigger-variable set the flow engine expects alongside the
/// full message and sender records — spec §4.9.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerVariables {
    pub trigger_phone: Option<String>,
    pub trigger_chat_id: String,
    pub trigger_message: String,
    pub trigger_message_id: String,
    pub trigger_sender_name: Option<String>,
    pub trigger_is_group: bool,
    pub trigger_group_name: Option<String>,
    pub trigger_has_media: bool,
    pub trigger_media_type: Option<String>,
}

impl TriggerVariables {
    pub fn from_message(message: &UnifiedMessage) -> Self {
        Self {
            trigger_phone: message.sender.phone.clone(),
            trigger_chat_id: message.from.clone(),
            trigger_message: message.content.clone(),
            trigger_message_id: message.id.clone(),
            trigger_sender_name: message.sender.name.clone(),
            trigger_is_group: message.is_group,
            trigger_group_name: message.group_name.clone(),
            trigger_has_media: message.content_type.is_media(),
            trigger_media_type: message.content_type.is_media().then(|| format!("{:?}", message.content_type)),
        }
    }
}

/// The record handed to the flow engine on a match.
#[derive(Debug, Clone, Serialize)]
pub struct FlowInput {
    pub flow_id: String,
    pub message: UnifiedMessage,
    pub trigger_variables: TriggerVariables,
    #[serde(default)]
    pub conversation_context: Value,
}

impl FlowInput {
    pub fn new(flow_id: impl Into<String>, message: UnifiedMessage, conversation_context: Value) -> Self {
        let trigger_variables = TriggerVariables::from_message(&message);
        Self { flow_id: flow_id.into(), message, trigger_variables, conversation_context }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::{ContentType, Platform, Sender};

    #[test]
    fn trigger_variables_report_media_flag_and_type() {
        let message = UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "u1".into(),
            to: None,
            content: "".into(),
            content_type: ContentType::Image,
            media_url: Some("u".into()),
            mime_type: None,
            sender: Sender::default(),
            is_group: false,
            group_id: None,
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        };
        let vars = TriggerVariables::from_message(&message);
        assert!(vars.trigger_has_media);
        assert_eq!(vars.trigger_media_type.as_deref(), Some("Image"));
    }

    #[test]
    fn text_messages_have_no_media_type() {
        let message = UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "u1".into(),
            to: None,
            content: "hi".into(),
            content_type: ContentType::Text,
            media_url: None,
            mime_type: None,
            sender: Sender::default(),
            is_group: false,
            group_id: None,
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        };
        let vars = TriggerVariables::from_message(&message);
        assert!(!vars.trigger_has_media);
        assert_eq!(vars.trigger_media_type, None);
    }
}
