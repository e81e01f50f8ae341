//! Flow-trigger filter evaluation and flow input record construction —
//! spec §4.9.

pub mod evaluate;
pub mod input;
pub mod trigger;

pub use evaluate::matches;
pub use input::{FlowInput, TriggerVariables};
pub use trigger::{ContentConstraint, FlowTrigger, GroupConstraint, MessageTypeAllow, PatternType, SenderConstraint};

use orchestrator_core::UnifiedMessage;

/// Finds the first trigger (in registration order) whose filters all
/// match, per spec §4.1 step 6 ("on first match, hand off to the flow
/// engine").
pub fn first_match<'a>(triggers: &'a [FlowTrigger], message: &UnifiedMessage) -> Option<&'a FlowTrigger> {
    triggers.iter().find(|trigger| matches(trigger, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::{ContentType, Platform, Sender};

    fn message() -> UnifiedMessage {
        UnifiedMessage {
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
        }
    }

    #[test]
    fn returns_first_matching_trigger_in_order() {
        let triggers = vec![
            FlowTrigger { flow_id: "no-match".into(), platform: "telegram".into(), ..Default::default() },
            FlowTrigger { flow_id: "match-a".into(), platform: "any".into(), ..Default::default() },
            FlowTrigger { flow_id: "match-b".into(), platform: "any".into(), ..Default::default() },
        ];
        let matched = first_match(&triggers, &message()).unwrap();
        assert_eq!(matched.flow_id, "match-a");
    }

    #[test]
    fn no_match_returns_none() {
        let triggers = vec![FlowTrigger { flow_id: "x".into(), platform: "telegram".into(), ..Default::default() }];
        assert!(first_match(&triggers, &message()).is_none());
    }
}
