use crate::trigger::{FlowTrigger, PatternType};
use orchestrator_core::UnifiedMessage;
use regex::RegexBuilder;

/// Evaluates every filter in sequence; all must hold for a match (spec
/// §4.9). Filters are applied in the fixed order platform, message type,
/// content, sender, group so a reviewer can reason about short-circuiting
/// cost (cheap checks first).
pub fn matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    platform_matches(trigger, message)
        && message_type_matches(trigger, message)
        && content_matches(trigger, message)
        && sender_matches(trigger, message)
        && group_matches(trigger, message)
}

fn platform_matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    trigger.platform == "any" || trigger.platform == message.platform.0
}

fn message_type_matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    match &trigger.message_type.allowed_content_types {
        None => true,
        Some(allowed) => allowed.contains(&message.content_type),
    }
}

fn content_matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    let pattern_type = trigger.content.pattern_type.unwrap_or(PatternType::Any);
    if pattern_type == PatternType::Any {
        return true;
    }
    let Some(pattern) = trigger.content.pattern.as_deref() else {
        return true;
    };

    let (haystack, needle): (String, String) = if trigger.content.case_sensitive {
        (message.content.clone(), pattern.to_string())
    } else {
        (message.content.to_lowercase(), pattern.to_lowercase())
    };

    match pattern_type {
        PatternType::Contains => haystack.contains(&needle),
        PatternType::StartsWith => haystack.starts_with(&needle),
        PatternType::EndsWith => haystack.ends_with(&needle),
        PatternType::ExactMatch => haystack == needle,
        PatternType::Regex => RegexBuilder::new(pattern)
            .case_insensitive(!trigger.content.case_sensitive)
            .build()
            .map(|re| re.is_match(&message.content))
            .unwrap_or(false),
        PatternType::Any => true,
    }
}

fn sender_matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    if let Some(from) = &trigger.sender.from {
        if &message.from != from {
            return false;
        }
    }
    if let Some(not_from) = &trigger.sender.not_from {
        if &message.from == not_from {
            return false;
        }
    }
    if let Some(filter_list) = &trigger.sender.sender_filter {
        let lower_from = message.from.to_lowercase();
        let any_match = filter_list
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .any(|needle| lower_from.contains(&needle));
        if !any_match {
            return false;
        }
    }
    true
}

fn group_matches(trigger: &FlowTrigger, message: &UnifiedMessage) -> bool {
    if let Some(expected) = trigger.group.is_group {
        if message.is_group != expected {
            return false;
        }
    }
    if let Some(groups) = &trigger.group.from_groups {
        if message.is_group {
            let group_id = message.group_id.as_deref().unwrap_or("");
            if !groups.iter().any(|g| g == group_id) {
                return false;
            }
        }
    }
    if let Some(true) = trigger.group.from_private {
        if message.is_group {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trigger::{ContentConstraint, GroupConstraint, SenderConstraint};
    use orchestrator_core::{ContentType, Platform, Sender};

    fn base_message() -> UnifiedMessage {
        UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "+1555@c.us".into(),
            to: None,
            content: "please help me".into(),
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

    fn base_trigger() -> FlowTrigger {
        FlowTrigger {
            flow_id: "f1".into(),
            platform: "any".into(),
            ..Default::default()
        }
    }

    #[test]
    fn platform_mismatch_fails() {
        let mut trigger = base_trigger();
        trigger.platform = "telegram".into();
        assert!(!matches(&trigger, &base_message()));
    }

    #[test]
    fn contains_pattern_matches_case_insensitively() {
        let mut trigger = base_trigger();
        trigger.content = ContentConstraint {
            pattern_type: Some(PatternType::Contains),
            pattern: Some("HELP".into()),
            case_sensitive: false,
        };
        assert!(matches(&trigger, &base_message()));
    }

    #[test]
    fn regex_pattern_respects_case_sensitivity() {
        let mut trigger = base_trigger();
        trigger.content = ContentConstraint {
            pattern_type: Some(PatternType::Regex),
            pattern: Some(r"^HELP".into()),
            case_sensitive: true,
        };
        assert!(!matches(&trigger, &base_message()));
    }

    #[test]
    fn sender_filter_matches_substring_list() {
        let mut trigger = base_trigger();
        trigger.sender = SenderConstraint {
            from: None,
            not_from: None,
            sender_filter: Some("555, 777".into()),
        };
        assert!(matches(&trigger, &base_message()));
    }

    #[test]
    fn not_from_excludes_sender() {
        let mut trigger = base_trigger();
        trigger.sender = SenderConstraint {
            from: None,
            not_from: Some("+1555@c.us".into()),
            sender_filter: None,
        };
        assert!(!matches(&trigger, &base_message()));
    }

    #[test]
    fn from_private_excludes_group_messages() {
        let mut trigger = base_trigger();
        trigger.group = GroupConstraint { is_group: None, from_groups: None, from_private: Some(true) };
        let mut message = base_message();
        message.is_group = true;
        assert!(!matches(&trigger, &message));
    }

    #[test]
    fn message_type_allowlist_filters_content_type() {
        let mut trigger = base_trigger();
        trigger.message_type.allowed_content_types = Some(vec![ContentType::Image]);
        assert!(!matches(&trigger, &base_message()));
    }
}
