use crate::config::{AgentClassifyConfig, ProcessingMode};
use crate::signals;
use orchestrator_core::{Classification, Intent, UnifiedMessage};

pub struct Classifier;

impl Classifier {
    /// Rule-based intent tagger over source pattern + content signals —
    /// spec §4.8. Never downgrades: every reclassification step below
    /// calls [`Classification::upgrade_to`].
    pub fn classify(message: &UnifiedMessage, config: &AgentClassifyConfig, agent_name: &str) -> Classification {
        if message.from_me {
            return Classification::new(Intent::Skip, "self-message", "source").with_confidence(1.0);
        }
        if config.processing_mode == ProcessingMode::Disabled {
            return Classification::new(Intent::Skip, "agent disabled", "agent_config").with_confidence(1.0);
        }

        let source = message.from.as_str();
        if config.skip_sources.iter().any(|suffix| source.ends_with(suffix.as_str())) {
            return Classification::new(Intent::Skip, "skip source suffix", "source").with_confidence(0.95);
        }
        if config
            .passive_sources
            .iter()
            .any(|suffix| source.ends_with(suffix.as_str()))
        {
            return Classification::new(Intent::Passive, "passive source suffix", "source").with_confidence(0.9);
        }
        if config.processing_mode == ProcessingMode::Passive {
            return Classification::new(Intent::Passive, "agent forced passive", "agent_config").with_confidence(0.9);
        }

        let mut classification = if message.is_group {
            Classification::new(Intent::Passive, "group, undecided by source", "source").with_confidence(0.4)
        } else {
            Classification::new(Intent::Active, "direct message suffix", "source").with_confidence(0.7)
        };

        let content = message.content.as_str();

        if signals::has_leading_command(content) {
            classification.upgrade_to(
                Classification::new(Intent::Active, "leading command", "content")
                    .with_confidence(0.95)
                    .with_signal("leading_command"),
            );
        }
        if signals::has_question_mark(content) {
            classification.upgrade_to(
                Classification::new(Intent::Active, "question mark", "content")
                    .with_confidence(0.75)
                    .with_signal("question_mark"),
            );
        }
        if signals::has_help_word(content) {
            classification.upgrade_to(
                Classification::new(Intent::Active, "help word", "content")
                    .with_confidence(0.8)
                    .with_signal("help_word"),
            );
        }
        if signals::mentions_agent(content, agent_name) {
            classification.upgrade_to(
                Classification::new(Intent::Active, "explicit agent mention", "content")
                    .with_confidence(0.95)
                    .with_signal("agent_mention"),
            );
        }

        // Reinforcing signals only matter while still undecided/passive —
        // monotonicity means they can never pull an already-ACTIVE message
        // back down, so `upgrade_to` with a Passive candidate is a no-op
        // once ACTIVE has been reached. We still record the signal.
        if signals::is_url_only(content) {
            classification.upgrade_to(
                Classification::new(Intent::Passive, "url-only body", "content")
                    .with_confidence(0.6)
                    .with_signal("url_only"),
            );
        }
        if signals::has_forwarded_header(content) {
            classification.upgrade_to(
                Classification::new(Intent::Passive, "forwarded header", "content")
                    .with_confidence(0.6)
                    .with_signal("forwarded"),
            );
        }
        if signals::has_broadcast_marker(content) {
            classification.upgrade_to(
                Classification::new(Intent::Passive, "broadcast marker", "content")
                    .with_confidence(0.6)
                    .with_signal("broadcast_marker"),
            );
        }

        if config.processing_mode == ProcessingMode::FlowOnly {
            classification = classification.with_signal("flow_only");
        }

        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::{ContentType, Platform, Sender};

    fn message(from: &str, content: &str, is_group: bool) -> UnifiedMessage {
        UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: from.into(),
            to: None,
            content: content.into(),
            content_type: ContentType::Text,
            media_url: None,
            mime_type: None,
            sender: Sender::default(),
            is_group,
            group_id: if is_group { Some("g1".into()) } else { None },
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        }
    }

    #[test]
    fn self_message_is_skip() {
        let mut m = message("u1@c.us", "hi", false);
        m.from_me = true;
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        assert_eq!(c.intent, Intent::Skip);
    }

    #[test]
    fn newsletter_suffix_is_passive() {
        let m = message("status@newsletter", "new post!", false);
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        assert_eq!(c.intent, Intent::Passive);
    }

    #[test]
    fn direct_message_defaults_active() {
        let m = message("u1@c.us", "just chatting", false);
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        assert_eq!(c.intent, Intent::Active);
    }

    #[test]
    fn group_message_upgraded_by_leading_command() {
        let m = message("u1@g.us", "/status", true);
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        assert_eq!(c.intent, Intent::Active);
    }

    #[test]
    fn group_message_stays_passive_without_signals() {
        let m = message("u1@g.us", "lol nice", true);
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        assert_eq!(c.intent, Intent::Passive);
    }

    #[test]
    fn url_only_reinforces_passive_but_never_downgrades_active() {
        let m = message("u1@c.us", "https://example.com", false);
        let c = Classifier::classify(&m, &AgentClassifyConfig::new(), "bot");
        // direct-message default is ACTIVE; url-only must not downgrade it.
        assert_eq!(c.intent, Intent::Active);
    }

    #[test]
    fn disabled_agent_skips_everything() {
        let m = message("u1@c.us", "/status", false);
        let mut config = AgentClassifyConfig::new();
        config.processing_mode = ProcessingMode::Disabled;
        let c = Classifier::classify(&m, &config, "bot");
        assert_eq!(c.intent, Intent::Skip);
    }
}
