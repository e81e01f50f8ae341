use crate::config::{AutoSendMode, UserToolSettings};

const MESSAGING_TOOLS: [&str; 3] = ["sendWhatsApp", "sendTelegram", "sendEmail"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Blocked { reason: String },
}

/// Spec §4.2 step 7 / testable properties "Access control" and "Messaging
/// restriction": the enabled-tool check always applies first; the
/// messaging restriction is independent of confidence and cannot be
/// bypassed by enabling the tool.
pub fn check_access(tool_id: &str, settings: &UserToolSettings) -> AccessDecision {
    if !settings.is_tool_enabled(tool_id) {
        return AccessDecision::Blocked {
            reason: format!("tool \"{tool_id}\" is not enabled for this user"),
        };
    }

    if MESSAGING_TOOLS.contains(&tool_id) && settings.auto_send_mode == AutoSendMode::Restricted {
        return AccessDecision::Blocked {
            reason: format!("sending messages via \"{tool_id}\" requires auto-send mode to be open"),
        };
    }

    AccessDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiRouterMode;
    use std::collections::HashSet;

    #[test]
    fn disabled_tool_is_blocked_regardless_of_send_mode() {
        let mut settings = UserToolSettings::default();
        settings.enabled_tools = Some(HashSet::from(["searchWeb".to_string()]));
        settings.auto_send_mode = AutoSendMode::Open;
        assert!(matches!(check_access("aiChat", &settings), AccessDecision::Blocked { .. }));
    }

    #[test]
    fn messaging_tool_blocked_when_restricted_even_with_high_confidence() {
        let settings = UserToolSettings {
            auto_send_mode: AutoSendMode::Restricted,
            ai_router_mode: AiRouterMode::Full,
            ..UserToolSettings::default()
        };
        assert!(matches!(check_access("sendWhatsApp", &settings), AccessDecision::Blocked { .. }));
    }

    #[test]
    fn messaging_tool_allowed_when_open() {
        let settings = UserToolSettings {
            auto_send_mode: AutoSendMode::Open,
            ..UserToolSettings::default()
        };
        assert_eq!(check_access("sendEmail", &settings), AccessDecision::Allowed);
    }

    #[test]
    fn non_messaging_tool_allowed_by_default() {
        let settings = UserToolSettings::default();
        assert_eq!(check_access("searchWeb", &settings), AccessDecision::Allowed);
    }
}
