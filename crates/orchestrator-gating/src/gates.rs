use crate::config::GatingConfig;
use crate::rate_limit::RateLimitStore;
use log::warn;
use orchestrator_core::UnifiedMessage;

#[derive(Debug, Clone)]
pub struct GateResult {
    pub pass: bool,
    pub reason: Option<String>,
}

impl GateResult {
    pub fn pass() -> Self {
        Self {
            pass: true,
            reason: None,
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            pass: false,
            reason: Some(reason.into()),
        }
    }
}

/// Gate 1: echo. Blocks messages the bot sent itself, or messages from a
/// sender whose id contains a configured bot identifier.
pub fn gate_echo(message: &UnifiedMessage, config: &GatingConfig) -> GateResult {
    if !config.echo_enabled {
        return GateResult::pass();
    }
    if message.from_me {
        return GateResult::block("fromMe");
    }
    if let Some(id) = message.sender.id.as_deref() {
        if config.bot_identifiers.iter().any(|bot_id| id.contains(bot_id.as_str())) {
            return GateResult::block("bot_identifier");
        }
    }
    GateResult::pass()
}

/// Gate 2: group allowlist. Blocks group messages whose `(groupId,
/// platform)` pair is not in the allowlist table.
pub fn gate_allowlist(message: &UnifiedMessage, config: &GatingConfig) -> GateResult {
    if !config.allowlist_enabled || !message.is_group {
        return GateResult::pass();
    }
    let Some(group_id) = message.group_id.as_deref() else {
        return GateResult::block("missing_group_id");
    };
    let key = (group_id.to_string(), message.platform.0.clone());
    if config.group_allowlist.contains(&key) {
        GateResult::pass()
    } else {
        GateResult::block("not_allowlisted")
    }
}

/// Gate 3: mention. In a group, requires either a configured bot name
/// (with or without a leading `@`) in the content, or that the message is
/// a reply to the bot.
pub fn gate_mention(message: &UnifiedMessage, config: &GatingConfig, is_reply_to_bot: bool) -> GateResult {
    if !config.mention_enabled || !message.is_group {
        return GateResult::pass();
    }
    if is_reply_to_bot {
        return GateResult::pass();
    }
    let lower = message.content.to_lowercase();
    let mentioned = config.bot_names.iter().any(|name| {
        let name = name.to_lowercase();
        lower.contains(&name) || lower.contains(&format!("@{name}"))
    });
    if mentioned {
        GateResult::pass()
    } else {
        GateResult::block("not_mentioned")
    }
}

/// Gate 4: rate limit. Blocks when the per-sender counter reaches `max`
/// within `window_seconds`.
pub async fn gate_rate_limit(
    message: &UnifiedMessage,
    config: &GatingConfig,
    store: &dyn RateLimitStore,
) -> GateResult {
    if !config.rate_limit_enabled {
        return GateResult::pass();
    }
    let key = format!("rate:{}:{}", message.platform, message.from);
    match store.incr(&key, config.rate_limit.window_seconds).await {
        Ok(count) if count > config.rate_limit.max => GateResult::block("rate_limited"),
        Ok(_) => GateResult::pass(),
        Err(err) => {
            warn!("rate limit gate failed open: {err}");
            GateResult::pass()
        }
    }
}

/// Gate 5: content. Blocks empty text, text shorter than `min_length`, or
/// (when `block_media_only` is set) non-text content with an empty
/// caption.
pub fn gate_content(message: &UnifiedMessage, config: &GatingConfig) -> GateResult {
    if !config.content_enabled {
        return GateResult::pass();
    }
    let trimmed = message.content.trim();
    if message.content_type.is_media() {
        if config.content.block_media_only && trimmed.is_empty() {
            return GateResult::block("empty_media_caption");
        }
        return GateResult::pass();
    }
    if trimmed.is_empty() {
        return GateResult::block("empty_text");
    }
    if trimmed.chars().count() < config.content.min_length {
        return GateResult::block("too_short");
    }
    GateResult::pass()
}

/// Runs all five gates in order. Each gate's own panics/unexpected errors
/// never happen here because the functions above are pure and infallible
/// except `gate_rate_limit`, which already fails open internally. Returns
/// the first blocking gate's name + reason, or `None` if every gate
/// passed.
pub async fn run_gates(
    message: &UnifiedMessage,
    config: &GatingConfig,
    store: &dyn RateLimitStore,
    is_reply_to_bot: bool,
) -> Option<(&'static str, String)> {
    let gates: [(&'static str, GateResult); 3] = [
        ("echo", gate_echo(message, config)),
        ("allowlist", gate_allowlist(message, config)),
        ("mention", gate_mention(message, config, is_reply_to_bot)),
    ];
    for (name, result) in gates {
        if !result.pass {
            return Some((name, result.reason.unwrap_or_default()));
        }
    }

    let rate = gate_rate_limit(message, config, store).await;
    if !rate.pass {
        return Some(("rate_limit", rate.reason.unwrap_or_default()));
    }

    let content = gate_content(message, config);
    if !content.pass {
        return Some(("content", content.reason.unwrap_or_default()));
    }

    None
}
