//! Synchronous CLI-backed provider: wraps one of the recognized CLI types
//! (`claude`, `gemini`, `opencode`) as a uniform [`LLMProvider`] for use
//! inside the failover chain. This is deliberately small and blocking-call
//! shaped; the *supervised, long-running* subprocess flow for tool
//! delegation lives in `orchestrator-cli-exec`, a different concern.

use crate::chat::{CallOptions, ChatMessage, ProviderResponse};
use crate::error::ProviderError;
use crate::provider::LLMProvider;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// One of the CLI types recognized by spec §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliType {
    Claude,
    Gemini,
    Opencode,
}

impl CliType {
    pub fn binary(&self) -> &'static str {
        match self {
            CliType::Claude => "claude",
            CliType::Gemini => "gemini",
            CliType::Opencode => "opencode",
        }
    }

    pub fn context_file_name(&self) -> &'static str {
        match self {
            CliType::Claude => "CLAUDE.md",
            CliType::Gemini => "GEMINI.md",
            CliType::Opencode => "OPENCODE.md",
        }
    }
}

pub struct CliBackedProvider {
    tag: String,
    cli_type: CliType,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl CliBackedProvider {
    pub fn new(tag: impl Into<String>, cli_type: CliType) -> Self {
        Self {
            tag: tag.into(),
            cli_type,
            extra_args: vec!["--print".to_string()],
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LLMProvider for CliBackedProvider {
    fn tag(&self) -> &str {
        &self.tag
    }

    async fn call(
        &self,
        messages: &[ChatMessage],
        _opts: &CallOptions,
    ) -> Result<ProviderResponse, ProviderError> {
        let prompt = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let mut child = Command::new(self.cli_type.binary())
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProviderError::Timeout {
                elapsed_ms: self.timeout.as_millis() as u64,
            })?
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !output.status.success() {
            return Err(ProviderError::Provider(format!(
                "{} exited with {:?}",
                self.cli_type.binary(),
                output.status.code()
            )));
        }

        Ok(ProviderResponse {
            content: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            model: self.cli_type.binary().to_string(),
            usage: None,
        })
    }
}
