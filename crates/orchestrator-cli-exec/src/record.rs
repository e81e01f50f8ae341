use orchestrator_provider::CliType;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
    StaleKilled,
}

/// Where a finished execution's result stands with `deliver()`, tracked
/// separately from [`ExecutionStatus`] since delivery can still be pending
/// or fail after the process itself has already completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Delivering,
    Delivered,
    Failed,
    NotNeeded,
}

/// A file produced by a CLI execution, surfaced by output-file detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub size: u64,
    pub human_size: String,
    pub full_path: PathBuf,
}

impl GeneratedFile {
    pub fn from_path(full_path: PathBuf, size: u64) -> Self {
        let name = full_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            name,
            size,
            human_size: human_size(size),
            full_path,
        }
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// One tracked CLI execution, persisted for the lifetime of the run and
/// until the caller prunes completed/failed rows.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub tracking_id: String,
    pub user_id: String,
    pub agent_id: Option<String>,
    pub conversation_id: Option<String>,
    pub cli_type: CliType,
    pub command: Vec<String>,
    pub workspace_path: PathBuf,
    pub status: ExecutionStatus,
    pub delivery_status: DeliveryStatus,
    pub started_at_unix: i64,
    pub last_output_at_unix: i64,
    pub stdout_len: usize,
    pub files: Vec<GeneratedFile>,
    pub error: Option<String>,
}

/// Events emitted on the fire-and-forget broadcast bus so observers (a
/// chat-reply, a dashboard) can follow a run without polling the table.
#[derive(Debug, Clone)]
pub enum CliExecEvent {
    Started { tracking_id: String },
    Progress { tracking_id: String, last_activity_at_unix: i64 },
    Completed { tracking_id: String, files: Vec<GeneratedFile> },
    Failed { tracking_id: String, reason: String },
}
