use crate::error::WorkspaceError;
use orchestrator_provider::CliType;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

const SUBDIRS: [&str; 8] = [
    "knowledge",
    "logs",
    "custom/tools",
    "output",
    ".local/share",
    ".local/cache",
    ".config",
    ".cache",
];

#[derive(Debug, Clone)]
pub struct WorkspaceRecord {
    pub user_id: String,
    pub agent_id: String,
    pub cli_type: CliType,
    pub path: PathBuf,
    pub created_at_unix: i64,
    pub deleted_at_unix: Option<i64>,
}

/// Isolated per-agent sandbox directories for supervised CLI runs — spec
/// §4.5. Every relative-path operation is checked against the workspace
/// root so a malicious or buggy tool cannot `../`-escape it.
pub struct WorkspaceManager {
    base_dir: PathBuf,
    sandbox_uid: Option<u32>,
    records: Arc<Mutex<Vec<WorkspaceRecord>>>,
}

impl WorkspaceManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sandbox_uid: None,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_sandbox_uid(mut self, uid: u32) -> Self {
        self.sandbox_uid = Some(uid);
        self
    }

    fn agent_dir(&self, user_id: &str, agent_id: &str) -> PathBuf {
        self.base_dir.join(user_id).join(agent_id)
    }

    pub async fn create(
        &self,
        user_id: &str,
        agent_id: &str,
        cli_type: CliType,
    ) -> Result<WorkspaceRecord, WorkspaceError> {
        let mut records = self.records.lock().await;
        if records
            .iter()
            .any(|r| r.user_id == user_id && r.agent_id == agent_id && r.deleted_at_unix.is_none())
        {
            return Err(WorkspaceError::AlreadyExists(agent_id.to_string()));
        }

        let root = self.agent_dir(user_id, agent_id);
        for subdir in SUBDIRS {
            tokio::fs::create_dir_all(root.join(subdir)).await?;
        }

        let context_file = root.join(cli_type.context_file_name());
        tokio::fs::write(&context_file, seed_context_file(cli_type)).await?;

        if let Some(uid) = self.sandbox_uid {
            chown_recursive(&root, uid);
        }

        let record = WorkspaceRecord {
            user_id: user_id.to_string(),
            agent_id: agent_id.to_string(),
            cli_type,
            path: root,
            created_at_unix: OffsetDateTime::now_utc().unix_timestamp(),
            deleted_at_unix: None,
        };
        records.push(record.clone());
        Ok(record)
    }

    pub async fn get(&self, user_id: &str, agent_id: &str) -> Option<WorkspaceRecord> {
        let records = self.records.lock().await;
        records
            .iter()
            .find(|r| r.user_id == user_id && r.agent_id == agent_id && r.deleted_at_unix.is_none())
            .cloned()
    }

    pub async fn list(&self, user_id: &str) -> Vec<WorkspaceRecord> {
        let records = self.records.lock().await;
        records
            .iter()
            .filter(|r| r.user_id == user_id && r.deleted_at_unix.is_none())
            .cloned()
            .collect()
    }

    /// Resolves `relative_path` inside the workspace, rejecting any path
    /// that would escape the root after normalization.
    fn resolve(&self, record: &WorkspaceRecord, relative_path: &str) -> Result<PathBuf, WorkspaceError> {
        let candidate = record.path.join(relative_path);
        let normalized = normalize(&candidate);
        let root_normalized = normalize(&record.path);
        if !normalized.starts_with(&root_normalized) {
            return Err(WorkspaceError::PathTraversal(relative_path.to_string()));
        }
        Ok(candidate)
    }

    pub async fn read(&self, record: &WorkspaceRecord, relative_path: &str) -> Result<Vec<u8>, WorkspaceError> {
        let path = self.resolve(record, relative_path)?;
        Ok(tokio::fs::read(path).await?)
    }

    pub async fn write(&self, record: &WorkspaceRecord, relative_path: &str, contents: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.resolve(record, relative_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    pub async fn list_relative(&self, record: &WorkspaceRecord, relative_dir: &str) -> Result<Vec<String>, WorkspaceError> {
        let path = self.resolve(record, relative_dir)?;
        let mut entries = tokio::fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    /// Soft-delete: marks the record deleted but leaves the directory on
    /// disk for `cleanup` to hard-remove later.
    pub async fn delete(&self, user_id: &str, agent_id: &str) -> Result<(), WorkspaceError> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.user_id == user_id && r.agent_id == agent_id && r.deleted_at_unix.is_none())
            .ok_or_else(|| WorkspaceError::NotFound(agent_id.to_string()))?;
        record.deleted_at_unix = Some(OffsetDateTime::now_utc().unix_timestamp());
        Ok(())
    }

    /// Archives the workspace directory to `archive_path` (a tar-free
    /// plain copy, since this crate doesn't carry an archive-format
    /// dependency); the caller decides where archives live.
    pub async fn archive(&self, record: &WorkspaceRecord, archive_dir: &Path) -> Result<PathBuf, WorkspaceError> {
        let destination = archive_dir.join(format!("{}_{}", record.user_id, record.agent_id));
        copy_dir_recursive(&record.path, &destination).await?;
        Ok(destination)
    }

    /// Hard-removes soft-deleted workspaces whose deletion is older than
    /// `older_than_days`.
    pub async fn cleanup(&self, older_than_days: i64) -> Result<usize, WorkspaceError> {
        let cutoff = OffsetDateTime::now_utc().unix_timestamp() - older_than_days * 86_400;
        let mut records = self.records.lock().await;
        let mut removed = 0;
        let mut remaining = Vec::with_capacity(records.len());
        for record in records.drain(..) {
            let should_remove = record.deleted_at_unix.map(|at| at <= cutoff).unwrap_or(false);
            if should_remove {
                if record.path.exists() {
                    tokio::fs::remove_dir_all(&record.path).await?;
                }
                removed += 1;
            } else {
                remaining.push(record);
            }
        }
        *records = remaining;
        Ok(removed)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        use std::path::Component;
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn seed_context_file(cli_type: CliType) -> String {
    format!(
        "# {} workspace\n\nThis directory is a sandboxed workspace for one agent. \
         Write generated files under `output/`. Do not write outside this directory.\n",
        cli_type.binary()
    )
}

#[cfg(unix)]
fn chown_recursive(root: &Path, uid: u32) {
    use std::os::unix::fs::chown;
    if let Err(err) = chown(root, Some(uid), None) {
        log::warn!("failed to chown workspace root {}: {err}", root.display());
    }
}

#[cfg(not(unix))]
fn chown_recursive(_root: &Path, _uid: u32) {}

fn copy_dir_recursive<'a>(
    from: &'a Path,
    to: &'a Path,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), WorkspaceError>> + Send + 'a>> {
    Box::pin(async move {
        tokio::fs::create_dir_all(to).await?;
        let mut entries = tokio::fs::read_dir(from).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let dest = to.join(entry.file_name());
            if file_type.is_dir() {
                copy_dir_recursive(&entry.path(), &dest).await?;
            } else {
                tokio::fs::copy(entry.path(), dest).await?;
            }
        }
        Ok(())
    })
}
