use crate::delivery::{deliver, DeliveryContext, DeliveryOutcome, ResultDeliverer};
use crate::error::CliExecError;
use crate::output_files::{self, snapshot};
use crate::record::{CliExecEvent, DeliveryStatus, ExecutionRecord, ExecutionStatus};
use crate::ring::RingAccumulator;
use orchestrator_provider::CliType;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{broadcast, Mutex, Notify};

pub const STALE_CHECK_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub const ABSOLUTE_MAX_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub const STDOUT_CAP_BYTES: usize = 2 * 1024 * 1024;

/// Everything `start` needs to spawn one supervised execution.
pub struct StartOptions {
    pub cli_type: CliType,
    pub command: Vec<String>,
    pub workspace_path: PathBuf,
    pub env: HashMap<String, String>,
    pub user_id: String,
    pub delivery: Option<DeliveryContext>,
    pub sandbox_uid: Option<u32>,
    pub stale_threshold: Duration,
    pub max_timeout: Duration,
}

impl StartOptions {
    pub fn new(cli_type: CliType, command: Vec<String>, workspace_path: PathBuf, user_id: impl Into<String>) -> Self {
        Self {
            cli_type,
            command,
            workspace_path,
            env: HashMap::new(),
            user_id: user_id.into(),
            delivery: None,
            sandbox_uid: None,
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            max_timeout: DEFAULT_MAX_TIMEOUT,
        }
    }
}

enum StopReason {
    Exited(std::io::Result<std::process::ExitStatus>),
    Stale,
    TimedOut,
    Cancelled,
}

struct Inner {
    max_concurrent_per_user: usize,
    records: Mutex<HashMap<String, ExecutionRecord>>,
    cancels: Mutex<HashMap<String, Arc<Notify>>>,
    events_tx: broadcast::Sender<CliExecEvent>,
    deliverer: Arc<dyn ResultDeliverer>,
}

/// Spawns and supervises long-running CLI-backed tool executions whose
/// wall time may exceed a synchronous reasoning-loop budget — spec §4.4.
/// Cheap to clone; every clone shares the same execution table and event
/// bus.
#[derive(Clone)]
pub struct CliExecManager {
    inner: Arc<Inner>,
}

impl CliExecManager {
    pub fn new(deliverer: Arc<dyn ResultDeliverer>) -> Self {
        let (events_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(Inner {
                max_concurrent_per_user: 3,
                records: Mutex::new(HashMap::new()),
                cancels: Mutex::new(HashMap::new()),
                events_tx,
                deliverer,
            }),
        }
    }

    pub fn with_max_concurrent_per_user(mut self, n: usize) -> Self {
        Arc::get_mut(&mut self.inner)
            .map(|inner| inner.max_concurrent_per_user = n)
            .unwrap_or_else(|| log::warn!("with_max_concurrent_per_user ignored: manager already shared"));
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CliExecEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Seeds the execution table from persisted rows at manager start,
    /// flipping any row that was left `running` by a prior process into
    /// `failed(reason="interrupted by restart")` per spec §4.4's crash
    /// recovery rule. Returns the ids of rows that were recovered so the
    /// caller can notify the owning users.
    pub async fn recover(&self, persisted: Vec<ExecutionRecord>) -> Vec<String> {
        let mut recovered = Vec::new();
        let mut records = self.inner.records.lock().await;
        for mut record in persisted {
            if record.status == ExecutionStatus::Running {
                record.status = ExecutionStatus::Failed;
                record.delivery_status = DeliveryStatus::NotNeeded;
                record.error = Some("interrupted by restart".to_string());
                recovered.push(record.tracking_id.clone());
            }
            records.insert(record.tracking_id.clone(), record);
        }
        recovered
    }

    pub async fn get(&self, tracking_id: &str) -> Option<ExecutionRecord> {
        self.inner.records.lock().await.get(tracking_id).cloned()
    }

    pub async fn list(&self, user_id: &str) -> Vec<ExecutionRecord> {
        self.inner
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn running_count(&self, user_id: &str) -> usize {
        self.inner
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id && r.status == ExecutionStatus::Running)
            .count()
    }

    pub async fn start(&self, opts: StartOptions) -> Result<String, CliExecError> {
        if self.running_count(&opts.user_id).await >= self.inner.max_concurrent_per_user {
            return Err(CliExecError::ConcurrencyLimitExceeded(opts.user_id));
        }

        let tracking_id = uuid::Uuid::new_v4().to_string();
        let max_timeout = opts.max_timeout.min(ABSOLUTE_MAX_TIMEOUT);
        let started_at = OffsetDateTime::now_utc().unix_timestamp();

        let mut command = opts.command.iter();
        let program = command.next().ok_or_else(|| CliExecError::SpawnFailed("empty command".to_string()))?;
        let mut cmd = Command::new(program);
        cmd.args(command)
            .current_dir(&opts.workspace_path)
            .envs(&opts.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        if let Some(uid) = opts.sandbox_uid {
            use std::os::unix::process::CommandExt;
            cmd.uid(uid);
        }

        let mut child = cmd.spawn().map_err(|e| CliExecError::SpawnFailed(e.to_string()))?;
        let stdout = child.stdout.take().expect("piped stdout");
        let stderr = child.stderr.take().expect("piped stderr");

        let record = ExecutionRecord {
            tracking_id: tracking_id.clone(),
            user_id: opts.user_id.clone(),
            agent_id: opts.delivery.as_ref().and_then(|d| d.agent_id.clone()),
            conversation_id: opts.delivery.as_ref().and_then(|d| d.conversation_id.clone()),
            cli_type: opts.cli_type,
            command: opts.command.clone(),
            workspace_path: opts.workspace_path.clone(),
            status: ExecutionStatus::Running,
            delivery_status: DeliveryStatus::Pending,
            started_at_unix: started_at,
            last_output_at_unix: started_at,
            stdout_len: 0,
            files: Vec::new(),
            error: None,
        };
        self.inner.records.lock().await.insert(tracking_id.clone(), record);
        let cancel = Arc::new(Notify::new());
        self.inner.cancels.lock().await.insert(tracking_id.clone(), cancel.clone());
        let _ = self.inner.events_tx.send(CliExecEvent::Started { tracking_id: tracking_id.clone() });

        let pre_snapshot = snapshot(&opts.workspace_path);
        let manager = self.clone();
        let tracking_id_for_task = tracking_id.clone();
        tokio::spawn(async move {
            manager
                .supervise(
                    tracking_id_for_task,
                    child,
                    stdout,
                    stderr,
                    opts.stale_threshold,
                    max_timeout,
                    opts.workspace_path,
                    pre_snapshot,
                    started_at,
                    opts.delivery,
                    opts.user_id,
                    cancel,
                )
                .await;
        });

        Ok(tracking_id)
    }

    #[allow(clippy::too_many_arguments)]
    async fn supervise(
        &self,
        tracking_id: String,
        mut child: Child,
        stdout: tokio::process::ChildStdout,
        stderr: tokio::process::ChildStderr,
        stale_threshold: Duration,
        max_timeout: Duration,
        workspace_path: PathBuf,
        pre_snapshot: HashSet<PathBuf>,
        started_at: i64,
        delivery: Option<DeliveryContext>,
        user_id: String,
        cancel: Arc<Notify>,
    ) {
        let last_output_at = Arc::new(AtomicI64::new(started_at));
        let stdout_buf = Arc::new(Mutex::new(RingAccumulator::new(STDOUT_CAP_BYTES)));
        let stderr_buf = Arc::new(Mutex::new(RingAccumulator::new(STDOUT_CAP_BYTES)));

        let stdout_task = tokio::spawn(accumulate(stdout, stdout_buf.clone(), last_output_at.clone()));
        let stderr_task = tokio::spawn(accumulate(stderr, stderr_buf.clone(), last_output_at.clone()));

        let deadline = tokio::time::Instant::now() + max_timeout;
        let mut tick = tokio::time::interval(STALE_CHECK_INTERVAL);
        tick.tick().await;

        let reason = loop {
            tokio::select! {
                status = child.wait() => break StopReason::Exited(status),
                _ = tick.tick() => {
                    let now = OffsetDateTime::now_utc().unix_timestamp();
                    let last = last_output_at.load(Ordering::Relaxed);
                    if now - last > stale_threshold.as_secs() as i64 {
                        let _ = terminate(&mut child).await;
                        break StopReason::Stale;
                    }
                    self.emit_progress(&tracking_id, now).await;
                }
                _ = tokio::time::sleep_until(deadline) => {
                    let _ = terminate(&mut child).await;
                    break StopReason::TimedOut;
                }
                _ = cancel.notified() => {
                    let _ = terminate(&mut child).await;
                    break StopReason::Cancelled;
                }
            }
        };

        self.inner.cancels.lock().await.remove(&tracking_id);

        let _ = stdout_task.await;
        let _ = stderr_task.await;
        let (stdout_text, stdout_len) = {
            let buf = stdout_buf.lock().await;
            (buf.as_str().to_string(), buf.len())
        };

        let (exec_status, success, error) = match reason {
            StopReason::Exited(Ok(status)) if status.success() => (ExecutionStatus::Completed, true, None),
            StopReason::Exited(Ok(status)) => (ExecutionStatus::Failed, false, Some(format!("exited with {status}"))),
            StopReason::Exited(Err(err)) => (ExecutionStatus::Failed, false, Some(format!("wait failed: {err}"))),
            StopReason::Stale => (
                ExecutionStatus::StaleKilled,
                false,
                Some(format!("no output for longer than {}s", stale_threshold.as_secs())),
            ),
            StopReason::TimedOut => (
                ExecutionStatus::Failed,
                false,
                Some(format!("exceeded max timeout of {}s", max_timeout.as_secs())),
            ),
            StopReason::Cancelled => (ExecutionStatus::Cancelled, false, Some("cancelled".to_string())),
        };

        let files = if success {
            output_files::detect(&workspace_path, &stdout_text, &pre_snapshot, started_at)
        } else {
            Vec::new()
        };

        {
            let mut records = self.inner.records.lock().await;
            if let Some(record) = records.get_mut(&tracking_id) {
                record.status = exec_status;
                record.stdout_len = stdout_len;
                record.files = files.clone();
                record.error = error.clone();
            }
        }

        if success {
            let _ = self.inner.events_tx.send(CliExecEvent::Completed {
                tracking_id: tracking_id.clone(),
                files: files.clone(),
            });
        } else {
            let _ = self.inner.events_tx.send(CliExecEvent::Failed {
                tracking_id: tracking_id.clone(),
                reason: error.clone().unwrap_or_default(),
            });
        }

        let summary = if success {
            format!("CLI execution completed, {} file(s) generated.", files.len())
        } else {
            format!("CLI execution failed: {}", error.clone().unwrap_or_default())
        };

        let delivery_status = match deliver(self.inner.deliverer.as_ref(), delivery.as_ref(), &tracking_id, &user_id, summary, files).await {
            Ok(DeliveryOutcome::NotNeeded) => DeliveryStatus::NotNeeded,
            Ok(DeliveryOutcome::Recalled) | Ok(DeliveryOutcome::Direct) => DeliveryStatus::Delivered,
            Err(err) => {
                log::warn!("delivery failed for execution {tracking_id}: {err}");
                DeliveryStatus::Failed
            }
        };

        let mut records = self.inner.records.lock().await;
        if let Some(record) = records.get_mut(&tracking_id) {
            record.delivery_status = delivery_status;
        }
    }

    async fn emit_progress(&self, tracking_id: &str, now: i64) {
        let mut records = self.inner.records.lock().await;
        if let Some(record) = records.get_mut(tracking_id) {
            record.last_output_at_unix = record.last_output_at_unix.max(now);
        }
        drop(records);
        let _ = self.inner.events_tx.send(CliExecEvent::Progress { tracking_id: tracking_id.to_string(), last_activity_at_unix: now });
    }

    /// Cancels a running execution by tracking id, waking its supervisor
    /// task to run the same SIGTERM-then-SIGKILL protocol as a stale or
    /// timeout kill.
    pub async fn cancel(&self, tracking_id: &str) -> Result<(), CliExecError> {
        let notify = self.inner.cancels.lock().await.get(tracking_id).cloned();
        match notify {
            Some(notify) => {
                notify.notify_one();
                Ok(())
            }
            None => Err(CliExecError::NotFound(tracking_id.to_string())),
        }
    }
}

async fn accumulate<R: tokio::io::AsyncRead + Unpin>(reader: R, buf: Arc<Mutex<RingAccumulator>>, last_output_at: Arc<AtomicI64>) {
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        last_output_at.store(OffsetDateTime::now_utc().unix_timestamp(), Ordering::Relaxed);
        buf.lock().await.push_line(&line);
    }
}

async fn terminate(child: &mut Child) -> std::io::Result<std::process::ExitStatus> {
    send_sigterm(child);
    match tokio::time::timeout(Duration::from_secs(5), child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            let _ = child.start_kill();
            child.wait().await
        }
    }
}

#[cfg(unix)]
fn send_sigterm(child: &Child) {
    if let Some(pid) = child.id() {
        unsafe {
            libc::kill(pid as i32, libc::SIGTERM);
        }
    }
}

#[cfg(not(unix))]
fn send_sigterm(_child: &Child) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::delivery::{DirectContext, RecallContext};
    use async_trait::async_trait;
    use tokio::sync::Mutex as AsyncMutex;

    #[derive(Default)]
    struct RecordingDeliverer {
        recalls: AsyncMutex<Vec<String>>,
        directs: AsyncMutex<Vec<String>>,
    }

    #[async_trait]
    impl ResultDeliverer for RecordingDeliverer {
        async fn recall(&self, ctx: RecallContext) -> Result<(), CliExecError> {
            self.recalls.lock().await.push(ctx.tracking_id);
            Ok(())
        }

        async fn direct(&self, ctx: DirectContext) -> Result<(), CliExecError> {
            self.directs.lock().await.push(ctx.tracking_id);
            Ok(())
        }
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    async fn wait_until_terminal(manager: &CliExecManager, tracking_id: &str) -> ExecutionRecord {
        for _ in 0..100 {
            let record = manager.get(tracking_id).await.expect("tracked execution");
            if record.status != ExecutionStatus::Running {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("execution {tracking_id} did not reach a terminal state in time");
    }

    #[tokio::test]
    async fn concurrency_cap_is_enforced() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default())).with_max_concurrent_per_user(1);
        let opts = StartOptions::new(CliType::Claude, sh("sleep 2"), tmp.path().to_path_buf(), "u1");
        manager.start(opts).await.unwrap();
        let second = StartOptions::new(CliType::Claude, sh("sleep 2"), tmp.path().to_path_buf(), "u1");
        let err = manager.start(second).await.unwrap_err();
        assert!(matches!(err, CliExecError::ConcurrencyLimitExceeded(_)));
    }

    #[tokio::test]
    async fn successful_run_detects_marker_file_and_delivers_direct() {
        let tmp = tempfile::tempdir().unwrap();
        let generated = tmp.path().join("report.txt");
        let script = format!(
            "echo hi > {path} && echo [FILE_GENERATED: {path}]",
            path = generated.display()
        );
        let deliverer = Arc::new(RecordingDeliverer::default());
        let manager = CliExecManager::new(deliverer.clone());
        let mut opts = StartOptions::new(CliType::Claude, sh(&script), tmp.path().to_path_buf(), "u1");
        opts.delivery = Some(DeliveryContext { agent_id: None, conversation_id: None });
        let tracking_id = manager.start(opts).await.unwrap();

        let record = wait_until_terminal(&manager, &tracking_id).await;
        assert_eq!(record.status, ExecutionStatus::Completed);
        assert!(record.files.iter().any(|f| f.full_path == generated));
        assert_eq!(deliverer.directs.lock().await.len(), 1);

        // delivery runs after the supervisor records the terminal exec
        // status, so poll for it separately rather than racing `deliver`.
        let mut delivered = record.delivery_status;
        for _ in 0..100 {
            if delivered == DeliveryStatus::Delivered {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            delivered = manager.get(&tracking_id).await.unwrap().delivery_status;
        }
        assert_eq!(delivered, DeliveryStatus::Delivered);
    }

    #[tokio::test]
    async fn nonzero_exit_is_recorded_as_failed() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let opts = StartOptions::new(CliType::Gemini, sh("exit 3"), tmp.path().to_path_buf(), "u1");
        let tracking_id = manager.start(opts).await.unwrap();

        let record = wait_until_terminal(&manager, &tracking_id).await;
        assert_eq!(record.status, ExecutionStatus::Failed);
        assert!(record.error.unwrap().contains("exited with"));
    }

    #[tokio::test]
    async fn absolute_timeout_kills_long_running_process() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let mut opts = StartOptions::new(CliType::Opencode, sh("sleep 30"), tmp.path().to_path_buf(), "u1");
        opts.max_timeout = Duration::from_secs(1);
        let tracking_id = manager.start(opts).await.unwrap();

        let record = wait_until_terminal(&manager, &tracking_id).await;
        assert_eq!(record.status, ExecutionStatus::Failed);
        assert!(record.error.unwrap().contains("exceeded max timeout"));
    }

    #[tokio::test]
    async fn stale_output_kills_process_as_stale_killed() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let mut opts = StartOptions::new(CliType::Claude, sh("sleep 30"), tmp.path().to_path_buf(), "u1");
        opts.stale_threshold = Duration::from_secs(0);
        let tracking_id = manager.start(opts).await.unwrap();

        let record = wait_until_terminal(&manager, &tracking_id).await;
        assert_eq!(record.status, ExecutionStatus::StaleKilled);
        assert!(record.error.unwrap().contains("no output for longer than"));
    }

    #[tokio::test]
    async fn cancel_terminates_running_process() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let opts = StartOptions::new(CliType::Claude, sh("sleep 30"), tmp.path().to_path_buf(), "u1");
        let tracking_id = manager.start(opts).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        manager.cancel(&tracking_id).await.unwrap();

        let record = wait_until_terminal(&manager, &tracking_id).await;
        assert_eq!(record.status, ExecutionStatus::Cancelled);
        assert_eq!(record.error.unwrap(), "cancelled");
    }

    #[tokio::test]
    async fn cancel_of_unknown_tracking_id_is_not_found() {
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let err = manager.cancel("does-not-exist").await.unwrap_err();
        assert!(matches!(err, CliExecError::NotFound(_)));
    }

    #[tokio::test]
    async fn recover_fails_running_rows_left_by_a_prior_process() {
        let manager = CliExecManager::new(Arc::new(RecordingDeliverer::default()));
        let stale_row = ExecutionRecord {
            tracking_id: "old-1".to_string(),
            user_id: "u1".to_string(),
            agent_id: None,
            conversation_id: None,
            cli_type: CliType::Claude,
            command: vec!["sh".to_string()],
            workspace_path: PathBuf::from("/tmp"),
            status: ExecutionStatus::Running,
            delivery_status: DeliveryStatus::Pending,
            started_at_unix: 0,
            last_output_at_unix: 0,
            stdout_len: 0,
            files: Vec::new(),
            error: None,
        };
        let recovered = manager.recover(vec![stale_row]).await;
        assert_eq!(recovered, vec!["old-1".to_string()]);
        let record = manager.get("old-1").await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Failed);
        assert_eq!(record.delivery_status, DeliveryStatus::NotNeeded);
        assert_eq!(record.error.as_deref(), Some("interrupted by restart"));
    }
}
