use orchestrator_config::AppConfig;

/// Builds the composition root, signals readiness, and idles until
/// interrupted — mirroring the teacher worker binary's
/// init/ready/run-until-killed/shutdown shape (spec §9's lazy-singleton
/// design note).
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let mut app = crate::composition::build(config);

    // Crash recovery (spec §4.4): any `async_cli_executions` row left
    // `running` by a prior process is marked `failed`. The demo database
    // has no persisted rows, so this is a no-op here; a real deployment
    // passes in the rows loaded from the database.
    let recovered = app.cli_exec.recover(Vec::new()).await;
    if !recovered.is_empty() {
        tracing::warn!(count = recovered.len(), "recovered interrupted async CLI executions");
    }

    tracing::info!("orchestrator composition root ready");
    println!("ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    app.pipeline.shutdown();

    Ok(())
}
