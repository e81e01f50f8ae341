use orchestrator_config::AppConfig;

/// Prints the effective configuration (file + `ORCHESTRATOR_*`
/// environment overlay) as TOML, so operators can diff it against what
/// they expect without instrumenting the running process.
pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
