use crate::composition::{self, App};
use orchestrator_config::AppConfig;
use orchestrator_provider::TaskTier;

const TIERS: [TaskTier; 5] = [
    TaskTier::Trivial,
    TaskTier::Simple,
    TaskTier::Moderate,
    TaskTier::Complex,
    TaskTier::Critical,
];

/// Prints the configured failover chain per tier and the current
/// provider health snapshot for every tag mentioned anywhere in a chain —
/// spec §4.3's "print failover chains" operational need.
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let App { provider_router, .. } = composition::build(config);
    let health = provider_router.health();

    println!("health monitor interval: {:?}", composition::health_monitor_interval(config));
    println!();

    let failover = config.failover.clone().into_failover_config().unwrap_or_default();
    let mut seen_tags = std::collections::BTreeSet::new();
    for tier in TIERS {
        let chain = failover.chain_for(tier);
        println!("{tier:?}: {}", chain.join(" -> "));
        seen_tags.extend(chain);
    }

    println!();
    println!("provider health:");
    for tag in &seen_tags {
        let snapshot = health.snapshot(tag).await;
        let available = health.is_available(tag).await;
        println!(
            "  {tag}: available={available} consecutive_failures={} last_ok_at={:?}",
            snapshot.consecutive_failures, snapshot.last_ok_at
        );
    }

    Ok(())
}
