//! Squads Inspect binary.
//!
//! Entry point for the inspector that prints the derived addresses and the
//! encoded sample batch of a squad.

use squads_inspect::{build_report, InspectConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,squads_inspect=debug,squads_sdk=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment
    let config = InspectConfig::from_env()?;
    config.validate()?;

    tracing::info!("Starting Squads inspector");
    tracing::info!("Cluster: {}", config.cluster);
    tracing::info!("Members: {}", config.members.len());
    tracing::info!("Proposal nonce: {}", config.proposal_nonce);

    let report = build_report(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    tracing::info!(
        instructions = report.instructions.len(),
        "Inspection complete"
    );
    Ok(())
}
