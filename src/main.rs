//! heap-triage - Reports learned triage rules and the pending suggestion

use anyhow::{Context, Result};

use heap_triage::config::Settings;
use heap_triage::storage;
use heap_triage::TriageService;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting heap-triage");

    if let Err(e) = run().await {
        tracing::error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings_path = Settings::default_path()?;
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?;

    let db_path = settings.database_path()?;
    let storage = storage::open_triage_storage(&db_path)
        .await
        .with_context(|| format!("opening {}", db_path.display()))?;

    let mut service = TriageService::new(storage, &settings.triage);

    let rules = service.rules().await?;
    tracing::info!(count = rules.len(), "Active triage rules");
    for rule in &rules {
        tracing::info!(rule_id = %rule.id, sender = %rule.sender, action = %rule.action, "Rule");
    }

    match service.refresh().await? {
        Some(suggestion) => tracing::info!("Suggestion: {}", suggestion.prompt()),
        None => tracing::info!("No rule suggestion"),
    }

    Ok(())
}
