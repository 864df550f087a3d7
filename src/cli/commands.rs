//! CLI command handlers.

use crate::config::Config;
use crate::provider::{OpenAIProvider, Provider, ProviderError};
use crate::sim::{
    personas, AutomatedActor, ConversationLoop, Evaluator, HumanInputGateway, HumanProxyActor,
    Role, SentinelDetector, SimError, StdConsole, TurnSelector,
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run one training session end to end.
pub async fn cmd_run(
    mut config: Config,
    max_turns: Option<usize>,
    report_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(n) = max_turns {
        config.session.max_turns = n;
    }
    if let Some(path) = report_path {
        config.session.report_path = path;
    }

    // Credential check is fatal before any turn is taken.
    let api_key = config.require_api_key()?.to_string();

    let provider: Arc<dyn Provider> = Arc::new(
        OpenAIProvider::new(
            api_key,
            config.provider.base_url.clone(),
            config.provider.model.clone(),
        )
        .with_name("deepseek"),
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling session");
            ctrl_c.cancel();
        }
    });

    let crew: BTreeMap<Role, AutomatedActor> = Role::ALL
        .iter()
        .map(|&role| {
            (
                role,
                AutomatedActor::new(
                    role,
                    provider.clone(),
                    config.provider.temperature,
                    config.provider.max_tokens,
                    cancel.clone(),
                ),
            )
        })
        .collect();

    let human = HumanProxyActor::new(HumanInputGateway::new(StdConsole));
    let evaluator = Evaluator::new(
        provider.clone(),
        config.provider.temperature,
        config.provider.max_tokens,
    );

    let sim = ConversationLoop::new(
        TurnSelector::new(config.session.fairness_window),
        crew,
        human,
        evaluator,
        Box::new(SentinelDetector::new(config.session.sentinel.clone())),
        config.session.max_turns,
    );

    let summary = match sim.run(personas::SCENARIO_BRIEFING).await {
        Ok(summary) => summary,
        Err(SimError::Provider(ProviderError::Cancelled)) => {
            println!("\nSession cancelled.");
            return Ok(());
        }
        Err(SimError::InputClosed) => {
            println!("\nInput closed; session ended.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("\nSession over after {} turns: {}", summary.turns, summary.stop_reason);

    if summary.report.is_empty() {
        tracing::warn!("No evaluations recorded, skipping report");
    } else {
        summary.report.save(&config.session.report_path)?;
        println!(
            "Evaluation report saved to {}",
            config.session.report_path.display()
        );
    }

    Ok(())
}

/// Print the effective configuration with the credential masked.
pub fn cmd_config(config: &Config) -> Result<()> {
    println!("{}", config.display()?);
    if let Some(path) = Config::default_path() {
        println!("# Default config path: {}", path.display());
    }
    Ok(())
}
