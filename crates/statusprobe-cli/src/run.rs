use anyhow::Result;
use statusprobe_types::config::{OutputFormat, VerifierConfig};
use tracing::info;

use crate::{report, verifier::Verifier};

/// Runs all checks and prints the report, returns whether every check passed.
pub async fn run(config: VerifierConfig) -> Result<bool> {
    let verifier = Verifier::new(&config)?;
    info!(api_url = %verifier.api_url(), "Verifying backend contract");

    if config.format == OutputFormat::Text {
        println!("Using API URL: {}", verifier.api_url());
        println!("Secret is configured");
        println!();
    }

    let summary = verifier.run_all().await;
    println!("{}", report::render(&summary, config.format)?);
    Ok(summary.passed)
}
