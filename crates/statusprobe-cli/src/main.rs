use std::process::ExitCode;

use statusprobe_cli::run::run;
use statusprobe_types::config::{Parser as _, VerifierConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let config = VerifierConfig::parse();
    let strict = config.strict;

    let passed = run(config).await?;
    if strict && !passed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
