pub mod fixture;

use anyhow::Result;
use statusprobe_types::config::{Parser as _, VerifierConfig};
use tokio::task::JoinHandle;
use url::Url;

pub use fixture::{FixtureOptions, FixtureServer, spawn_fixture};

/// Builds verifier configuration the same way the binary does, from arguments.
pub fn verifier_config(base_url: &Url, extra_args: &[&str]) -> Result<VerifierConfig> {
    let base_url = base_url.to_string();
    let mut args = vec!["statusprobe", "--base-url", &base_url, "--secret", "e2e-secret"];
    if !extra_args.contains(&"--timeout") {
        args.extend_from_slice(&["--timeout", "2s"]);
    }
    args.extend_from_slice(extra_args);
    let config = VerifierConfig::try_parse_from(args)?;
    Ok(config)
}

/// Accepts connections on a local port but never answers them.
///
/// Connections are held open until the returned task is aborted.
pub async fn spawn_silent_listener() -> Result<(Url, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    Ok((Url::parse(&format!("http://{}", addr))?, handle))
}

/// URL of a local port nobody listens on.
pub fn unreachable_base_url() -> Result<Url> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{}", addr))?)
}
