//! certbot manual hook for STRATO domains
//!
//! ```bash
//! certbot certonly --manual --preferred-challenges dns \
//!     --manual-auth-hook "strato-certbot auth --propagation-delay 60" \
//!     --manual-cleanup-hook "strato-certbot cleanup" \
//!     -d example.com -d '*.example.com'
//! ```
//!
//! certbot exports `CERTBOT_DOMAIN` and `CERTBOT_VALIDATION` to both hooks.

mod cli;
mod config;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use strato_certbot_provider::{ChallengeHook, DomainContext, StratoProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use config::AuthConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .with_ansi(false),
        )
        .with(filter)
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = config::resolve_config_path(cli.config, cli.config_dir)?;
    tracing::debug!("Loading credentials from {}", config_path.display());
    let auth = AuthConfig::load(&config_path)?;

    let mut builder = StratoProvider::builder();
    if let Some(api_url) = cli.api_url.or_else(|| auth.api_url.clone()) {
        builder = builder.api_url(api_url);
    }
    let provider = builder.build().context("Failed to create STRATO client")?;
    let credentials = auth.credentials();

    match cli.command {
        Command::Auth(args) => {
            let mut hook =
                ChallengeHook::new(provider, DomainContext::new(&args.domain), args.validation);
            hook.set_challenge(&credentials)
                .await
                .context("Failed to publish challenge record")?;

            if args.propagation_delay > 0 {
                tracing::info!(
                    "Waiting {}s for the record to propagate",
                    args.propagation_delay
                );
                tokio::time::sleep(Duration::from_secs(args.propagation_delay)).await;
            }
        }
        Command::Cleanup(args) => {
            let mut hook = ChallengeHook::new(
                provider,
                DomainContext::new(&args.domain),
                args.validation.unwrap_or_default(),
            );
            hook.clean_challenge(&credentials)
                .await
                .context("Failed to remove challenge record")?;
        }
    }

    Ok(())
}
