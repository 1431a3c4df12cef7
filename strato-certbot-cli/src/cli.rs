//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "strato-certbot",
    version,
    about = "certbot DNS-01 hooks for domains hosted at STRATO"
)]
pub struct Cli {
    /// Credentials file (JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding `strato-auth.json`; used when `--config` is not given.
    #[arg(long, global = true, env = "STRATO_CERTBOT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Customer portal endpoint, overrides `api_url` from the credentials file.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Log verbosity (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    #[arg(
        long,
        global = true,
        env = "STRATO_CERTBOT_LOG_LEVEL",
        default_value = "info"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish the `_acme-challenge` TXT record (certbot --manual-auth-hook).
    Auth(AuthArgs),
    /// Remove the `_acme-challenge` TXT record (certbot --manual-cleanup-hook).
    Cleanup(CleanupArgs),
}

#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Domain being validated.
    #[arg(long, env = "CERTBOT_DOMAIN")]
    pub domain: String,

    /// Validation token to publish.
    #[arg(long, env = "CERTBOT_VALIDATION")]
    pub validation: String,

    /// Seconds to wait after publishing, so the record reaches the name servers.
    #[arg(long, default_value_t = 0)]
    pub propagation_delay: u64,
}

#[derive(Debug, Args)]
pub struct CleanupArgs {
    /// Domain that was validated.
    #[arg(long, env = "CERTBOT_DOMAIN")]
    pub domain: String,

    /// Validation token that was published (informational).
    #[arg(long, env = "CERTBOT_VALIDATION")]
    pub validation: Option<String>,
}
