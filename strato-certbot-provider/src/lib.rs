//! # strato-certbot-provider
//!
//! DNS-01 challenge records for domains hosted at STRATO, managed through the
//! customer portal's web interface.
//!
//! STRATO offers no DNS API. This crate logs in to the customer portal like a
//! browser would (including the optional TOTP second factor), finds the
//! package that owns a domain, reads the TXT/CNAME records from the record
//! editor and submits the edited record set back.
//!
//! ## Workflow
//!
//! | Step | Type / Method |
//! |------|---------------|
//! | Login, optional 2FA | [`StratoProvider::login`] |
//! | Package lookup | [`StratoProvider::resolve_package_id`] |
//! | Read records | [`StratoProvider::fetch_records`] |
//! | Edit records | [`RecordStore`] |
//! | Submit records | [`StratoProvider::publish`] |
//!
//! [`ChallengeHook`] runs the whole sequence for certbot's auth and cleanup hooks.
//!
//! ## TLS Backend
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strato_certbot_provider::{ChallengeHook, Credentials, DomainContext, StratoProvider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = StratoProvider::new()?;
//!     let mut hook = ChallengeHook::new(
//!         provider,
//!         DomainContext::new("www.example.com"),
//!         "validation-token",
//!     );
//!
//!     let credentials = Credentials::new("12345678", "password");
//!     hook.set_challenge(&credentials).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Replacing, not patching
//!
//! The portal treats every submit as the complete new record set. A record
//! that is not in the submitted list is deleted, so [`RecordStore`] must be
//! filled from [`StratoProvider::fetch_records`] before it is edited.
//!
//! ## Error Handling
//!
//! Operations return [`Result<T, ProviderError>`](ProviderError). Only
//! transport failures, a rejected login and invalid input are errors; markup
//! that is not recognised is logged and degrades to a fallback.

mod error;
mod hook;
mod http_client;
mod store;
mod strato;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

pub use hook::ChallengeHook;
pub use store::RecordStore;
pub use strato::{
    FALLBACK_PACKAGE_ID, STRATO_API_URL, StratoConfig, StratoProvider, StratoProviderBuilder,
    scrape,
};
pub use types::{ACME_CHALLENGE_PREFIX, Credentials, DnsRecord, DomainContext, RecordType};

// Re-export utils module
pub use utils::log_sanitizer;
