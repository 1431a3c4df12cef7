//! certbot manual hook workflows.

use crate::error::{ProviderError, Result};
use crate::store::RecordStore;
use crate::strato::StratoProvider;
use crate::types::{ACME_CHALLENGE_PREFIX, Credentials, DomainContext};

/// One DNS-01 challenge for one domain.
///
/// Domain and validation token are the values certbot exports as
/// `CERTBOT_DOMAIN` and `CERTBOT_VALIDATION`.
pub struct ChallengeHook {
    provider: StratoProvider,
    domain: DomainContext,
    validation: String,
}

impl ChallengeHook {
    pub fn new(
        provider: StratoProvider,
        domain: DomainContext,
        validation: impl Into<String>,
    ) -> Self {
        let hook = Self {
            provider,
            domain,
            validation: validation.into(),
        };
        log::info!("[strato] INIT: txt_key: {ACME_CHALLENGE_PREFIX}");
        log::info!("[strato] INIT: txt_value: {}", hook.validation);
        log::info!("[strato] INIT: base_domain_name: {}", hook.domain.base_domain_name());
        log::info!("[strato] INIT: domain_name: {}", hook.domain.domain_name());
        hook
    }

    pub fn domain(&self) -> &DomainContext {
        &self.domain
    }

    pub fn provider(&self) -> &StratoProvider {
        &self.provider
    }

    /// Publishes the `_acme-challenge` TXT record with the validation token.
    ///
    /// Returns the record set that was submitted.
    pub async fn set_challenge(&mut self, credentials: &Credentials) -> Result<RecordStore> {
        let validation = self.validation.clone();
        self.run(credentials, |store| store.set_challenge_record(&validation))
            .await
    }

    /// Removes the `_acme-challenge` TXT record again.
    ///
    /// Returns the record set that was submitted.
    pub async fn clean_challenge(&mut self, credentials: &Credentials) -> Result<RecordStore> {
        self.run(credentials, RecordStore::reset_challenge_record)
            .await
    }

    async fn run<F>(&mut self, credentials: &Credentials, edit: F) -> Result<RecordStore>
    where
        F: FnOnce(&mut RecordStore) -> Result<()>,
    {
        if !self.provider.login(credentials).await? {
            return Err(ProviderError::InvalidCredentials {
                raw_message: Some("Strato login not accepted".to_string()),
            });
        }

        let base_domain_name = self.domain.base_domain_name();
        let package_id = self.provider.resolve_package_id(base_domain_name).await?;
        let records = self
            .provider
            .fetch_records(&package_id, base_domain_name)
            .await?
            .unwrap_or_default();

        let mut store = RecordStore::new(self.domain.clone(), records);
        edit(&mut store)?;

        self.provider
            .publish(&package_id, base_domain_name, store.records())
            .await?;
        Ok(store)
    }
}
