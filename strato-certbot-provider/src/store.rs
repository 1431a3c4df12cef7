//! In-memory copy of a zone's TXT/CNAME records.
//!
//! The portal replaces the whole record set on every submit, so the store
//! always holds every record of the zone: what was scraped, plus local edits.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ProviderError, Result};
use crate::types::{ACME_CHALLENGE_PREFIX, DnsRecord, DomainContext, RecordType};

/// Leading label token of a record prefix.
#[allow(clippy::unwrap_used)]
static RECORD_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\w-]+)").unwrap());

/// Ordered record list of one zone.
///
/// Order is kept as scraped; added records go to the end.
#[derive(Debug, Clone)]
pub struct RecordStore {
    domain: DomainContext,
    records: Vec<DnsRecord>,
}

impl RecordStore {
    pub fn new(domain: DomainContext, records: Vec<DnsRecord>) -> Self {
        Self { domain, records }
    }

    pub fn domain(&self) -> &DomainContext {
        &self.domain
    }

    pub fn records(&self) -> &[DnsRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DnsRecord> {
        self.records
    }

    /// Normalizes a prefix to the flat prefix field of the base domain.
    ///
    /// Keeps the leading `[\w-]+` token. When the requested domain is below
    /// the base domain, its sub-labels are appended, so `_acme-challenge` for
    /// `foo.example.com` becomes `_acme-challenge.foo`.
    pub fn sanitize_record_prefix(&self, prefix: &str) -> Result<String> {
        let token = RECORD_PREFIX_REGEX
            .captures(prefix)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ProviderError::InvalidParameter {
                param: "prefix".to_string(),
                detail: format!("'{prefix}' does not start with a label"),
            })?;

        Ok(match self.domain.sub_label() {
            Some(sub_label) => format!("{token}.{sub_label}"),
            None => token.to_string(),
        })
    }

    /// Adds a record, replacing every record with the same (prefix, type).
    ///
    /// The new record is always appended at the end.
    pub fn add_record(
        &mut self,
        prefix: &str,
        record_type: RecordType,
        value: impl Into<String>,
    ) -> Result<()> {
        let prefix = self.sanitize_record_prefix(prefix)?;
        let value = value.into();

        if self.records.iter().any(|r| r.has_key(&prefix, &record_type)) {
            log::info!("[strato] Update {record_type} record: {prefix} = {value}");
            self.remove_sanitized(&prefix, &record_type);
        } else {
            log::info!("[strato] Add {record_type} record: {prefix} = {value}");
        }

        self.records.push(DnsRecord::new(prefix, record_type, value));
        Ok(())
    }

    /// Removes every record with the given (prefix, type). Unknown keys are a no-op.
    pub fn remove_record(&mut self, prefix: &str, record_type: &RecordType) -> Result<()> {
        let prefix = self.sanitize_record_prefix(prefix)?;
        let removed = self.remove_sanitized(&prefix, record_type);
        if removed > 0 {
            log::info!("[strato] Remove {record_type} record: {prefix} ({removed} entries)");
        } else {
            log::debug!("[strato] No {record_type} record '{prefix}' to remove");
        }
        Ok(())
    }

    /// Sets or replaces the `_acme-challenge` TXT record.
    pub fn set_challenge_record(&mut self, validation: &str) -> Result<()> {
        self.add_record(ACME_CHALLENGE_PREFIX, RecordType::Txt, validation)
    }

    /// Removes the `_acme-challenge` TXT record.
    pub fn reset_challenge_record(&mut self) -> Result<()> {
        self.remove_record(ACME_CHALLENGE_PREFIX, &RecordType::Txt)
    }

    fn remove_sanitized(&mut self, prefix: &str, record_type: &RecordType) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !r.has_key(prefix, record_type));
        before - self.records.len()
    }
}
