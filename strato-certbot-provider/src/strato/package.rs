//! Package (zone) lookup.

use crate::error::Result;

use super::scrape::extract_package_id;
use super::{FALLBACK_PACKAGE_ID, StratoProvider};

impl StratoProvider {
    /// Resolves the package id (`cID`) of the package owning `base_domain_name`.
    ///
    /// Falls back to [`FALLBACK_PACKAGE_ID`] when the package list does not
    /// mention the domain. Only transport errors are returned.
    pub async fn resolve_package_id(&self, base_domain_name: &str) -> Result<String> {
        let session_id = self.require_session()?;
        let page = self
            .get_page(
                &[
                    ("sessionID", session_id),
                    ("cID", "0"),
                    ("node", "kds_CustomerEntryPage"),
                ],
                "package list",
            )
            .await?;

        if let Some(package_id) = extract_package_id(&page.body, base_domain_name, &page.url) {
            log::info!("[strato] strato package id (cID): {package_id}");
            return Ok(package_id);
        }

        log::error!(
            "[strato] Domain {base_domain_name} not found in strato packages. Using fallback cID={FALLBACK_PACKAGE_ID}"
        );
        Ok(FALLBACK_PACKAGE_ID.to_string())
    }
}
