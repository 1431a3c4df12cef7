//! TXT/CNAME record editor: scrape and full-replacement submit.

use crate::error::Result;
use crate::types::DnsRecord;

use super::StratoProvider;
use super::scrape::{CHANGE_RECORDS_ACTION, extract_records};

/// Label of the editor's submit button.
const CHANGE_RECORDS_LABEL: &str = "Einstellung übernehmen";

impl StratoProvider {
    /// Reads the TXT/CNAME records of `base_domain_name` from the record editor.
    ///
    /// Returns `Ok(None)` when the page does not contain the editor, which
    /// is different from `Ok(Some(vec![]))` for a zone without records.
    pub async fn fetch_records(
        &self,
        package_id: &str,
        base_domain_name: &str,
    ) -> Result<Option<Vec<DnsRecord>>> {
        let session_id = self.require_session()?;
        let page = self
            .get_page(
                &[
                    ("sessionID", session_id),
                    ("cID", package_id),
                    ("node", "ManageDomains"),
                    ("action_show_txt_records", ""),
                    ("vhost", base_domain_name),
                ],
                "txt records",
            )
            .await?;

        let records = extract_records(&page.body);
        match &records {
            Some(records) => {
                log::info!("[strato] Current cname/txt records for '{base_domain_name}':");
                log_records(records, base_domain_name);
            }
            None => {
                log::error!("[strato] No record editor found for '{base_domain_name}' (cID={package_id})");
            }
        }
        Ok(records)
    }

    /// Replaces the zone's whole TXT/CNAME record set with `records`.
    ///
    /// Records missing from `records` are deleted by the portal. The
    /// response is not checked; only transport errors are returned.
    pub async fn publish(
        &self,
        package_id: &str,
        base_domain_name: &str,
        records: &[DnsRecord],
    ) -> Result<()> {
        let session_id = self.require_session()?;

        log::info!("[strato] Pushing new domain TXT/CNAME records:");
        log_records(records, base_domain_name);

        let mut form: Vec<(&str, &str)> = vec![
            ("sessionID", session_id),
            ("cID", package_id),
            ("node", "ManageDomains"),
            ("vhost", base_domain_name),
            ("spf_type", "NONE"),
        ];
        form.extend(records.iter().map(|r| ("prefix", r.prefix.as_str())));
        form.extend(records.iter().map(|r| ("type", r.record_type.as_str())));
        form.extend(records.iter().map(|r| ("value", r.value.as_str())));
        form.push((CHANGE_RECORDS_ACTION, CHANGE_RECORDS_LABEL));

        self.post_form(&form, "change txt records").await?;
        Ok(())
    }
}

fn log_records(records: &[DnsRecord], base_domain_name: &str) {
    for record in records {
        log::info!("[strato]   {}", record.describe(base_domain_name));
    }
}
