//! Extraction of data from server-rendered portal pages.
//!
//! Regular markup is read through CSS selectors. The 2FA device list and the
//! TXT/CNAME editor rows are matched on the raw markup, because their
//! structure is irregular across page variants.
//!
//! Every extractor returns `None` when the markup it expects is not there,
//! which callers must not confuse with an empty result.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::types::{DnsRecord, RecordType};

/// Heading text of the second-factor page.
const TWO_FACTOR_HEADING: &str = "Zwei-Faktor-Authentifizierung";
/// Name of the submit control of the TXT/CNAME editor form.
pub(crate) const CHANGE_RECORDS_ACTION: &str = "action_change_txt_records";

#[allow(clippy::expect_used)]
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static TOTP_TOKEN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"input[type="hidden"][name="totp_token"]"#));
static PACKAGE_ROWS: LazyLock<Selector> = LazyLock::new(|| selector("#package_list > tbody > tr"));
static PACKAGE_INFORMATION: LazyLock<Selector> = LazyLock::new(|| selector(".package-information"));
static PACKAGE_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".jss_with_own_packagename a"));
static TYPE_SELECT_OPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"select[name="type"] option"#));
static PREFIX_INPUT: LazyLock<Selector> = LazyLock::new(|| selector(r#"input[name="prefix"]"#));
static VALUE_TEXTAREA: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"textarea[name="value"]"#));
static CHANGE_RECORDS_CONTROL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"[name="action_change_txt_records"]"#));

/// One editor row: from the type `<select>` to the end of the value `<textarea>`.
#[allow(clippy::unwrap_used)]
static RECORD_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<select\b[^>]*\bname="type"[^>]*>.*?<textarea\b[^>]*\bname="value"[^>]*>.*?</textarea>"#,
    )
    .unwrap()
});

// ============ Login ============

/// Whether the page is the second-factor prompt.
pub fn is_two_factor_page(html: &str) -> bool {
    let document = Html::parse_document(html);
    document
        .select(&H1)
        .any(|h1| h1.text().collect::<String>().contains(TWO_FACTOR_HEADING))
}

/// Hidden `totp_token` field of the second-factor form.
///
/// Expects `<input type="hidden" name="totp_token" value="...">`.
pub fn extract_totp_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOTP_TOKEN_INPUT)
        .find_map(|input| input.value().attr("value"))
        .map(str::to_string)
}

/// Internal id of the TOTP device whose display name is `device_name`.
///
/// Expects options shaped `<option value="S.<username>.<id>">Name</option>`,
/// optionally marked `selected`. Names are compared after trimming.
pub fn extract_device_id(html: &str, username: &str, device_name: &str) -> Option<String> {
    let pattern = format!(
        r#"<option value="(?P<value>S\.{}\.\w*)"(?: selected(?:="selected")?)?\s*>(?P<name>.+?)</option>"#,
        regex::escape(username)
    );
    let device_regex = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::error!("[strato] Device option pattern rejected: {e}");
            return None;
        }
    };

    let wanted = device_name.trim();
    device_regex
        .captures_iter(html)
        .find(|caps| caps.name("name").is_some_and(|n| n.as_str().trim() == wanted))
        .and_then(|caps| caps.name("value"))
        .map(|m| m.as_str().to_string())
}

// ============ Packages ============

/// Package id (`cID`) of the package whose description mentions `base_domain_name`.
///
/// Expects `#package_list > tbody > tr` rows, each with a
/// `.package-information` cell and a `.jss_with_own_packagename a` link
/// carrying `cID` in its query. Relative links are resolved against `page_url`.
pub fn extract_package_id(html: &str, base_domain_name: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    document
        .select(&PACKAGE_ROWS)
        .filter(|row| {
            row.select(&PACKAGE_INFORMATION)
                .any(|info| info.text().collect::<String>().contains(base_domain_name))
        })
        .find_map(|row| {
            let href = row.select(&PACKAGE_LINK).next()?.value().attr("href")?;
            let link = page_url.join(href).ok()?;
            link.query_pairs()
                .find(|(key, _)| key == "cID")
                .map(|(_, value)| value.into_owned())
        })
}

// ============ Records ============

/// TXT/CNAME records listed in the record editor, in document order.
///
/// Returns `None` when the page has no editor form (no control named
/// `action_change_txt_records` and no editor row). `Some(vec![])` means the
/// editor is there and holds no records.
pub fn extract_records(html: &str) -> Option<Vec<DnsRecord>> {
    let records: Vec<DnsRecord> = RECORD_BLOCK_REGEX
        .find_iter(html)
        .filter_map(|block| parse_record_block(block.as_str()))
        .collect();

    if records.is_empty() && !has_record_editor(html) {
        return None;
    }
    Some(records)
}

fn has_record_editor(html: &str) -> bool {
    Html::parse_document(html)
        .select(&CHANGE_RECORDS_CONTROL)
        .next()
        .is_some()
}

fn parse_record_block(block: &str) -> Option<DnsRecord> {
    let fragment = Html::parse_fragment(block);

    // 没有 selected 时按浏览器行为取第一个 option
    let options: Vec<ElementRef<'_>> = fragment.select(&TYPE_SELECT_OPTION).collect();
    let option = options
        .iter()
        .find(|o| o.value().attr("selected").is_some())
        .or_else(|| options.first())?;
    let record_type = option
        .value()
        .attr("value")
        .map_or_else(|| option.text().collect::<String>(), str::to_string);

    let Some(prefix) = fragment
        .select(&PREFIX_INPUT)
        .next()
        .map(|input| input.value().attr("value").unwrap_or_default().to_string())
    else {
        log::debug!("[strato] Record row without prefix input skipped");
        return None;
    };

    let value = fragment
        .select(&VALUE_TEXTAREA)
        .next()
        .map(|textarea| textarea.text().collect::<String>())
        .unwrap_or_default();

    Some(DnsRecord::new(prefix, RecordType::from(record_type), value))
}
