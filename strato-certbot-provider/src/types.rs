use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Record prefix used for ACME DNS-01 validation records.
pub const ACME_CHALLENGE_PREFIX: &str = "_acme-challenge";

/// Registrable domain: the last two dot-separated labels.
#[allow(clippy::unwrap_used)]
static BASE_DOMAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w-]+\.[\w-]+)$").unwrap());

// ============ Domain ============

/// The domain a certificate is requested for, together with the
/// second-level domain whose zone holds its records.
///
/// ```rust
/// use strato_certbot_provider::DomainContext;
///
/// let domain = DomainContext::new("test.domain-a.de");
/// assert_eq!(domain.base_domain_name(), "domain-a.de");
/// assert_eq!(domain.sub_label(), Some("test"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainContext {
    domain_name: String,
    base_domain_name: String,
}

impl DomainContext {
    /// Derives the base domain from the requested name.
    ///
    /// A trailing root dot is removed first. Names with fewer than two
    /// labels are their own base domain.
    pub fn new(domain_name: impl Into<String>) -> Self {
        let domain_name = domain_name.into().trim_end_matches('.').to_string();
        let base_domain_name = BASE_DOMAIN_REGEX
            .captures(&domain_name)
            .and_then(|caps| caps.get(1))
            .map_or_else(|| domain_name.clone(), |m| m.as_str().to_string());

        Self {
            domain_name,
            base_domain_name,
        }
    }

    /// The requested domain as passed in (may carry a `*.` wildcard marker).
    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    /// The registrable domain owning the zone.
    pub fn base_domain_name(&self) -> &str {
        &self.base_domain_name
    }

    /// Labels of the requested domain below the base domain, if any.
    ///
    /// `foo.bar.example.com` yields `foo.bar`; `example.com` and
    /// `*.example.com` yield `None`.
    pub fn sub_label(&self) -> Option<&str> {
        let name = self
            .domain_name
            .strip_prefix("*.")
            .unwrap_or(&self.domain_name);
        let label = name
            .strip_suffix(self.base_domain_name.as_str())
            .unwrap_or(name)
            .trim_end_matches('.');

        (!label.is_empty() && name != self.base_domain_name).then_some(label)
    }
}

// ============ Records ============

/// DNS record type as offered by the portal's record editor.
///
/// The editor only knows TXT and CNAME today; anything else that shows up in
/// the markup is carried through unchanged so that publishing does not drop it.
///
/// Known types are matched case-insensitively and always rendered in upper
/// case, so a scraped `txt` is published back as `TXT` and addresses the same
/// key as [`RecordType::Txt`]. `Other` keeps the scraped spelling byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    Txt,
    Cname,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "TXT" => Self::Txt,
            "CNAME" => Self::Cname,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl From<String> for RecordType {
    /// Same normalisation as [`FromStr`]: `TXT`/`CNAME` in any case map to the
    /// canonical variant, everything else is kept verbatim.
    fn from(s: String) -> Self {
        match s.to_uppercase().as_str() {
            "TXT" => Self::Txt,
            "CNAME" => Self::Cname,
            _ => Self::Other(s),
        }
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.as_str().to_string()
    }
}

/// One row of the portal's TXT/CNAME editor.
///
/// `prefix` is relative to the base domain. Two records address the same
/// entry when prefix and type match; the value is not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub prefix: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
}

impl DnsRecord {
    pub fn new(prefix: impl Into<String>, record_type: RecordType, value: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            record_type,
            value: value.into(),
        }
    }

    /// Whether this record is addressed by `(prefix, record_type)`.
    pub fn has_key(&self, prefix: &str, record_type: &RecordType) -> bool {
        self.prefix == prefix && &self.record_type == record_type
    }

    /// Log line in the form `TYPE: prefix.base = value`.
    pub fn describe(&self, base_domain_name: &str) -> String {
        format!(
            "{}: {}.{} = {}",
            self.record_type, self.prefix, base_domain_name, self.value
        )
    }
}

// ============ Credentials ============

/// Customer login credentials.
///
/// The second factor is optional and only used when the portal asks for it.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Username or customer number.
    pub username: String,
    pub password: String,
    /// Base32 TOTP shared secret.
    pub totp_secret: Option<String>,
    /// Display name of the TOTP device as listed on the 2FA page.
    pub totp_devicename: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            totp_secret: None,
            totp_devicename: None,
        }
    }

    #[must_use]
    pub fn with_totp(
        mut self,
        totp_secret: impl Into<String>,
        totp_devicename: impl Into<String>,
    ) -> Self {
        self.totp_secret = Some(totp_secret.into());
        self.totp_devicename = Some(totp_devicename.into());
        self
    }

    /// Secret and device name, when both are set and non-empty.
    pub fn totp(&self) -> Option<(&str, &str)> {
        let secret = self.totp_secret.as_deref().filter(|s| !s.is_empty())?;
        let device = self.totp_devicename.as_deref().filter(|s| !s.is_empty())?;
        Some((secret, device))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("totp_secret", &self.totp_secret.as_ref().map(|_| "***"))
            .field("totp_devicename", &self.totp_devicename)
            .finish()
    }
}
