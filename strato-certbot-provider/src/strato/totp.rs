//! RFC 6238 TOTP 一次性密码 (HMAC-SHA1, 30s, 6 位)

use chrono::Utc;
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{ProviderError, Result};

type HmacSha1 = Hmac<Sha1>;

/// 时间步长（秒）
const TOTP_STEP_SECS: i64 = 30;
/// 验证码位数
const TOTP_DIGITS: u32 = 6;

/// Computes the one-time code for the current time.
pub(crate) fn totp_now(secret: &str) -> Result<String> {
    totp_at(secret, Utc::now().timestamp())
}

/// Computes the one-time code valid at `timestamp` (Unix seconds).
///
/// The secret is base32, case-insensitive; whitespace and `=` padding are ignored.
pub(crate) fn totp_at(secret: &str, timestamp: i64) -> Result<String> {
    let key = decode_secret(secret)?;
    let counter = u64::try_from(timestamp.div_euclid(TOTP_STEP_SECS)).unwrap_or_default();
    Ok(hotp(&key, counter))
}

fn decode_secret(secret: &str) -> Result<Vec<u8>> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|e| ProviderError::InvalidParameter {
            param: "totp_secret".to_string(),
            detail: format!("not a base32 secret: {e}"),
        })
}

/// RFC 4226 HOTP with dynamic truncation.
fn hotp(key: &[u8], counter: u64) -> String {
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    format!(
        "{:0width$}",
        binary % 10_u32.pow(TOTP_DIGITS),
        width = TOTP_DIGITS as usize
    )
}
