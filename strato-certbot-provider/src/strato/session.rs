//! Customer login, including the optional TOTP second factor.

use crate::error::Result;
use crate::http_client::Page;
use crate::types::Credentials;
use crate::utils::log_sanitizer::mask_secret;

use super::StratoProvider;
use super::scrape::{extract_device_id, extract_totp_token, is_two_factor_page};
use super::totp::totp_now;

impl StratoProvider {
    /// Logs in to the customer portal.
    ///
    /// Returns `Ok(true)` and stores the session id when the final page URL
    /// carries a `sessionID` query parameter, `Ok(false)` otherwise. Problems
    /// on the second-factor page are logged and surface only as a failed
    /// login. Transport errors are returned as `Err`.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<bool> {
        // 先请求一次入口页面以获取初始 cookie
        self.get_page(&[], "login page").await?;

        log::info!("[strato] Logging in as {}", credentials.username);
        let page = self
            .post_form(
                &[
                    ("identifier", credentials.username.as_str()),
                    ("passwd", credentials.password.as_str()),
                    ("action_customer_login.x", "Login"),
                ],
                "login",
            )
            .await?;

        let page = self.login_two_factor(page, credentials).await?;

        let Some(session_id) = page.query_param("sessionID") else {
            log::error!(
                "[strato] Login not accepted (HTTP {}, no sessionID in {})",
                page.status,
                page.url.path()
            );
            return Ok(false);
        };

        log::debug!("[strato] session_id: {}", mask_secret(&session_id));
        self.session_id = Some(session_id);
        Ok(true)
    }

    /// Answers the second-factor prompt if the portal shows one.
    ///
    /// Hands back `page` unchanged when no prompt is shown or the prompt
    /// cannot be answered.
    async fn login_two_factor(&self, page: Page, credentials: &Credentials) -> Result<Page> {
        if !is_two_factor_page(&page.body) {
            log::info!("[strato] 2FA is not used.");
            return Ok(page);
        }
        let Some((totp_secret, totp_devicename)) = credentials.totp() else {
            log::error!("[strato] 2FA parameter is not completely set.");
            return Ok(page);
        };

        let Some(totp_token) = extract_totp_token(&page.body) else {
            log::error!("[strato] Parsing error on 2FA site by totp_token.");
            return Ok(page);
        };

        let Some(device_id) = extract_device_id(&page.body, &credentials.username, totp_devicename)
        else {
            log::error!("[strato] Parsing error on 2FA site by device name '{totp_devicename}'.");
            return Ok(page);
        };

        let code = match totp_now(totp_secret) {
            Ok(code) => code,
            Err(e) => {
                log::error!("[strato] Cannot compute TOTP code: {e}");
                return Ok(page);
            }
        };
        log::debug!("[strato] totp: {}", mask_secret(&code));

        self.post_form(
            &[
                ("identifier", credentials.username.as_str()),
                ("totp_token", totp_token.as_str()),
                ("action_customer_login.x", "1"),
                ("pw_id", device_id.as_str()),
                ("totp", code.as_str()),
            ],
            "login 2FA",
        )
        .await
    }
}
