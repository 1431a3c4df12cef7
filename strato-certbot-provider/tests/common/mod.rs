//! 共享测试工具：模拟的 STRATO 客户门户

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Once;

use strato_certbot_provider::StratoProvider;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const PORTAL_PATH: &str = "/apps/CustomerService";
pub const USERNAME: &str = "12345678";
pub const PASSWORD: &str = "hunter2";
pub const SESSION_ID: &str = "8f2c1b0e5a";
/// RFC 6238 SHA1 seed "12345678901234567890"
pub const TOTP_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
pub const TOTP_DEVICE: &str = "Phone";

pub const LOGIN_PAGE: &str = r#"<html><body>
    <h1>Kunden-Login</h1>
    <form method="post"><input name="identifier"><input type="password" name="passwd"></form>
</body></html>"#;

pub const LOGIN_FAILED_PAGE: &str = r#"<html><body>
    <h1>Kunden-Login</h1>
    <p class="error">Die Zugangsdaten sind nicht korrekt.</p>
</body></html>"#;

pub const TWO_FACTOR_PAGE: &str = r#"<html><body>
    <h1>Zwei-Faktor-Authentifizierung</h1>
    <form method="post">
      <input type="hidden" name="totp_token" value="tok-123">
      <select name="pw_id">
        <option value="S.12345678.abc" selected="selected">Phone</option>
        <option value="S.12345678.def">Tablet</option>
      </select>
      <input type="text" name="totp">
    </form>
</body></html>"#;

pub const WELCOME_PAGE: &str = "<html><body><h1>Willkommen</h1></body></html>";

pub const PACKAGE_PAGE: &str = r#"<html><body>
    <table id="package_list">
      <thead><tr><th>Paket</th><th></th></tr></thead>
      <tbody>
        <tr>
          <td class="package-information">Hosting Basic | other-domain.de</td>
          <td class="jss_with_own_packagename"><a href="/apps/CustomerService?sessionID=8f2c1b0e5a&amp;cID=7&amp;node=kds_PackageOverview">Verwalten</a></td>
        </tr>
        <tr>
          <td class="package-information">Domain Paket | example.com</td>
          <td class="jss_with_own_packagename"><a href="/apps/CustomerService?sessionID=8f2c1b0e5a&amp;cID=42&amp;node=kds_PackageOverview">Verwalten</a></td>
        </tr>
      </tbody>
    </table>
</body></html>"#;

pub const RECORDS_PAGE: &str = r#"<html><body>
    <form method="post">
      <div class="txt-record">
        <select class="form" name="type"><option value="TXT">TXT</option><option value="CNAME" selected>CNAME</option></select>
        <input class="form" type="text" value="www" name="prefix">
        <textarea class="form" name="value">example.org.</textarea>
      </div>
      <div class="txt-record">
        <select class="form" name="type"><option value="TXT" selected>TXT</option><option value="CNAME">CNAME</option></select>
        <input class="form" type="text" value="_acme-challenge" name="prefix">
        <textarea class="form" name="value">old-token</textarea>
      </div>
      <input type="submit" name="action_change_txt_records" value="Einstellung übernehmen">
    </form>
</body></html>"#;

pub fn provider(server: &MockServer) -> StratoProvider {
    StratoProvider::builder()
        .api_url(format!("{}{PORTAL_PATH}", server.uri()))
        .build()
        .expect("provider for mock portal")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

fn redirect_to_session(server: &MockServer) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header(
        "location",
        format!(
            "{}{PORTAL_PATH}?sessionID={SESSION_ID}&node=kds_CustomerEntryPage",
            server.uri()
        ),
    )
}

/// Entry page and the page reached after a successful login.
pub async fn mount_entry_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PORTAL_PATH))
        .respond_with(html(LOGIN_PAGE))
        .with_priority(10)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(PORTAL_PATH))
        .and(query_param("sessionID", SESSION_ID))
        .respond_with(html(WELCOME_PAGE))
        .with_priority(5)
        .mount(server)
        .await;
}

/// Password login that is accepted without a second factor.
pub async fn mount_login(server: &MockServer) {
    mount_entry_pages(server).await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_string_contains(format!("passwd={PASSWORD}")))
        .respond_with(redirect_to_session(server))
        .mount(server)
        .await;
}

/// Password login followed by the TOTP prompt.
pub async fn mount_two_factor_login(server: &MockServer, expected_second_factor_posts: u64) {
    mount_entry_pages(server).await;
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_string_contains(format!("passwd={PASSWORD}")))
        .respond_with(html(TWO_FACTOR_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_string_contains("totp_token=tok-123"))
        .and(body_string_contains("pw_id=S.12345678.abc"))
        .respond_with(redirect_to_session(server))
        .expect(expected_second_factor_posts)
        .mount(server)
        .await;
}

pub async fn mount_package_list(server: &MockServer, page: &str) {
    Mock::given(method("GET"))
        .and(path(PORTAL_PATH))
        .and(query_param("sessionID", SESSION_ID))
        .and(query_param("cID", "0"))
        .and(query_param("node", "kds_CustomerEntryPage"))
        .respond_with(html(page))
        .with_priority(1)
        .mount(server)
        .await;
}

pub async fn mount_records(server: &MockServer, package_id: &str, page: &str) {
    Mock::given(method("GET"))
        .and(path(PORTAL_PATH))
        .and(query_param("sessionID", SESSION_ID))
        .and(query_param("cID", package_id))
        .and(query_param("node", "ManageDomains"))
        .and(query_param("action_show_txt_records", ""))
        .respond_with(html(page))
        .with_priority(1)
        .mount(server)
        .await;
}

pub async fn mount_publish(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(PORTAL_PATH))
        .and(body_string_contains("action_change_txt_records="))
        .respond_with(html(RECORDS_PAGE))
        .expect(1)
        .mount(server)
        .await;
}

/// Decoded form fields of a request body, in order.
pub fn form_fields(request: &Request) -> Vec<(String, String)> {
    url::form_urlencoded::parse(&request.body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// All values of form field `name`, in order.
pub fn field_values(fields: &[(String, String)], name: &str) -> Vec<String> {
    fields
        .iter()
        .filter(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
        .collect()
}

/// Form fields of the single record-set submit the server received.
pub async fn published_fields(server: &MockServer) -> Vec<(String, String)> {
    let requests = server.received_requests().await.unwrap_or_default();
    let publish: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(form_fields)
        .filter(|fields| fields.iter().any(|(k, _)| k == "action_change_txt_records"))
        .collect();
    assert_eq!(publish.len(), 1, "expected exactly one record submit");
    publish.into_iter().next().unwrap_or_default()
}

// ============ 日志捕获 ============

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Records every `log` line of the current thread.
///
/// `#[tokio::test]` runs on the test's own thread, so parallel tests do
/// not see each other's lines.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED.with(|lines| {
            lines
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INIT_LOGGER: Once = Once::new();

/// Starts capturing log lines for the current thread, dropping earlier ones.
pub fn capture_logs() {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("no other logger installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
}

/// Captured lines at `level` since the last [`capture_logs`].
pub fn logged_at(level: log::Level) -> Vec<String> {
    CAPTURED.with(|lines| {
        lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}
