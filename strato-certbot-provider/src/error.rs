use thiserror::Error;

/// Unified error type for all STRATO portal operations.
///
/// Only transport failures, a rejected login and invalid input are errors.
/// Markup that cannot be recognised is logged and degrades to a fallback
/// instead of being reported here.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("[strato] Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("[strato] Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The portal did not hand out a session id for the given credentials.
    #[error("[strato] Invalid credentials{}", message_suffix(.raw_message))]
    InvalidCredentials {
        /// Additional context, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g. a record prefix without a label).
    #[error("[strato] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The client configuration is unusable (e.g. malformed endpoint URL).
    #[error("[strato] Invalid configuration: {detail}")]
    InvalidConfig {
        /// Description of what's wrong.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、凭证错误等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::InvalidParameter { .. } | Self::InvalidConfig { .. }
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout {
                detail: e.to_string(),
            }
        } else {
            Self::NetworkError {
                detail: e.to_string(),
            }
        }
    }
}

fn message_suffix(raw_message: &Option<String>) -> String {
    raw_message
        .as_ref()
        .map(|msg| format!(": {msg}"))
        .unwrap_or_default()
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[strato] Network error: connection refused");
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = ProviderError::InvalidCredentials {
            raw_message: Some("login not accepted".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[strato] Invalid credentials: login not accepted"
        );
    }

    #[test]
    fn display_invalid_credentials_without_message() {
        let e = ProviderError::InvalidCredentials { raw_message: None };
        assert_eq!(e.to_string(), "[strato] Invalid credentials");
    }

    #[test]
    fn display_invalid_parameter() {
        let e = ProviderError::InvalidParameter {
            param: "prefix".to_string(),
            detail: "no label found".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "[strato] Invalid parameter 'prefix': no label found"
        );
    }

    #[test]
    fn display_timeout() {
        let e = ProviderError::Timeout {
            detail: "30s elapsed".to_string(),
        };
        assert_eq!(e.to_string(), "[strato] Request timeout: 30s elapsed");
    }

    #[test]
    fn expected_variants() {
        assert!(ProviderError::InvalidCredentials { raw_message: None }.is_expected());
        assert!(
            ProviderError::InvalidConfig {
                detail: "x".into()
            }
            .is_expected()
        );
        assert!(
            !ProviderError::NetworkError {
                detail: "x".into()
            }
            .is_expected()
        );
        assert!(
            !ProviderError::Timeout {
                detail: "x".into()
            }
            .is_expected()
        );
    }
}
