//! Configuration for the conversion-service client.
//!
//! All client behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share a config across tasks, serialise it for logging, and diff two
//! deployments to understand why their behaviour differs.
//!
//! The config deliberately replaces the process-wide mutable globals of
//! typical integration samples (a module-level base URL set once at startup)
//! with an explicit value passed to [`crate::client::Converter::new`], so
//! nothing here is shared or mutated after construction.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default converter path appended to the server URL.
pub const DEFAULT_CONVERTER_PATH: &str = "/ConvertService.ashx";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Header used for the signed token when no custom header is configured.
pub const DEFAULT_JWT_HEADER: &str = "Authorization";

/// Configuration for a [`crate::client::Converter`].
///
/// Built via [`ClientConfig::builder()`].
///
/// # Example
/// ```rust
/// use docserv_convert::ClientConfig;
///
/// let config = ClientConfig::builder("https://docserver.example.com")
///     .timeout_secs(30)
///     .jwt_secret("my-shared-secret")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the conversion server, e.g. `https://docserver.example.com`.
    pub server_url: String,

    /// Path of the converter endpoint on the server. Default: [`DEFAULT_CONVERTER_PATH`].
    ///
    /// The endpoint is the plain concatenation `server_url + converter_path`,
    /// matching how deployments configure the two halves separately.
    pub converter_path: String,

    /// Request timeout in seconds. Default: 120.
    ///
    /// Covers the whole round trip of one status check. Synchronous (non-async)
    /// conversions block server-side until the document is ready, so this
    /// must exceed the longest expected conversion; async polling calls
    /// return immediately and could use a much smaller value.
    pub timeout_secs: u64,

    /// JWT signing configuration. `None` disables request signing entirely:
    /// no token field in the body, no authorization header on the wire.
    pub jwt: Option<JwtConfig>,

    /// Skip TLS peer verification. Default: false.
    ///
    /// Only consulted when the endpoint scheme is `https`; plain-HTTP
    /// endpoints ignore it. Meant for staging servers with self-signed
    /// certificates, never for production.
    pub verify_peer_off: bool,
}

/// Shared-secret JWT signing settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing. Must match the server's secret.
    pub secret: String,

    /// Header the signed token travels in. Empty string falls back to
    /// [`DEFAULT_JWT_HEADER`]; the value is always `Bearer <token>`.
    pub header: String,
}

impl JwtConfig {
    /// The effective header name, applying the `Authorization` fallback.
    pub fn header_name(&self) -> &str {
        if self.header.is_empty() {
            DEFAULT_JWT_HEADER
        } else {
            &self.header
        }
    }
}

// Secrets stay out of Debug output; configs get logged.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("converter_path", &self.converter_path)
            .field("timeout_secs", &self.timeout_secs)
            .field("jwt", &self.jwt.as_ref().map(|j| j.header_name()))
            .field("verify_peer_off", &self.verify_peer_off)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder rooted at the given server URL.
    pub fn builder(server_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: ClientConfig {
                server_url: server_url.into(),
                converter_path: DEFAULT_CONVERTER_PATH.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                jwt: None,
                verify_peer_off: false,
            },
        }
    }

    /// Full converter endpoint: `server_url + converter_path`.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server_url, self.converter_path)
    }

    /// Whether the endpoint uses TLS.
    pub fn is_https(&self) -> bool {
        self.server_url.starts_with("https://")
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn converter_path(mut self, path: impl Into<String>) -> Self {
        self.config.converter_path = path.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    /// Enable signing with the default `Authorization` header.
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt = Some(JwtConfig {
            secret: secret.into(),
            header: String::new(),
        });
        self
    }

    /// Enable signing with a custom header name.
    pub fn jwt(mut self, secret: impl Into<String>, header: impl Into<String>) -> Self {
        self.config.jwt = Some(JwtConfig {
            secret: secret.into(),
            header: header.into(),
        });
        self
    }

    pub fn verify_peer_off(mut self, off: bool) -> Self {
        self.config.verify_peer_off = off;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ConvertError> {
        let c = &self.config;
        if !c.server_url.starts_with("http://") && !c.server_url.starts_with("https://") {
            return Err(ConvertError::InvalidConfig(format!(
                "server URL must start with http:// or https://, got '{}'",
                c.server_url
            )));
        }
        if c.converter_path.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "converter path must not be empty".into(),
            ));
        }
        if let Some(ref jwt) = c.jwt {
            if jwt.secret.is_empty() {
                return Err(ConvertError::InvalidConfig(
                    "JWT secret must not be empty when signing is enabled".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_plain_concatenation() {
        let config = ClientConfig::builder("https://ds.example.com")
            .converter_path("/converter")
            .build()
            .unwrap();
        assert_eq!(config.endpoint(), "https://ds.example.com/converter");
        assert!(config.is_https());
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::builder("http://ds.example.com").build().unwrap();
        assert_eq!(config.converter_path, DEFAULT_CONVERTER_PATH);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.jwt.is_none());
        assert!(!config.verify_peer_off);
        assert!(!config.is_https());
    }

    #[test]
    fn rejects_bad_scheme() {
        assert!(ClientConfig::builder("ftp://ds.example.com").build().is_err());
        assert!(ClientConfig::builder("").build().is_err());
    }

    #[test]
    fn rejects_empty_secret() {
        let result = ClientConfig::builder("http://ds.example.com")
            .jwt("", "AuthorizationJwt")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn empty_jwt_header_falls_back_to_authorization() {
        let config = ClientConfig::builder("http://ds.example.com")
            .jwt_secret("secret")
            .build()
            .unwrap();
        assert_eq!(config.jwt.unwrap().header_name(), "Authorization");
    }

    #[test]
    fn custom_jwt_header_is_kept() {
        let config = ClientConfig::builder("http://ds.example.com")
            .jwt("secret", "AuthorizationJwt")
            .build()
            .unwrap();
        assert_eq!(config.jwt.unwrap().header_name(), "AuthorizationJwt");
    }

    #[test]
    fn debug_hides_secret() {
        let config = ClientConfig::builder("http://ds.example.com")
            .jwt_secret("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("hunter2"), "got: {dbg}");
    }
}
