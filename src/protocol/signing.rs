//! Request signing: optional JWT tokens over the outbound request.
//!
//! Servers with signing enabled validate two tokens per request: one in a
//! configurable authorization header wrapping the request as
//! `{"payload": <fields>}`, and one embedded as the `token` field of the
//! body, signed over the fields alone. Same secret, same algorithm (HS256),
//! different claim shapes.
//!
//! Both tokens are computed from the same immutable [`ConversionRequest`],
//! in either order, so a retried request re-signs to byte-identical tokens.

use crate::config::JwtConfig;
use crate::error::ConvertError;
use crate::protocol::request::ConversionRequest;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;

/// Signs outbound requests, or does nothing when signing is disabled.
#[derive(Debug, Clone)]
pub enum AuthSigner {
    /// No header is added and no `token` field appears in the body.
    Disabled,
    /// HS256 signing with a shared secret.
    Jwt {
        secret: String,
        header_name: String,
    },
}

impl AuthSigner {
    /// Build a signer from the client configuration.
    pub fn from_config(jwt: Option<&JwtConfig>) -> AuthSigner {
        match jwt {
            Some(cfg) => AuthSigner::Jwt {
                secret: cfg.secret.clone(),
                header_name: cfg.header_name().to_string(),
            },
            None => AuthSigner::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, AuthSigner::Jwt { .. })
    }

    /// Name of the header the token travels in, when signing is enabled.
    pub fn header_name(&self) -> Option<&str> {
        match self {
            AuthSigner::Disabled => None,
            AuthSigner::Jwt { header_name, .. } => Some(header_name),
        }
    }

    /// Token for the transport header: signs `{"payload": <request>}`.
    pub fn header_token(
        &self,
        request: &ConversionRequest,
    ) -> Result<Option<String>, ConvertError> {
        match self {
            AuthSigner::Disabled => Ok(None),
            AuthSigner::Jwt { secret, .. } => {
                #[derive(Serialize)]
                struct Wrapped<'a> {
                    payload: &'a ConversionRequest,
                }
                sign(secret, &Wrapped { payload: request }).map(Some)
            }
        }
    }

    /// Token for the body's `token` field: signs the request fields alone.
    pub fn body_token(&self, request: &ConversionRequest) -> Result<Option<String>, ConvertError> {
        match self {
            AuthSigner::Disabled => Ok(None),
            AuthSigner::Jwt { secret, .. } => sign(secret, request).map(Some),
        }
    }
}

fn sign<T: Serialize>(secret: &str, claims: &T) -> Result<String, ConvertError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ConvertError::Signing {
        detail: e.to_string(),
    })
}
