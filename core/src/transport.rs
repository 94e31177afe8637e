//! HTTP transport for GIO exchanges
//!
//! One request, one response. The host exposes a single `gio` endpoint that
//! accepts `{"domain": <u32>, "id": "0x<hex>"}` and answers
//! `{"responseCode": <u32>, "response": "<hex>"}`. The transport moves bytes
//! and decodes the envelope; it never judges whether a response code means
//! success.

use std::time::Duration;

use alloy_primitives::hex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::codec::GioDomain;
use crate::errors::{GioEvmError, Result};

/// Decoded outcome of one GIO exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GioResponse {
    /// Protocol-level response code; 200 is success
    pub code: u32,
    /// Raw response payload with the hex envelope stripped
    pub data: Vec<u8>,
}

impl GioResponse {
    /// Response code the host uses for success
    pub const OK: u32 = 200;

    /// Builds a successful response carrying `data`
    pub fn ok(data: Vec<u8>) -> Self {
        Self {
            code: Self::OK,
            data,
        }
    }

    /// Whether the host reported success
    pub fn is_ok(&self) -> bool {
        self.code == Self::OK
    }

    /// Returns the payload if the host reported success, a protocol error
    /// carrying the offending code otherwise.
    pub fn require_ok(self, domain: GioDomain) -> Result<Vec<u8>> {
        if self.is_ok() {
            Ok(self.data)
        } else {
            Err(GioEvmError::Protocol {
                domain: domain.value(),
                code: self.code,
            })
        }
    }
}

/// A channel able to deliver one GIO request and hand back the decoded reply.
///
/// The production implementation is [`HttpTransport`]; tests script exchanges
/// through a double. Implementations report channel failures as
/// `Transport` errors and leave response-code judgement to callers.
pub trait GioTransport {
    /// Sends `payload` under `domain` and returns the host's reply.
    async fn send(&self, domain: GioDomain, payload: &[u8]) -> Result<GioResponse>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GioRequest<'a> {
    domain: u32,
    id: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GioReply {
    response_code: u32,
    response: String,
}

/// Hex payload of a reply, with or without a `0x` prefix
fn decode_reply_payload(text: &str) -> Result<Vec<u8>> {
    let body = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(body)?)
}

/// JSON-over-HTTP transport speaking to a host's `gio` endpoint
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Builds a transport for the host at `base_url`.
    ///
    /// The `gio` endpoint is resolved against the base once, so
    /// `http://127.0.0.1:5004` talks to `http://127.0.0.1:5004/gio`.
    pub fn new(base_url: &Url) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: base_url.join("gio")?,
        })
    }

    /// Builds a transport whose every request is bounded by `timeout`.
    ///
    /// There is no retry behind this: an elapsed timeout is a `Transport`
    /// error for the caller to handle.
    pub fn with_timeout(base_url: &Url, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            endpoint: base_url.join("gio")?,
        })
    }

    /// Endpoint requests are POSTed to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GioTransport for HttpTransport {
    async fn send(&self, domain: GioDomain, payload: &[u8]) -> Result<GioResponse> {
        let id = hex::encode_prefixed(payload);
        let request = GioRequest {
            domain: domain.value(),
            id: &id,
        };

        let reply: GioReply = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let data = decode_reply_payload(&reply.response)?;
        tracing::trace!(
            domain = domain.value(),
            code = reply.response_code,
            request_bytes = payload.len(),
            response_bytes = data.len(),
            "gio exchange"
        );
        Ok(GioResponse {
            code: reply.response_code,
            data,
        })
    }
}
