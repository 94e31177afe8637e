//! Scripted transport double for tests
//!
//! Answers requests from exact-payload rules (with per-domain fallbacks) and
//! records every exchange so tests can assert on request bytes and ordering.

use std::sync::{Arc, Mutex};

use alloy_primitives::hex;

use crate::codec::GioDomain;
use crate::errors::{GioEvmError, Result};
use crate::transport::{GioResponse, GioTransport};

#[derive(Clone)]
enum Reply {
    Respond(GioResponse),
    Fail(String),
}

struct Rule {
    domain: GioDomain,
    payload: Option<Vec<u8>>,
    reply: Reply,
}

#[derive(Default)]
struct Inner {
    rules: Mutex<Vec<Rule>>,
    log: Mutex<Vec<(GioDomain, Vec<u8>)>>,
}

/// Transport double; clones share the script and the traffic log
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Inner>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push_rule(&self, domain: GioDomain, payload: Option<Vec<u8>>, reply: Reply) {
        self.inner.rules.lock().unwrap().push(Rule {
            domain,
            payload,
            reply,
        });
    }

    /// Answers exactly `payload` under `domain` with 200 and `data`
    pub(crate) fn stub(&self, domain: GioDomain, payload: Vec<u8>, data: Vec<u8>) {
        self.push_rule(domain, Some(payload), Reply::Respond(GioResponse::ok(data)));
    }

    /// Answers exactly `payload` under `domain` with `code` and no data
    pub(crate) fn stub_code(&self, domain: GioDomain, payload: Vec<u8>, code: u32) {
        self.push_rule(
            domain,
            Some(payload),
            Reply::Respond(GioResponse { code, data: vec![] }),
        );
    }

    /// Answers any payload under `domain` with 200 and `data`
    pub(crate) fn stub_domain(&self, domain: GioDomain, data: Vec<u8>) {
        self.push_rule(domain, None, Reply::Respond(GioResponse::ok(data)));
    }

    /// Answers any payload under `domain` with `code` and no data
    pub(crate) fn stub_domain_code(&self, domain: GioDomain, code: u32) {
        self.push_rule(
            domain,
            None,
            Reply::Respond(GioResponse { code, data: vec![] }),
        );
    }

    /// Fails any payload under `domain` with a transport error
    pub(crate) fn fail_domain(&self, domain: GioDomain, message: &str) {
        self.push_rule(domain, None, Reply::Fail(message.to_string()));
    }

    /// Every exchange so far, in send order
    pub(crate) fn sent(&self) -> Vec<(GioDomain, Vec<u8>)> {
        self.inner.log.lock().unwrap().clone()
    }

    /// Domains touched so far, in send order
    pub(crate) fn sent_domains(&self) -> Vec<GioDomain> {
        self.sent().into_iter().map(|(domain, _)| domain).collect()
    }
}

impl GioTransport for MockTransport {
    async fn send(&self, domain: GioDomain, payload: &[u8]) -> Result<GioResponse> {
        self.inner
            .log
            .lock()
            .unwrap()
            .push((domain, payload.to_vec()));

        let rules = self.inner.rules.lock().unwrap();
        let exact = rules
            .iter()
            .find(|rule| rule.domain == domain && rule.payload.as_deref() == Some(payload));
        let fallback = rules
            .iter()
            .find(|rule| rule.domain == domain && rule.payload.is_none());
        match exact.or(fallback) {
            Some(rule) => match &rule.reply {
                Reply::Respond(response) => Ok(response.clone()),
                Reply::Fail(message) => Err(GioEvmError::Transport(message.clone())),
            },
            None => panic!(
                "unscripted gio request: domain {domain:?}, payload 0x{}",
                hex::encode(payload)
            ),
        }
    }
}
