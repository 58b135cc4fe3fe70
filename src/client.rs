//! BGG XML API 2 client: request execution with bounded retries, error
//! document detection, and chunked catalog fetches.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::error::BggError;
use crate::extract;
use crate::model::game_detail::GameDetail;
use crate::model::owned_game::OwnedGame;
use crate::transport::{Transport, UreqTransport};

pub const BASE_URL: &str = "https://boardgamegeek.com/xmlapi2";

/// BGG rejects overly long URLs with 414, so id lists are split into chunks.
const MAX_IDS_PER_REQUEST: usize = 100;

/// Retry caps and delays per failure class. One attempt counter is shared
/// across classes within a single logical request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Connection-level failures (no HTTP status came back).
    pub connection_retries: u32,
    pub connection_delay: Duration,
    /// Status 202: accepted, still preparing the response.
    pub busy_retries: u32,
    pub busy_delay: Duration,
    /// Status 540, BGG's gateway-timeout code.
    pub gateway_timeout_retries: u32,
    pub gateway_timeout_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            connection_retries: 3,
            connection_delay: Duration::from_secs(2),
            busy_retries: 10,
            busy_delay: Duration::from_secs(5),
            gateway_timeout_retries: 3,
            gateway_timeout_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// The default caps with no sleeps between attempts.
    pub fn without_delays() -> Self {
        Self {
            connection_delay: Duration::ZERO,
            busy_delay: Duration::ZERO,
            gateway_timeout_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Synchronous client for the BGG XML API 2.
///
/// Every call blocks the current thread, including retry sleeps; a busy
/// endpoint can hold a single call for tens of seconds before the cap is hit.
/// Responses pass through the injected [`ResponseCache`] keyed by the full
/// request URL; only status-200 bodies are ever stored.
pub struct BggClient<T: Transport = UreqTransport> {
    base_url: String,
    transport: T,
    cache: Box<dyn ResponseCache>,
    retry: RetryPolicy,
}

impl BggClient<UreqTransport> {
    pub fn new(cache: Box<dyn ResponseCache>) -> Self {
        Self::with_transport(UreqTransport::new(), cache)
    }
}

impl<T: Transport> BggClient<T> {
    pub fn with_transport(transport: T, cache: Box<dyn ResponseCache>) -> Self {
        Self { base_url: BASE_URL.to_string(), transport, cache, retry: RetryPolicy::default() }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch a user's collection as owned-game records.
    pub fn collection(
        &self,
        username: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<OwnedGame>, BggError> {
        let mut query: Vec<(&str, &str)> = vec![("username", username)];
        query.extend_from_slice(params);
        let body = self.execute("/collection", &query)?;
        extract::parse_collection(&body)
    }

    /// Fetch game details for `game_ids`, preserving input order.
    ///
    /// Ids are fetched sequentially in chunks of at most 100. The first chunk
    /// failure aborts the whole call; no partial results are returned.
    pub fn game_list(&self, game_ids: &[u32]) -> Result<Vec<GameDetail>, BggError> {
        if game_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut games = Vec::new();
        for chunk in game_ids.chunks(MAX_IDS_PER_REQUEST) {
            let joined = chunk.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
            let body = self.execute("/thing/", &[("stats", "1"), ("id", &joined)])?;
            games.extend(extract::parse_game_details(&body)?);
        }
        Ok(games)
    }

    /// Issue one logical GET and return the raw body of a successful payload.
    ///
    /// Bounded retry state machine over a single attempt counter: connection
    /// failures and status 540 retry up to their caps with short delays,
    /// status 202 retries longer, any other non-200 fails immediately. A 200
    /// body whose root element is `<errors>` fails as [`BggError::Api`].
    pub fn execute(&self, path: &str, params: &[(&str, &str)]) -> Result<String, BggError> {
        let url = build_url(&self.base_url, path, params);
        let mut attempt: u32 = 0;

        loop {
            if let Some(body) = self.cache.lookup(&url) {
                debug!(url = %url, "cache hit");
                detect_api_error(&body, &url)?;
                return Ok(body);
            }

            debug!(url = %url, attempt, "GET");
            let fetched = match self.transport.get(&url) {
                Ok(fetched) => fetched,
                Err(e) => {
                    if attempt < self.retry.connection_retries {
                        warn!(url = %url, attempt, error = %e, "connection failed, retrying");
                        thread::sleep(self.retry.connection_delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(BggError::Transport {
                        attempts: attempt + 1,
                        message: e.to_string(),
                    });
                }
            };

            match fetched.status {
                200 => {
                    debug!(url = %url, bytes = fetched.body.len(), "response");
                    self.cache.store(&url, &fetched.body);
                    detect_api_error(&fetched.body, &url)?;
                    return Ok(fetched.body);
                }
                202 => {
                    if attempt < self.retry.busy_retries {
                        warn!(url = %url, attempt, "BGG still preparing the response, retrying");
                        thread::sleep(self.retry.busy_delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(BggError::Http { status: 202, url });
                }
                540 => {
                    if attempt < self.retry.gateway_timeout_retries {
                        warn!(url = %url, attempt, "gateway timeout, retrying");
                        thread::sleep(self.retry.gateway_timeout_delay);
                        attempt += 1;
                        continue;
                    }
                    return Err(BggError::Http { status: 540, url });
                }
                status => return Err(BggError::Http { status, url }),
            }
        }
    }
}

/// Check a 200 body for an API error document. BGG reports rejections as a
/// well-formed `<errors>` document with a 200 status.
fn detect_api_error(body: &str, url: &str) -> Result<(), BggError> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| BggError::Parse(format!("invalid XML from {}: {}", url, e)))?;

    let root = doc.root_element();
    if root.has_tag_name("errors") {
        let message = root
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| {
                let text = n.text()?.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(BggError::Api { url: url.to_string(), message });
    }
    Ok(())
}

fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!("{}{}", base, path);
    let mut sep = if path.contains('?') { '&' } else { '?' };
    for (key, value) in params {
        url.push(sep);
        url.push_str(key);
        url.push('=');
        url.push_str(&encode_query_value(value));
        sep = '&';
    }
    url
}

/// Percent-encode a query value. Commas stay literal so comma-joined id lists
/// read naturally in logs and cache keys.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b',' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_with_encoded_params() {
        let url = build_url(BASE_URL, "/collection", &[("username", "a user"), ("own", "1")]);
        assert_eq!(url, "https://boardgamegeek.com/xmlapi2/collection?username=a%20user&own=1");
    }

    #[test]
    fn keeps_commas_in_id_lists() {
        let url = build_url(BASE_URL, "/thing/", &[("stats", "1"), ("id", "1,2,3")]);
        assert_eq!(url, "https://boardgamegeek.com/xmlapi2/thing/?stats=1&id=1,2,3");
    }

    #[test]
    fn error_document_aggregates_leaf_text() {
        let body = r#"
            <errors>
              <error><message>Invalid username specified</message></error>
              <error><message>Rate limit exceeded</message></error>
            </errors>"#;
        let err = detect_api_error(body, "http://test/collection").unwrap_err();
        match err {
            BggError::Api { message, url } => {
                assert!(message.contains("Invalid username specified"));
                assert!(message.contains("Rate limit exceeded"));
                assert_eq!(url, "http://test/collection");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn items_document_passes_through() {
        assert!(detect_api_error("<items></items>", "http://test/").is_ok());
    }

    #[test]
    fn unparseable_body_is_a_parse_error() {
        let err = detect_api_error("not xml at all <<", "http://test/").unwrap_err();
        assert!(matches!(err, BggError::Parse(_)));
    }
}
