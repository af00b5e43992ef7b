//! # HTTP Boundary
//!
//! corekit does not ship an HTTP server; the host framework does. This module
//! defines the thin contract the library consumes ([`HttpRequest`]), the JSON
//! response it produces ([`JsonResponse`]), and two request filters recovered
//! from the original middleware stack:
//!
//! - [`CronFilter`]: rejects requests to protected endpoints unless they carry
//!   the App Engine cron header.
//! - [`ForceSslFilter`]: redirects insecure requests to the https scheme,
//!   exempting cron requests (the scheduler always calls over http).

pub mod responder;

pub use responder::{ErrorResponder, RequestError};

use serde_json::{json, Value};

use crate::config::Protocol;
use crate::translate::Translator;
use crate::types::HttpStatus;

/// Header set by the App Engine scheduler on cron invocations.
pub const CRON_HEADER: &str = "X-Appengine-Cron";

/// What the library needs to know about an incoming request.
pub trait HttpRequest {
    /// Whether the client asked for a JSON response.
    fn wants_json(&self) -> bool;

    fn has_header(&self, name: &str) -> bool;

    /// Whether the request arrived over a secure scheme.
    fn is_secure(&self) -> bool;

    fn host(&self) -> &str;

    /// Path and query of the request.
    fn uri(&self) -> &str;
}

/// A JSON response the host framework should send.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status: u16,
    pub body: Value,
}

impl JsonResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Outcome of a request filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// Let the request continue down the pipeline.
    Next,
    /// Short-circuit with a response.
    Respond(JsonResponse),
    /// Redirect the client.
    Redirect { location: String, status: u16 },
}

/// Rejects requests that do not come from the App Engine scheduler.
pub struct CronFilter<'a> {
    translator: &'a dyn Translator,
    prefix: &'a str,
}

impl<'a> CronFilter<'a> {
    pub fn new(translator: &'a dyn Translator, prefix: &'a str) -> Self {
        Self { translator, prefix }
    }

    pub fn handle(&self, request: &dyn HttpRequest) -> FilterOutcome {
        if !request.has_header(CRON_HEADER) {
            let message = self
                .translator
                .translate(&format!("{}.unauthorized", self.prefix));
            return FilterOutcome::Respond(JsonResponse::new(
                HttpStatus::UNAUTHORIZED as u16,
                json!(message),
            ));
        }
        FilterOutcome::Next
    }
}

/// Redirects insecure requests to https when the configured protocol demands
/// it. Cron requests are exempt.
pub struct ForceSslFilter {
    protocol: Protocol,
}

impl ForceSslFilter {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }

    pub fn handle(&self, request: &dyn HttpRequest) -> FilterOutcome {
        if !request.is_secure()
            && self.protocol == Protocol::Https
            && !request.has_header(CRON_HEADER)
        {
            return FilterOutcome::Redirect {
                location: format!("https://{}{}", request.host(), request.uri()),
                status: HttpStatus::MOVED_PERMANENTLY as u16,
            };
        }
        FilterOutcome::Next
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal request double for filter and responder tests.
    pub struct FakeRequest {
        pub json: bool,
        pub headers: Vec<String>,
        pub secure: bool,
        pub host: String,
        pub uri: String,
    }

    impl Default for FakeRequest {
        fn default() -> Self {
            Self {
                json: true,
                headers: Vec::new(),
                secure: false,
                host: "example.test".to_string(),
                uri: "/".to_string(),
            }
        }
    }

    impl HttpRequest for FakeRequest {
        fn wants_json(&self) -> bool {
            self.json
        }

        fn has_header(&self, name: &str) -> bool {
            self.headers.iter().any(|header| header == name)
        }

        fn is_secure(&self) -> bool {
            self.secure
        }

        fn host(&self) -> &str {
            &self.host
        }

        fn uri(&self) -> &str {
            &self.uri
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FakeRequest;
    use super::*;
    use crate::translate::CatalogTranslator;

    #[test]
    fn test_cron_filter_rejects_without_header() {
        let translator = CatalogTranslator::new().with_entry("general.unauthorized", "Unauthorized");
        let filter = CronFilter::new(&translator, "general");

        let outcome = filter.handle(&FakeRequest::default());
        match outcome {
            FilterOutcome::Respond(response) => {
                assert_eq!(response.status, 401);
                assert_eq!(response.body, json!("Unauthorized"));
            }
            other => panic!("expected Respond, got {:?}", other),
        }
    }

    #[test]
    fn test_cron_filter_passes_with_header() {
        let translator = CatalogTranslator::new();
        let filter = CronFilter::new(&translator, "general");

        let request = FakeRequest {
            headers: vec![CRON_HEADER.to_string()],
            ..Default::default()
        };
        assert_eq!(filter.handle(&request), FilterOutcome::Next);
    }

    #[test]
    fn test_force_ssl_redirects_insecure() {
        let filter = ForceSslFilter::new(Protocol::Https);
        let request = FakeRequest {
            uri: "/path?query=1".to_string(),
            ..Default::default()
        };

        assert_eq!(
            filter.handle(&request),
            FilterOutcome::Redirect {
                location: "https://example.test/path?query=1".to_string(),
                status: 301,
            }
        );
    }

    #[test]
    fn test_force_ssl_exempts_cron_and_secure() {
        let filter = ForceSslFilter::new(Protocol::Https);

        let cron = FakeRequest {
            headers: vec![CRON_HEADER.to_string()],
            ..Default::default()
        };
        assert_eq!(filter.handle(&cron), FilterOutcome::Next);

        let secure = FakeRequest {
            secure: true,
            ..Default::default()
        };
        assert_eq!(filter.handle(&secure), FilterOutcome::Next);
    }

    #[test]
    fn test_force_ssl_noop_on_http_protocol() {
        let filter = ForceSslFilter::new(Protocol::Http);
        assert_eq!(filter.handle(&FakeRequest::default()), FilterOutcome::Next);
    }
}
