use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, Url};
use tracing::{debug, warn};

use crate::error::HarnessError;
use crate::testing::{ErrorKind, Outcome};

use super::method::HttpMethod;
use super::request::TestCase;
use super::response::ResponseBody;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// POST endpoints drive proof generation and workflows, which run long.
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-call wait ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub standard: Duration,
    pub long_running: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            standard: DEFAULT_TIMEOUT,
            long_running: DEFAULT_LONG_TIMEOUT,
        }
    }
}

impl Timeouts {
    pub fn for_method(&self, method: HttpMethod) -> Duration {
        match method {
            HttpMethod::Post => self.long_running,
            _ => self.standard,
        }
    }
}

/// Issues one request per test case and turns whatever happens into an [`Outcome`].
pub struct Prober {
    client: Client,
    base_url: Url,
    timeouts: Timeouts,
}

impl Prober {
    pub fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, HarnessError> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|source| {
            HarnessError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            }
        })?;

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(HarnessError::ClientBuild)?;

        Ok(Self {
            client,
            base_url,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub async fn probe(&self, case: &TestCase) -> Outcome {
        if !case.method.is_supported() {
            warn!(name = %case.name, method = %case.method, "unsupported method, skipping request");
            return Outcome::errored(
                case,
                ErrorKind::UnsupportedMethod,
                format!("Unknown method: {}", case.method),
            );
        }

        let url = self.url_for(&case.path);
        let timeout = self.timeouts.for_method(case.method);
        debug!(name = %case.name, method = %case.method, %url, ?timeout, "sending request");

        let mut request = self
            .client
            .request(case.method.into(), &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .timeout(timeout);

        if let Some(body) = &case.body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return self.request_failed(case, &err, timeout),
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return self.request_failed(case, &err, timeout),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        debug!(name = %case.name, status, elapsed_ms, size = bytes.len(), "received response");
        Outcome::responded(case, status, elapsed_ms, ResponseBody::from_bytes(&bytes))
    }

    fn request_failed(&self, case: &TestCase, err: &reqwest::Error, timeout: Duration) -> Outcome {
        let kind = classify_reqwest_error(err);
        warn!(name = %case.name, error = %err, ?kind, "request failed");

        let message = match kind {
            ErrorKind::Timeout => format!("timeout after {}s", timeout.as_secs_f64()),
            _ => err.to_string(),
        };
        Outcome::errored(case, kind, message)
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        return ErrorKind::Timeout;
    }
    ErrorKind::TransportError
}
