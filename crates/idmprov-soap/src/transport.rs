//! HTTP plumbing for the SOAP client.
//!
//! Events are emitted under this module's target (`idmprov_soap::transport`), which is
//! the namespace the command-line client raises with `--verbose`. Spans live under
//! `idmprov_soap::http` so they stay out of the console format.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use tracing::{debug, info_span, instrument};

use crate::SoapError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: vec![],
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: String) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![],
            body: Some(body),
        }
    }

    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Carries requests for the SOAP client. Non-2xx statuses are responses, not errors.
pub trait HttpTransport {
    fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, SoapError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, SoapError> {
        (**self).send_request(request)
    }
}

/// Username and password sent with every request as `Authorization: Basic ...`.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// WARNING: never log the returned value.
    pub fn header_value(&self) -> String {
        let creds = format!("{}:{}", self.username, self.password);
        let b64 = base64::engine::general_purpose::STANDARD.encode(creds.as_bytes());
        format!("Basic {b64}")
    }
}

impl Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct TransportConfig {
    #[builder(default, setter(strip_option))]
    pub auth: Option<BasicAuth>,
    #[builder(default = Duration::from_secs(30))]
    pub connect_timeout: Duration,
    #[builder(default = Duration::from_secs(60))]
    pub read_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Blocking transport backed by a single `ureq::Agent`.
pub struct UreqTransport {
    agent: ureq::Agent,
    auth: Option<BasicAuth>,
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Result<Self, SoapError> {
        let tls = native_tls::TlsConnector::new()?;
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .tls_connector(Arc::new(tls))
            .build();

        Ok(Self {
            agent,
            auth: config.auth,
        })
    }

    pub fn auth(&self) -> Option<&BasicAuth> {
        self.auth.as_ref()
    }
}

impl Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl HttpTransport for UreqTransport {
    #[instrument(name = "http_client.send_request", target = "idmprov_soap::http", level = "debug", skip(self, request), fields(method = ?request.method, url = %request.url), err)]
    fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, SoapError> {
        let mut ureq_request = match request.method {
            Method::Get => {
                debug!("HTTP Get to {}", request.url);
                self.agent.get(&request.url)
            }
            Method::Post => {
                debug!(
                    "HTTP Post to {}:\n{}",
                    request.url,
                    request.body.as_deref().unwrap_or_default()
                );
                self.agent.post(&request.url)
            }
        };

        for (name, value) in &request.headers {
            ureq_request = ureq_request.set(name, value);
        }

        if let Some(auth) = &self.auth {
            ureq_request = ureq_request.set("Authorization", &auth.header_value());
        }

        let response_result = match &request.body {
            Some(body) => ureq_request.send_string(body),
            None => ureq_request.call(),
        };

        let response = match response_result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(SoapError::Transport(Box::new(transport)));
            }
        };

        let span = info_span!(
            target: "idmprov_soap::http",
            "http.response",
            status = response.status()
        );
        let _enter = span.enter();

        let status_code = response.status();
        let headers: Vec<(String, String)> = response
            .headers_names()
            .iter()
            .filter_map(|name| {
                response
                    .header(name)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect();
        let body = response.into_string()?;

        debug!(
            "HTTP Response from {} (status: {}):\n{}",
            request.url, status_code, body
        );

        Ok(HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}
