#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use idmprov_soap::SoapError;
use idmprov_soap::transport::{HttpRequest, HttpResponse, HttpTransport};

pub const ENDPOINT: &str = "http://localhost:8180/IDMProv/provisioning/service";

pub fn resource(name: &str) -> String {
    let path = format!("{}/tests/resources/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

pub fn ok(body: impl Into<String>) -> HttpResponse {
    status(200, body)
}

pub fn status(status_code: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status_code,
        headers: vec![],
        body: body.into(),
    }
}

/// Answers from a URL-keyed table and records every request it receives.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: HashMap<String, HttpResponse>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, response: HttpResponse) -> Self {
        self.responses.insert(url.to_owned(), response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, SoapError> {
        let response = self
            .responses
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| status(404, "not found"));
        self.requests.borrow_mut().push(request);
        Ok(response)
    }
}
