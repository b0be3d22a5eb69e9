use std::collections::{HashSet, VecDeque};

use tracing::{debug, instrument};
use url::Url;

use crate::SoapError;
use crate::transport::{HttpRequest, HttpTransport};
use crate::wsdl::Definitions;

impl Definitions {
    /// Fetches the WSDL at `url` and every document reachable through `wsdl:import`.
    ///
    /// Import locations are resolved against the importing document's URL and each
    /// document is fetched once.
    #[instrument(name = "wsdl.load", level = "debug", skip(transport), err)]
    pub fn load<T: HttpTransport + ?Sized>(url: &str, transport: &T) -> Result<Self, SoapError> {
        let mut definitions = Definitions::default();
        let mut visited = HashSet::new();
        let mut pending = VecDeque::from([Url::parse(url)?]);

        while let Some(location) = pending.pop_front() {
            if !visited.insert(location.clone()) {
                continue;
            }

            let document = fetch(transport, &location)?;
            let mut parsed = Definitions::parse(&document)?;
            for import in parsed.imports.drain(..) {
                let resolved = location.join(&import.location)?;
                debug!(%resolved, namespace = ?import.namespace, "following wsdl:import");
                pending.push_back(resolved);
            }

            definitions.merge(parsed);
        }

        Ok(definitions)
    }
}

fn fetch<T: HttpTransport + ?Sized>(transport: &T, url: &Url) -> Result<String, SoapError> {
    let response = transport.send_request(HttpRequest::get(url.as_str()))?;
    if !response.is_success() {
        return Err(SoapError::HttpStatus {
            status: response.status_code,
            body: response.body,
        });
    }
    Ok(response.body)
}
