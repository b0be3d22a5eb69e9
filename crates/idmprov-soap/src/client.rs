use tracing::{debug, info, instrument};

use crate::SoapError;
use crate::soap::envelope;
use crate::transport::{HttpRequest, HttpTransport};
use crate::value::SoapValue;
use crate::wsdl::{BoundPort, Definitions};

/// A SOAP client bound to one WSDL description and one transport.
#[derive(Debug)]
pub struct SoapClient<T: HttpTransport> {
    definitions: Definitions,
    transport: T,
}

impl<T: HttpTransport> SoapClient<T> {
    /// Loads the WSDL at `wsdl_url` (and its imports) through `transport`.
    #[instrument(name = "soap_client.new", level = "info", skip(transport), err)]
    pub fn new(wsdl_url: &str, transport: T) -> Result<Self, SoapError> {
        let definitions = Definitions::load(wsdl_url, &transport)?;
        info!(
            services = definitions.services.len(),
            bindings = definitions.bindings.len(),
            "WSDL loaded"
        );
        Ok(Self::from_definitions(definitions, transport))
    }

    pub fn from_definitions(definitions: Definitions, transport: T) -> Self {
        Self {
            definitions,
            transport,
        }
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The default service: the first SOAP port of the first service that has one.
    pub fn service(&self) -> Result<ServiceProxy<'_, T>, SoapError> {
        let port = self.definitions.default_port()?;
        debug!(service = %port.service, port = %port.port, address = %port.address, "bound default port");
        Ok(ServiceProxy { client: self, port })
    }

    pub fn bind(&self, service: &str, port: &str) -> Result<ServiceProxy<'_, T>, SoapError> {
        let port = self.definitions.bind(service, port)?;
        Ok(ServiceProxy { client: self, port })
    }
}

/// Operations of one bound port.
#[derive(Debug)]
pub struct ServiceProxy<'c, T: HttpTransport> {
    client: &'c SoapClient<T>,
    port: BoundPort,
}

impl<T: HttpTransport> ServiceProxy<'_, T> {
    pub fn port(&self) -> &BoundPort {
        &self.port
    }

    /// Operation names, sorted and without duplicates.
    pub fn operation_names(&self) -> Vec<&str> {
        self.port.operation_names().collect()
    }

    /// Invokes an operation that takes no arguments.
    #[instrument(name = "soap_client.call", level = "info", skip(self), fields(address = %self.port.address), err)]
    pub fn call(&self, operation_name: &str) -> Result<SoapValue, SoapError> {
        let operation = self
            .port
            .operation(operation_name)
            .ok_or_else(|| SoapError::UnknownOperation(operation_name.to_owned()))?;

        let body = envelope::build_request(operation)?;
        let request = HttpRequest::post(operation.address.clone(), body)
            .with_headers(envelope::request_headers(operation));

        let response = self.client.transport.send_request(request)?;
        envelope::decode_response(&response)
    }
}
