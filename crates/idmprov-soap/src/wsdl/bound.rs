use std::collections::BTreeMap;

use idmprov_xml::parser::QName;

use crate::SoapError;
use crate::soap::SoapVersion;
use crate::wsdl::{
    AbstractOperation, Binding, BindingOperation, BodyUse, Definitions, PartKind, Port, Service,
    Style,
};

/// What goes inside `soap:Body` for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    Empty,
    /// Document style: the element of the input message's part.
    Element(QName),
    /// RPC style: a wrapper named after the operation.
    RpcWrapper { name: QName, encoded: bool },
}

/// An operation resolved through service, port, binding and port type.
#[derive(Debug, Clone)]
pub struct BoundOperation {
    pub name: String,
    pub address: String,
    pub version: SoapVersion,
    pub style: Style,
    pub soap_action: Option<String>,
    pub body: BodyContent,
}

#[derive(Debug, Clone)]
pub struct BoundPort {
    pub service: String,
    pub port: String,
    pub address: String,
    pub version: SoapVersion,
    /// Keyed by name, so iteration is alphabetical.
    pub operations: BTreeMap<String, BoundOperation>,
}

impl BoundPort {
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn operation(&self, name: &str) -> Option<&BoundOperation> {
        self.operations.get(name)
    }
}

impl Definitions {
    /// The first port of the first service that uses a SOAP binding.
    pub fn default_port(&self) -> Result<BoundPort, SoapError> {
        let service = self
            .services
            .first()
            .ok_or_else(|| SoapError::NoSoapPort("the WSDL defines no service".into()))?;
        let port = service
            .ports
            .iter()
            .find(|port| self.bindings.contains_key(&port.binding))
            .ok_or_else(|| {
                SoapError::NoSoapPort(
                    format!("service {} has no port with a SOAP binding", service.name).into(),
                )
            })?;
        self.bind_port(service, port)
    }

    pub fn bind(&self, service_name: &str, port_name: &str) -> Result<BoundPort, SoapError> {
        let service = self.service(service_name).ok_or_else(|| {
            SoapError::NoSoapPort(format!("service '{service_name}' is not defined").into())
        })?;
        let port = service
            .ports
            .iter()
            .find(|port| port.name == port_name)
            .ok_or_else(|| {
                SoapError::NoSoapPort(
                    format!("service '{service_name}' has no port '{port_name}'").into(),
                )
            })?;
        self.bind_port(service, port)
    }

    fn bind_port(&self, service: &Service, port: &Port) -> Result<BoundPort, SoapError> {
        let binding = self.bindings.get(&port.binding).ok_or_else(|| {
            SoapError::NoSoapPort(
                format!(
                    "port '{}' refers to {}, which is not a SOAP binding",
                    port.name, port.binding
                )
                .into(),
            )
        })?;
        let address = port.address.clone().ok_or_else(|| {
            SoapError::InvalidWsdl(format!("port '{}' has no soap:address", port.name).into())
        })?;
        let port_type = self.port_types.get(&binding.port_type).ok_or_else(|| {
            SoapError::InvalidWsdl(
                format!("binding {} refers to unknown portType {}", binding.name, binding.port_type)
                    .into(),
            )
        })?;

        let mut operations = BTreeMap::new();
        for operation in &binding.operations {
            let abstract_operation = port_type
                .operations
                .iter()
                .find(|candidate| candidate.name == operation.name)
                .ok_or_else(|| {
                    SoapError::InvalidWsdl(
                        format!(
                            "operation '{}' of binding {} is missing from portType {}",
                            operation.name, binding.name, port_type.name
                        )
                        .into(),
                    )
                })?;

            let style = operation.style.unwrap_or(binding.style);
            let bound = BoundOperation {
                name: operation.name.clone(),
                address: address.clone(),
                version: binding.version,
                style,
                soap_action: operation.soap_action.clone(),
                body: self.body_content(binding, operation, abstract_operation, style)?,
            };
            operations.entry(bound.name.clone()).or_insert(bound);
        }

        Ok(BoundPort {
            service: service.name.local.clone(),
            port: port.name.clone(),
            address,
            version: binding.version,
            operations,
        })
    }

    fn body_content(
        &self,
        binding: &Binding,
        operation: &BindingOperation,
        abstract_operation: &AbstractOperation,
        style: Style,
    ) -> Result<BodyContent, SoapError> {
        if style == Style::Rpc {
            let namespace = operation
                .input
                .namespace
                .as_deref()
                .or(binding.name.namespace.as_deref());
            return Ok(BodyContent::RpcWrapper {
                name: QName::new(namespace, &operation.name),
                encoded: operation.input.body_use == BodyUse::Encoded,
            });
        }

        let Some(message_name) = &abstract_operation.input else {
            return Ok(BodyContent::Empty);
        };
        let message = self.messages.get(message_name).ok_or_else(|| {
            SoapError::InvalidWsdl(
                format!(
                    "operation '{}' refers to unknown message {message_name}",
                    operation.name
                )
                .into(),
            )
        })?;

        Ok(match message.parts.first() {
            None => BodyContent::Empty,
            Some(part) => match &part.kind {
                PartKind::Element(element) => BodyContent::Element(element.clone()),
                PartKind::Type(_) => BodyContent::Element(QName::new(None, &part.name)),
            },
        })
    }
}
