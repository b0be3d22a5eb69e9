use idmprov_xml::parser::{self, Node, QName};
use tracing::{debug, trace};

use crate::SoapError;
use crate::soap::SoapVersion;
use crate::wsdl::{
    AbstractOperation, Binding, BindingOperation, BodyBinding, BodyUse, Definitions, Import,
    Message, Part, PartKind, Port, PortType, Service, Style, WSDL_NS, WSDL_SOAP11_NS,
    WSDL_SOAP12_NS,
};

impl Definitions {
    /// Parses a single WSDL document. `wsdl:import`s are recorded, not followed.
    pub fn parse(xml: &str) -> Result<Self, SoapError> {
        let document = parser::parse(xml)?;
        let root = document.root_element();
        parser::expect_tag(root, WSDL_NS, "definitions")?;

        let target_namespace = root.attribute("targetNamespace");
        let mut definitions = Definitions {
            target_namespace: target_namespace.map(str::to_owned),
            ..Default::default()
        };

        let qualify = |name: &str| QName::new(target_namespace, name);

        for child in parser::child_elements(root) {
            if child.tag_name().namespace() != Some(WSDL_NS) {
                continue;
            }

            match child.tag_name().name() {
                "import" => definitions.imports.push(Import {
                    namespace: child.attribute("namespace").map(str::to_owned),
                    location: parser::required_attribute(child, "location")?.to_owned(),
                }),
                "message" => {
                    let name = qualify(parser::required_attribute(child, "name")?);
                    let message = parse_message(child, name.clone())?;
                    definitions.messages.insert(name, message);
                }
                "portType" => {
                    let name = qualify(parser::required_attribute(child, "name")?);
                    let port_type = parse_port_type(child, name.clone())?;
                    definitions.port_types.insert(name, port_type);
                }
                "binding" => {
                    let name = qualify(parser::required_attribute(child, "name")?);
                    match parse_binding(child, name.clone())? {
                        Some(binding) => {
                            definitions.bindings.insert(name, binding);
                        }
                        None => debug!(binding = %name, "skipping non-SOAP binding"),
                    }
                }
                "service" => {
                    let name = qualify(parser::required_attribute(child, "name")?);
                    definitions.services.push(parse_service(child, name)?);
                }
                other => trace!(tag = other, "ignoring WSDL element"),
            }
        }

        Ok(definitions)
    }
}

fn parse_message(node: Node<'_, '_>, name: QName) -> Result<Message, SoapError> {
    let parts = parser::children_named(node, WSDL_NS, "part")
        .map(|part| -> Result<Part, SoapError> {
            let part_name = parser::required_attribute(part, "name")?.to_owned();
            let kind = if let Some(element) = part.attribute("element") {
                PartKind::Element(parser::resolve_qname(part, element)?)
            } else if let Some(type_name) = part.attribute("type") {
                PartKind::Type(parser::resolve_qname(part, type_name)?)
            } else {
                return Err(SoapError::InvalidWsdl(
                    format!("part '{part_name}' of message {name} has neither element nor type")
                        .into(),
                ));
            };
            Ok(Part {
                name: part_name,
                kind,
            })
        })
        .collect::<Result<Vec<_>, SoapError>>()?;

    Ok(Message { name, parts })
}

fn parse_port_type(node: Node<'_, '_>, name: QName) -> Result<PortType, SoapError> {
    let message_ref = |operation: Node<'_, '_>, direction: &'static str| {
        parser::first_child_named(operation, WSDL_NS, direction)
            .and_then(|io| io.attribute("message").map(|value| (io, value)))
            .map(|(io, value)| parser::resolve_qname(io, value))
            .transpose()
    };

    let operations = parser::children_named(node, WSDL_NS, "operation")
        .map(|operation| -> Result<AbstractOperation, SoapError> {
            Ok(AbstractOperation {
                name: parser::required_attribute(operation, "name")?.to_owned(),
                input: message_ref(operation, "input")?,
                output: message_ref(operation, "output")?,
            })
        })
        .collect::<Result<Vec<_>, SoapError>>()?;

    Ok(PortType { name, operations })
}

/// Returns `None` for bindings without a `soap:binding` or `soap12:binding` child.
fn parse_binding(node: Node<'_, '_>, name: QName) -> Result<Option<Binding>, SoapError> {
    let (soap_ns, version, soap_binding) =
        if let Some(b) = parser::first_child_named(node, WSDL_SOAP11_NS, "binding") {
            (WSDL_SOAP11_NS, SoapVersion::Soap11, b)
        } else if let Some(b) = parser::first_child_named(node, WSDL_SOAP12_NS, "binding") {
            (WSDL_SOAP12_NS, SoapVersion::Soap12, b)
        } else {
            return Ok(None);
        };

    let style = soap_binding
        .attribute("style")
        .and_then(Style::parse)
        .unwrap_or(Style::Document);

    let port_type = parser::resolve_qname(node, parser::required_attribute(node, "type")?)?;

    let operations = parser::children_named(node, WSDL_NS, "operation")
        .map(|operation| -> Result<BindingOperation, SoapError> {
            let soap_operation = parser::first_child_named(operation, soap_ns, "operation");
            let input = parser::first_child_named(operation, WSDL_NS, "input")
                .and_then(|input| parser::first_child_named(input, soap_ns, "body"))
                .map(|body| BodyBinding {
                    namespace: body.attribute("namespace").map(str::to_owned),
                    body_use: match body.attribute("use") {
                        Some("encoded") => BodyUse::Encoded,
                        _ => BodyUse::Literal,
                    },
                })
                .unwrap_or_default();

            Ok(BindingOperation {
                name: parser::required_attribute(operation, "name")?.to_owned(),
                soap_action: soap_operation
                    .and_then(|op| op.attribute("soapAction"))
                    .map(str::to_owned),
                style: soap_operation
                    .and_then(|op| op.attribute("style"))
                    .and_then(Style::parse),
                input,
            })
        })
        .collect::<Result<Vec<_>, SoapError>>()?;

    Ok(Some(Binding {
        name,
        port_type,
        version,
        style,
        operations,
    }))
}

fn parse_service(node: Node<'_, '_>, name: QName) -> Result<Service, SoapError> {
    let ports = parser::children_named(node, WSDL_NS, "port")
        .map(|port| -> Result<Port, SoapError> {
            let address = parser::child_elements(port)
                .find(|child| {
                    let tag = child.tag_name();
                    tag.name() == "address"
                        && matches!(tag.namespace(), Some(WSDL_SOAP11_NS | WSDL_SOAP12_NS))
                })
                .and_then(|address| address.attribute("location"))
                .map(str::to_owned);

            Ok(Port {
                name: parser::required_attribute(port, "name")?.to_owned(),
                binding: parser::resolve_qname(port, parser::required_attribute(port, "binding")?)?,
                address,
            })
        })
        .collect::<Result<Vec<_>, SoapError>>()?;

    Ok(Service { name, ports })
}
