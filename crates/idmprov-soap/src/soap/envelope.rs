use idmprov_xml::builder::{Attribute, Builder, Declaration, Element};
use idmprov_xml::parser;

use crate::SoapError;
use crate::soap::fault::SoapFault;
use crate::soap::{SOAP_ENCODING_NS, SoapVersion};
use crate::transport::HttpResponse;
use crate::value::SoapValue;
use crate::wsdl::{BodyContent, BoundOperation};

const ENVELOPE_PREFIX: &str = "soap-env";
const BODY_PREFIX: &str = "ns0";

/// Serializes the request envelope for a zero-argument call.
pub fn build_request(operation: &BoundOperation) -> Result<String, SoapError> {
    let env_ns = operation.version.envelope_namespace();

    let mut body = Element::new("Body").set_namespace(env_ns);
    let payload = match &operation.body {
        BodyContent::Empty => None,
        BodyContent::Element(name) => Some(payload_element(
            &name.local,
            name.namespace.as_deref(),
        )),
        BodyContent::RpcWrapper { name, encoded } => {
            let element = payload_element(&name.local, name.namespace.as_deref());
            Some(if *encoded {
                element.add_attribute(
                    Attribute::new("encodingStyle", SOAP_ENCODING_NS).set_namespace(env_ns),
                )
            } else {
                element
            })
        }
    };
    if let Some(payload) = payload {
        body = body.add_child(payload);
    }

    let envelope = Element::new("Envelope")
        .set_namespace(env_ns)
        .add_namespace_declaration(env_ns, Some(ENVELOPE_PREFIX))
        .add_child(body);

    let xml = Builder::new(Some(Declaration::new("1.0", "utf-8")), envelope).to_xml_string()?;
    Ok(xml)
}

fn payload_element<'a>(local: &'a str, namespace: Option<&'a str>) -> Element<'a> {
    let element = Element::new(local);
    match namespace {
        Some(ns) => element
            .set_namespace(ns)
            .add_namespace_declaration(ns, Some(BODY_PREFIX)),
        None => element,
    }
}

/// HTTP headers announcing the envelope and its action.
pub fn request_headers(operation: &BoundOperation) -> Vec<(String, String)> {
    let action = operation.soap_action.as_deref().unwrap_or_default();
    match operation.version {
        SoapVersion::Soap11 => vec![
            (
                "Content-Type".to_owned(),
                "text/xml; charset=utf-8".to_owned(),
            ),
            ("SOAPAction".to_owned(), format!("\"{action}\"")),
        ],
        SoapVersion::Soap12 => {
            let mut content_type = "application/soap+xml; charset=utf-8".to_owned();
            if !action.is_empty() {
                content_type.push_str(&format!("; action=\"{action}\""));
            }
            vec![("Content-Type".to_owned(), content_type)]
        }
    }
}

/// Decodes a response envelope: a fault becomes `SoapError::Fault`, anything else the
/// unwrapped value of the first body element.
pub fn parse_response(xml: &str) -> Result<SoapValue, SoapError> {
    let document = parser::parse(xml)?;
    let root = document.root_element();

    let version = root
        .tag_name()
        .namespace()
        .filter(|_| root.tag_name().name() == "Envelope")
        .and_then(SoapVersion::from_envelope_namespace)
        .ok_or_else(|| {
            SoapError::InvalidResponse(
                format!("expected a SOAP Envelope, found <{}>", root.tag_name().name()).into(),
            )
        })?;
    let env_ns = version.envelope_namespace();

    let body = parser::first_child_named(root, env_ns, "Body")
        .ok_or_else(|| SoapError::InvalidResponse("envelope has no Body".into()))?;

    let Some(payload) = parser::child_elements(body).next() else {
        return Ok(SoapValue::Nil);
    };

    if payload.tag_name().name() == "Fault" && payload.tag_name().namespace() == Some(env_ns) {
        return Err(SoapError::Fault(SoapFault::from_node(payload, version)));
    }

    Ok(SoapValue::from_wrapper(payload))
}

/// Interprets an HTTP response to a SOAP call.
///
/// Servers report faults with non-2xx statuses, so the body is checked for a fault
/// before the status is reported.
pub fn decode_response(response: &HttpResponse) -> Result<SoapValue, SoapError> {
    if response.is_success() {
        return parse_response(&response.body);
    }

    match parse_response(&response.body) {
        Err(fault @ SoapError::Fault(_)) => Err(fault),
        _ => Err(SoapError::HttpStatus {
            status: response.status_code,
            body: response.body.clone(),
        }),
    }
}
