//! WSDL 1.1 model and loader.
//!
//! Only the parts needed to address and invoke operations are kept: messages, port types,
//! SOAP bindings and services. Schemas are not interpreted.

mod bound;
mod load;
mod parse;

use std::collections::HashMap;

use idmprov_xml::parser::QName;

use crate::soap::SoapVersion;

pub use bound::{BodyContent, BoundOperation, BoundPort};

pub const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";
pub const WSDL_SOAP11_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const WSDL_SOAP12_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Document,
    Rpc,
}

impl Style {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "document" => Some(Style::Document),
            "rpc" => Some(Style::Rpc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyUse {
    #[default]
    Literal,
    Encoded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartKind {
    Element(QName),
    Type(QName),
}

#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub kind: PartKind,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: QName,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone)]
pub struct AbstractOperation {
    pub name: String,
    pub input: Option<QName>,
    pub output: Option<QName>,
}

#[derive(Debug, Clone)]
pub struct PortType {
    pub name: QName,
    pub operations: Vec<AbstractOperation>,
}

/// `soap:body` settings of one direction of a bound operation.
#[derive(Debug, Clone, Default)]
pub struct BodyBinding {
    pub namespace: Option<String>,
    pub body_use: BodyUse,
}

#[derive(Debug, Clone)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: Option<String>,
    pub style: Option<Style>,
    pub input: BodyBinding,
}

/// A SOAP binding. Non-SOAP bindings are skipped while parsing.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: QName,
    pub port_type: QName,
    pub version: SoapVersion,
    pub style: Style,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub binding: QName,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: QName,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone)]
pub struct Import {
    pub namespace: Option<String>,
    pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub target_namespace: Option<String>,
    pub messages: HashMap<QName, Message>,
    pub port_types: HashMap<QName, PortType>,
    pub bindings: HashMap<QName, Binding>,
    /// Services in document order; imported documents come after the importing one.
    pub services: Vec<Service>,
    pub imports: Vec<Import>,
}

impl Definitions {
    /// Folds an imported document into this one. The first target namespace wins.
    pub fn merge(&mut self, other: Definitions) {
        if self.target_namespace.is_none() {
            self.target_namespace = other.target_namespace;
        }
        self.messages.extend(other.messages);
        self.port_types.extend(other.port_types);
        self.bindings.extend(other.bindings);
        self.services.extend(other.services);
        self.imports.extend(other.imports);
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.name.local == name)
    }
}
