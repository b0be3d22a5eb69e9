use std::borrow::Cow;

pub mod client;
pub mod soap;
pub mod transport;
pub mod value;
pub mod wsdl;

pub use client::{ServiceProxy, SoapClient};
pub use soap::fault::SoapFault;
pub use transport::{BasicAuth, HttpTransport, TransportConfig, UreqTransport};
pub use value::SoapValue;

#[derive(Debug, thiserror::Error)]
pub enum SoapError {
    #[error("Transport error: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    #[error("TLS setup error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("XML error: {0}")]
    Xml(#[from] idmprov_xml::XmlError),

    #[error("Invalid WSDL: {0}")]
    InvalidWsdl(Cow<'static, str>),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Service has no operation named '{0}'")]
    UnknownOperation(String),

    #[error("No SOAP port found: {0}")]
    NoSoapPort(Cow<'static, str>),

    #[error("{0}")]
    Fault(SoapFault),

    #[error("Invalid SOAP response: {0}")]
    InvalidResponse(Cow<'static, str>),
}

impl From<idmprov_xml::parser::Error> for SoapError {
    fn from(value: idmprov_xml::parser::Error) -> Self {
        SoapError::Xml(value.into())
    }
}

impl From<idmprov_xml::builder::XmlBuilderError> for SoapError {
    fn from(value: idmprov_xml::builder::XmlBuilderError) -> Self {
        SoapError::Xml(value.into())
    }
}
