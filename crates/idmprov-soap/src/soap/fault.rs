use idmprov_xml::parser::{self, Node};

use crate::soap::SoapVersion;

/// A `Fault` returned in place of a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    pub code: String,
    pub subcode: Option<String>,
    pub message: String,
    /// Raw XML of the fault detail, if the server sent one.
    pub detail: Option<String>,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SOAP fault {}", self.code)?;
        if let Some(subcode) = &self.subcode {
            write!(f, " ({subcode})")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl SoapFault {
    pub(crate) fn from_node(node: Node<'_, '_>, version: SoapVersion) -> Self {
        match version {
            SoapVersion::Soap11 => Self::from_soap11(node),
            SoapVersion::Soap12 => Self::from_soap12(node),
        }
    }

    // 1.1 fault children are unqualified.
    fn from_soap11(node: Node<'_, '_>) -> Self {
        let child = |local: &str| {
            parser::child_elements(node).find(|c| c.tag_name().name() == local)
        };

        Self {
            code: child("faultcode").map(text_of).unwrap_or_default(),
            subcode: None,
            message: child("faultstring").map(text_of).unwrap_or_default(),
            detail: child("detail").map(inner_xml).filter(|d| !d.is_empty()),
        }
    }

    fn from_soap12(node: Node<'_, '_>) -> Self {
        let ns = SoapVersion::Soap12.envelope_namespace();
        let code = parser::first_child_named(node, ns, "Code");
        let value_of = |n: Node<'_, '_>| parser::first_child_named(n, ns, "Value").map(text_of);

        Self {
            code: code.and_then(value_of).unwrap_or_default(),
            subcode: code
                .and_then(|c| parser::first_child_named(c, ns, "Subcode"))
                .and_then(value_of),
            message: parser::first_child_named(node, ns, "Reason")
                .and_then(|r| parser::first_child_named(r, ns, "Text"))
                .map(text_of)
                .unwrap_or_default(),
            detail: parser::first_child_named(node, ns, "Detail")
                .map(inner_xml)
                .filter(|d| !d.is_empty()),
        }
    }
}

fn text_of(node: Node<'_, '_>) -> String {
    node.text().unwrap_or_default().trim().to_owned()
}

fn inner_xml(node: Node<'_, '_>) -> String {
    let input = node.document().input_text();
    parser::child_elements(node)
        .map(|child| &input[child.range()])
        .collect::<Vec<_>>()
        .join("")
}
