pub use roxmltree::*;
use tracing::trace;

use crate::XmlError;

pub fn parse(xml: &str) -> Result<Document<'_>, roxmltree::Error> {
    roxmltree::Document::parse(xml)
}

/// An owned, namespace-resolved XML name, displayed in Clark notation (`{ns}local`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_owned),
            local: local.to_owned(),
        }
    }

    pub fn of(node: Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        Self::new(tag.namespace(), tag.name())
    }

    pub fn matches(&self, node: Node<'_, '_>) -> bool {
        let tag = node.tag_name();
        tag.name() == self.local && tag.namespace() == self.namespace.as_deref()
    }
}

impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// Resolves a `prefix:local` attribute value against the namespaces in scope at `node`.
///
/// An unprefixed value picks up the default namespace, if one is declared.
pub fn resolve_qname(node: Node<'_, '_>, value: &str) -> Result<QName, XmlError> {
    let value = value.trim();
    match value.split_once(':') {
        Some((prefix, local)) => {
            let namespace = node.lookup_namespace_uri(Some(prefix)).ok_or_else(|| {
                XmlError::UndeclaredPrefix {
                    prefix: prefix.to_owned(),
                    value: value.to_owned(),
                }
            })?;
            Ok(QName::new(Some(namespace), local))
        }
        None => Ok(QName::new(node.lookup_namespace_uri(None), value)),
    }
}

pub fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, XmlError> {
    node.attribute(name).ok_or_else(|| XmlError::MissingAttribute {
        tag: node.tag_name().name().to_owned(),
        attribute: name.to_owned(),
    })
}

pub fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Element children of `node` with the given namespace and local name.
pub fn children_named<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    local: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    child_elements(node).filter(move |child| {
        let tag = child.tag_name();
        tag.name() == local && tag.namespace() == Some(namespace)
    })
}

pub fn first_child_named<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    local: &'a str,
) -> Option<Node<'a, 'input>> {
    children_named(node, namespace, local).next()
}

pub fn expect_tag(node: Node<'_, '_>, namespace: &str, local: &str) -> Result<(), XmlError> {
    if !node.is_element() {
        return Err(XmlError::InvalidNodeType {
            expected: NodeType::Element,
            found: node.node_type(),
        });
    }

    let found = QName::of(node);
    if found.local == local && found.namespace.as_deref() == Some(namespace) {
        Ok(())
    } else {
        trace!(expected = local, found = %found, "unexpected tag");
        Err(XmlError::XmlInvalidTag {
            expected: QName::new(Some(namespace), local).to_string(),
            found: found.to_string(),
        })
    }
}
