use std::fmt;

use idmprov_xml::parser::{self, Node};

use crate::soap::XSI_NS;

/// A decoded response value.
///
/// There is no schema-driven typing: leaves are kept as their text content and
/// complex elements become ordered `(name, value)` lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoapValue {
    Nil,
    Text(String),
    Struct(Vec<(String, SoapValue)>),
}

impl SoapValue {
    pub(crate) fn from_node(node: Node<'_, '_>) -> Self {
        if is_nil(node) {
            return SoapValue::Nil;
        }

        let children: Vec<_> = parser::child_elements(node).collect();
        if children.is_empty() {
            return SoapValue::Text(text_content(node));
        }

        SoapValue::Struct(
            children
                .into_iter()
                .map(|child| (child.tag_name().name().to_owned(), SoapValue::from_node(child)))
                .collect(),
        )
    }

    /// Decodes a response wrapper such as `<getVersionResponse>`.
    ///
    /// A wrapper with a single child yields that child's value. A bare wrapper yields its
    /// text, or `Nil` when it is empty.
    pub(crate) fn from_wrapper(wrapper: Node<'_, '_>) -> Self {
        let mut children = parser::child_elements(wrapper);
        match (children.next(), children.next()) {
            (Some(only), None) => SoapValue::from_node(only),
            (Some(_), Some(_)) => SoapValue::from_node(wrapper),
            (None, _) => {
                if is_nil(wrapper) {
                    return SoapValue::Nil;
                }
                let text = text_content(wrapper);
                if text.trim().is_empty() {
                    SoapValue::Nil
                } else {
                    SoapValue::Text(text)
                }
            }
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SoapValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, SoapValue::Nil)
    }

    /// First field with the given name, for struct values.
    pub fn get(&self, name: &str) -> Option<&SoapValue> {
        match self {
            SoapValue::Struct(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            SoapValue::Nil => write!(f, "None"),
            SoapValue::Text(text) => write!(f, "'{text}'"),
            SoapValue::Struct(fields) => {
                writeln!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    write!(f, "{:width$}'{name}': ", "", width = indent + 4)?;
                    value.fmt_nested(f, indent + 4)?;
                    if i + 1 < fields.len() {
                        write!(f, ",")?;
                    }
                    writeln!(f)?;
                }
                write!(f, "{:width$}}}", "", width = indent)
            }
        }
    }
}

impl fmt::Display for SoapValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapValue::Text(text) => write!(f, "{text}"),
            other => other.fmt_nested(f, 0),
        }
    }
}

fn is_nil(node: Node<'_, '_>) -> bool {
    matches!(node.attribute((XSI_NS, "nil")), Some("true" | "1"))
}

fn text_content(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|child| child.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_wrapper(xml: &str) -> SoapValue {
        let doc = parser::parse(xml).unwrap();
        SoapValue::from_wrapper(doc.root_element())
    }

    #[test]
    fn single_child_is_unwrapped() {
        let value = decode_wrapper("<r><Version>4.7.0</Version></r>");
        assert_eq!(value, SoapValue::Text("4.7.0".to_owned()));
        assert_eq!(value.to_string(), "4.7.0");
    }

    #[test]
    fn empty_wrapper_is_nil() {
        assert!(decode_wrapper("<r/>").is_nil());
        assert!(decode_wrapper("<r>  </r>").is_nil());
    }

    #[test]
    fn xsi_nil_child_is_nil() {
        let value = decode_wrapper(&format!(
            r#"<r xmlns:xsi="{XSI_NS}"><result xsi:nil="true"/></r>"#
        ));
        assert_eq!(value, SoapValue::Nil);
        assert_eq!(value.to_string(), "None");
    }

    #[test]
    fn several_children_keep_the_wrapper() {
        let value = decode_wrapper("<r><major>4</major><minor>7</minor></r>");
        assert_eq!(value.get("minor").and_then(SoapValue::as_text), Some("7"));
        assert_eq!(value.to_string(), "{\n    'major': '4',\n    'minor': '7'\n}");
    }

    #[test]
    fn nested_structs_are_indented() {
        let value = decode_wrapper("<r><v><build><id>12</id></build><tag/></v></r>");
        assert_eq!(
            value.to_string(),
            "{\n    'build': {\n        'id': '12'\n    },\n    'tag': ''\n}"
        );
    }

    #[test]
    fn text_wrapper_without_children() {
        let value = decode_wrapper("<r>1.0</r>");
        assert_eq!(value.as_text(), Some("1.0"));
    }
}
