use std::borrow::Cow;

use crate::builder::{escape, AliasMap, Namespace, NamespaceWrite, XmlBuilderError};

/// Represents an XML attribute with a name and value.
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// The name of the attribute.
    name: &'a str,
    /// The value of the attribute, unescaped.
    value: Cow<'a, str>,

    namespace: Option<Namespace<'a>>,
}

impl<'a> Attribute<'a> {
    /// Creates a new instance of `Attribute`.
    ///
    /// # Example
    ///
    /// ```
    /// use idmprov_xml::builder::Attribute;
    /// let attribute = Attribute::new("name", "value");
    /// ```
    pub fn new(name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        Attribute {
            name,
            value: value.into(),
            namespace: None,
        }
    }

    pub fn set_namespace(mut self, namespace: impl Into<Namespace<'a>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl<'a> NamespaceWrite<'a> for Attribute<'a> {
    fn ns_write<W: std::io::Write>(
        &self,
        w: &mut W,
        alias_map: &AliasMap<'a>,
    ) -> Result<(), XmlBuilderError> {
        let name = match &self.namespace {
            None => Cow::Borrowed(self.name),
            Some(ns) => match alias_map.get(ns) {
                Some(Some(alias)) => Cow::Owned(format!("{alias}:{}", self.name)),
                // Unprefixed attributes never pick up the default namespace.
                Some(None) | None => {
                    return Err(XmlBuilderError::NamespaceHasNoAlias {
                        tag: self.name.to_string(),
                        ns: ns.url.to_string(),
                    });
                }
            },
        };

        w.write_fmt(format_args!(" {}=\"{}\"", name, escape(&self.value)))?;
        Ok(())
    }
}
