use std::borrow::Cow;

use crate::builder::{escape, AliasMap, Attribute, Namespace, NamespaceWrite, XmlBuilderError};

#[derive(Debug, Clone)]
pub enum Content<'a> {
    /// Represents a text content within an XML element.
    Text(Cow<'a, str>),
    /// Represents a child element within an XML element.
    Elements(Vec<Element<'a>>),

    None,
}

/// Represents an XML element.
#[derive(Debug, Clone)]
pub struct Element<'a> {
    /// The name of the element.
    name: &'a str,
    /// The namespace the element belongs to.
    namespace: Option<Namespace<'a>>,
    /// `xmlns` declarations made on this element, in insertion order.
    namespaces_declaration: Vec<(Namespace<'a>, Option<&'a str>)>,
    /// The attributes of the element.
    attributes: Vec<Attribute<'a>>,
    /// The child elements of the element.
    content: Content<'a>,
}

impl<'a> Element<'a> {
    /// Creates a new instance of `Element` with the given name.
    ///
    /// # Example
    ///
    /// ```
    /// use idmprov_xml::builder::Element;
    /// let element = Element::new("root");
    /// ```
    pub fn new(name: &'a str) -> Self {
        Element {
            name,
            namespace: None,
            namespaces_declaration: Vec::new(),
            attributes: Vec::new(),
            content: Content::None,
        }
    }

    pub fn set_namespace(mut self, namespace: impl Into<Namespace<'a>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Declares `url` on this element, bound to `alias` (or as the default namespace when `None`).
    ///
    /// # Example
    ///
    /// ```
    /// use idmprov_xml::builder::Element;
    /// let element = Element::new("Envelope")
    ///     .set_namespace("http://schemas.xmlsoap.org/soap/envelope/")
    ///     .add_namespace_declaration("http://schemas.xmlsoap.org/soap/envelope/", Some("soap-env"));
    /// ```
    pub fn add_namespace_declaration(mut self, url: &'a str, alias: Option<&'a str>) -> Self {
        self.namespaces_declaration.push((Namespace::new(url), alias));
        self
    }

    pub fn add_attribute(mut self, attribute: Attribute<'a>) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn add_child(mut self, child: Element<'a>) -> Self {
        match self.content {
            Content::None | Content::Text(_) => {
                self.content = Content::Elements(vec![child]);
            }
            Content::Elements(ref mut children) => {
                children.push(child);
            }
        }
        self
    }

    pub fn add_children(mut self, children: Vec<Element<'a>>) -> Self {
        for child in children {
            self = self.add_child(child);
        }
        self
    }

    /// Sets the text content of the element. The text is escaped on output.
    pub fn set_text(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn name(&self) -> &'a str {
        self.name
    }
}

impl<'a> NamespaceWrite<'a> for Element<'a> {
    fn ns_write<W: std::io::Write>(
        &self,
        w: &mut W,
        alias_map: &AliasMap<'a>,
    ) -> Result<(), XmlBuilderError> {
        let scoped;
        let alias_map = if self.namespaces_declaration.is_empty() {
            alias_map
        } else {
            let mut map = alias_map.clone();
            for (ns, alias) in &self.namespaces_declaration {
                map.insert(*ns, *alias);
            }
            scoped = map;
            &scoped
        };

        let name = match &self.namespace {
            None => Cow::Borrowed(self.name),
            Some(ns) => match alias_map.get(ns) {
                Some(Some(alias)) => Cow::Owned(format!("{alias}:{}", self.name)),
                Some(None) => Cow::Borrowed(self.name),
                None => {
                    return Err(XmlBuilderError::NamespaceNotDeclared {
                        tag: self.name.to_string(),
                        ns: ns.url.to_string(),
                    });
                }
            },
        };

        w.write_fmt(format_args!("<{name}"))?;

        for (ns, alias) in &self.namespaces_declaration {
            match alias {
                Some(alias) => w.write_fmt(format_args!(" xmlns:{alias}=\"{}\"", ns.url))?,
                None => w.write_fmt(format_args!(" xmlns=\"{}\"", ns.url))?,
            }
        }

        for attribute in &self.attributes {
            attribute.ns_write(w, alias_map)?;
        }

        match &self.content {
            Content::None => {
                w.write_all(b"/>")?;
            }
            Content::Text(value) => {
                w.write_fmt(format_args!(">{}</{name}>", escape(value)))?;
            }
            Content::Elements(children) => {
                w.write_all(b">")?;
                for child in children {
                    child.ns_write(w, alias_map)?;
                }
                w.write_fmt(format_args!("</{name}>"))?;
            }
        }

        Ok(())
    }
}
