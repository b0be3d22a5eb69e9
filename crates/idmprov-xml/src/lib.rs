use roxmltree::NodeType;

pub mod builder;
pub mod parser;

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("Invalid XML: {0}")]
    ParserError(#[from] crate::parser::Error),

    #[error("XML Builder error: {0}")]
    BuilderError(#[from] crate::builder::XmlBuilderError),

    #[error("Invalid tag: expected '{expected}', found '{found}'")]
    XmlInvalidTag { expected: String, found: String },

    #[error("Missing attribute '{attribute}' on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },

    #[error("Missing child <{child}> in <{tag}>")]
    MissingChild { tag: String, child: String },

    #[error("Namespace prefix '{prefix}' is not declared (in '{value}')")]
    UndeclaredPrefix { prefix: String, value: String },

    #[error("Invalid node type: expected '{expected:?}', found {found:?}")]
    InvalidNodeType { expected: NodeType, found: NodeType },
}
