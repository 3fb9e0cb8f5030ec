//! Error types for the conversion engine.

use thiserror::Error;

use crate::model::ModelNodeId;
use crate::view::ViewElementId;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting between the model and the view.
#[derive(Error, Debug)]
pub enum Error {
    /// The schema does not allow the attribute on this node type.
    #[error("attribute '{key}' is not allowed on '{node_type}'")]
    AttributeNotAllowed { node_type: String, key: String },

    /// A model node id did not resolve.
    #[error("unknown model node: {0}")]
    UnknownModelNode(ModelNodeId),

    /// A view element id did not resolve.
    #[error("unknown view element: {0}")]
    UnknownViewElement(ViewElementId),

    /// No command is registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An element matcher pattern failed to compile.
    #[error("invalid matcher pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Markup could not be turned into a view tree.
    #[error("HTML error: {0}")]
    Html(String),
}
