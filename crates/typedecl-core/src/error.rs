//! Error types for tree passes.
//!
//! Every pass over a [`Module`](crate::Module) is fail-fast: the first error
//! aborts the pass and is returned to the caller. Nothing is retried, since
//! the passes are deterministic functions of their input tree.
//!
//! ## Error Hierarchy
//!
//! ```text
//! TreeError
//! ├── UnresolvedName       - a referenced class name has no definition
//! ├── UnsupportedConstruct - multi-parameter or self-recursive instantiation
//! ├── MalformedNode        - arity mismatch, unrenderable name, empty overloads
//! └── UnsupportedNode      - a node kind appears where a pass cannot handle it
//!
//! NameResolutionError      - symbol table miss, converts into UnresolvedName
//! ```

use thiserror::Error;

use crate::NodeKind;

/// A symbol table lookup found no class with the requested name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no class named '{name}'")]
pub struct NameResolutionError {
    /// The name that was looked up.
    pub name: String,
}

impl NameResolutionError {
    /// Create a new lookup failure for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors raised while traversing, resolving, instantiating or printing a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A class reference names a class the module does not define.
    #[error("unresolved class name '{name}'")]
    UnresolvedName {
        /// The name that could not be resolved.
        name: String,
    },

    /// The tree asks for something the passes deliberately do not support.
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct {
        /// Description of the construct, including its rendered form.
        construct: String,
    },

    /// A node violates a structural rule of the model.
    #[error("malformed {kind}: {message}")]
    MalformedNode {
        /// Kind of the offending node.
        kind: NodeKind,
        /// What is wrong with it.
        message: String,
    },

    /// A pass met a node kind it has no handling for in this position.
    #[error("unsupported {kind} node {context}")]
    UnsupportedNode {
        /// Kind of the node that was encountered.
        kind: NodeKind,
        /// Where it was encountered.
        context: String,
    },
}

impl TreeError {
    /// Shorthand for a [`TreeError::MalformedNode`].
    pub fn malformed(kind: NodeKind, message: impl Into<String>) -> Self {
        TreeError::MalformedNode {
            kind,
            message: message.into(),
        }
    }

    /// Check if this is an unresolved name error.
    pub fn is_unresolved_name(&self) -> bool {
        matches!(self, TreeError::UnresolvedName { .. })
    }

    /// Check if this is an unsupported construct error.
    pub fn is_unsupported_construct(&self) -> bool {
        matches!(self, TreeError::UnsupportedConstruct { .. })
    }

    /// Check if this is a malformed node error.
    pub fn is_malformed(&self) -> bool {
        matches!(self, TreeError::MalformedNode { .. })
    }
}

impl From<NameResolutionError> for TreeError {
    fn from(err: NameResolutionError) -> Self {
        TreeError::UnresolvedName { name: err.name }
    }
}
