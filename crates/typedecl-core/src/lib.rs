//! Typed interface declaration trees.
//!
//! This crate holds everything the passes build on:
//!
//! - [`node`]: declaration nodes ([`Module`], [`Class`], [`Function`], ...)
//! - [`types`]: type expressions, including [`ClassReference`] with its
//!   write-once link cell
//! - [`fold`]: owned post-order rebuild with per-kind hooks
//! - [`visit`]: borrowed walk for in-place link writes
//! - [`reduce`]: post-order evaluation to a value of any type
//! - [`symbols`]: name to class lookup over a module
//! - [`printer`]: canonical text form
//! - [`error`]: the error taxonomy shared by all passes

pub mod error;
pub mod fold;
pub mod node;
pub mod printer;
pub mod reduce;
pub mod symbols;
pub mod types;
pub mod visit;

pub use error::{NameResolutionError, TreeError};
pub use fold::{Fold, fold_node};
pub use node::{
    Class, Constant, Function, Module, Node, NodeKind, Parameter, Signature, TemplateItem,
};
pub use printer::{DEFAULT_INDENT, Printer, render_canonical, render_type, safe_name};
pub use reduce::Reduce;
pub use symbols::{ClassIndex, SymbolTable};
pub use types::{
    ANY_TYPE_NAME, ClassReference, ContainerType, GenericType, IntersectionType, NamedType,
    TypeExpr, UnionType,
};
pub use visit::{Visit, visit_node};
