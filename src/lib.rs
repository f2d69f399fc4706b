//! Typed interface declarations.
//!
//! An in-memory tree of modules, constants, functions with overloaded
//! signatures, and classes with optional templates, plus the passes that
//! transform it:
//!
//! - [`resolve_classes`] links every class name to its definition. Classes
//!   may refer to each other in cycles.
//! - [`instantiate_templates`] replaces generic class usages with concrete,
//!   memoized specializations and drops the generic classes.
//! - [`Printer`] renders any node as declaration text.
//! - [`StripSelf`] removes the receiver parameter from methods.
//!
//! # Example
//!
//! ```
//! use typedecl::{
//!     Class, Constant, Function, Module, Signature, TemplateItem, TypeExpr,
//!     instantiate_templates, resolve_classes,
//! };
//!
//! let mut module = Module::new()
//!     .with_class(Class::new("int"))
//!     .with_class(
//!         Class::new("Box")
//!             .with_template(TemplateItem::unbounded("T"))
//!             .with_constant(Constant::new("item", TypeExpr::named("T"))),
//!     )
//!     .with_function(Function::single(
//!         "make",
//!         Signature::new(vec![]).returning(TypeExpr::container(
//!             TypeExpr::named("Box"),
//!             TypeExpr::named("int"),
//!         )),
//!     ));
//!
//! resolve_classes(&mut module)?;
//! instantiate_templates(&mut module)?;
//!
//! assert_eq!(
//!     module.to_string(),
//!     "def make() -> `Box<int>`\n\nclass int:\n    pass\n\nclass `Box<int>`:\n    item: int\n"
//! );
//! # Ok::<(), typedecl::TreeError>(())
//! ```
//!
//! Passes that rebuild the tree commit to the module only when they
//! succeed. A failed pass returns the error and leaves the module as it was.

pub use typedecl_core::*;
pub use typedecl_passes::*;
