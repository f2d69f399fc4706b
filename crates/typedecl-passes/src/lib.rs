//! Transformation passes over typedecl modules.
//!
//! ## Passes
//!
//! - [`resolve`]: turn class names into links to class definitions
//! - [`template`]: specialize generic classes by substitution
//! - [`replace`]: replace named types from a mapping
//! - [`strip`]: drop the receiver parameter from methods
//!
//! A typical pipeline resolves a freshly built module, then instantiates
//! its templates:
//!
//! ```
//! use typedecl_core::{Class, Constant, Function, Module, Signature, TemplateItem, TypeExpr};
//! use typedecl_passes::{instantiate_templates, resolve_classes};
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
//! resolve_classes(&mut module).unwrap();
//! instantiate_templates(&mut module).unwrap();
//!
//! assert!(module.class("Box<int>").is_some());
//! assert!(!module.has_generic_classes());
//! ```

pub mod replace;
pub mod resolve;
pub mod strip;
pub mod template;

pub use replace::{ReplaceTypes, TypeMapping};
pub use resolve::{
    LinkClasses, NamesToReferences, link_classes, names_to_references, resolve_classes,
};
pub use strip::{StripSelf, strip_function, strip_signature};
pub use template::{
    InstanceCache, TemplateInstantiator, build_substitution_map, format_instance_name,
    instantiate_templates, substitute_class,
};
