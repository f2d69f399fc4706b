//! Template instantiation system.
//!
//! Specializes generic classes by substitution, memoizing each
//! specialization for the duration of one run.
//!
//! ## Components
//!
//! - [`InstanceCache`]: run-scoped canonical name → class cache
//! - [`SubstitutionMap`]: maps template parameters to argument types
//! - [`TemplateInstantiator`]: the fold that specializes container usages
//! - [`instantiate_templates`]: instantiate a whole module

mod cache;
mod instantiation;
mod substitution;

pub use cache::InstanceCache;
pub use instantiation::{TemplateInstantiator, format_instance_name, instantiate_templates};
pub use substitution::{SubstitutionMap, build_substitution_map, substitute_class};
