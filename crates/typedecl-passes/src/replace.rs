//! Name-based type replacement.

use rustc_hash::FxHashMap;
use typedecl_core::{ClassReference, Fold, NamedType, TreeError, TypeExpr};

/// Maps a type name to the expression that replaces it.
pub type TypeMapping = FxHashMap<String, TypeExpr>;

/// Replaces named types and class references whose name is in a mapping.
///
/// Replacements are inserted as-is and are not folded again, so a mapping
/// like `T -> list<T>` applies once.
#[derive(Debug)]
pub struct ReplaceTypes<'a> {
    mapping: &'a TypeMapping,
}

impl<'a> ReplaceTypes<'a> {
    pub fn new(mapping: &'a TypeMapping) -> Self {
        Self { mapping }
    }
}

impl Fold for ReplaceTypes<'_> {
    fn fold_named_type(&mut self, node: NamedType) -> Result<TypeExpr, TreeError> {
        Ok(self
            .mapping
            .get(&node.name)
            .cloned()
            .unwrap_or(TypeExpr::Named(node)))
    }

    fn fold_class_reference(&mut self, node: ClassReference) -> Result<TypeExpr, TreeError> {
        Ok(self
            .mapping
            .get(&node.name)
            .cloned()
            .unwrap_or(TypeExpr::ClassRef(node)))
    }
}
