//! Class resolution.
//!
//! Resolution runs in two stages over a whole module:
//!
//! 1. **Names to references** ([`NamesToReferences`]): a fold that replaces
//!    every [`NamedType`] with an unlinked [`ClassReference`] of the same
//!    name. The result is still a tree.
//! 2. **Linking** ([`LinkClasses`]): a borrowed walk that looks every
//!    reference up in the module produced by stage 1 and writes its link
//!    cell in place.
//!
//! Because every class object exists before stage 2 starts, linking needs
//! no rebuild, and mutually referencing classes end up pointing at each
//! other.
//!
//! Two kinds of name stay as [`NamedType`]: the universal type, and
//! template parameters inside the class that declares them. Those are not
//! classes; template parameters are substituted later by instantiation.

use rustc_hash::FxHashSet;
use tracing::{debug, trace};
use typedecl_core::{
    ANY_TYPE_NAME, Class, ClassIndex, ClassReference, Fold, Module, NamedType, SymbolTable,
    TreeError, TypeExpr, Visit, fold,
};

/// Stage 1: turn named types into unlinked class references.
#[derive(Debug, Default)]
pub struct NamesToReferences {
    /// Template parameter names of the classes being folded, innermost last.
    template_scopes: Vec<FxHashSet<String>>,
    converted: usize,
}

impl NamesToReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of named types converted so far.
    pub fn converted(&self) -> usize {
        self.converted
    }

    fn is_template_parameter(&self, name: &str) -> bool {
        self.template_scopes.iter().any(|scope| scope.contains(name))
    }
}

impl Fold for NamesToReferences {
    fn fold_class(&mut self, class: Class) -> Result<Class, TreeError> {
        self.template_scopes
            .push(class.template.iter().map(|t| t.name.clone()).collect());
        let result = fold::walk_class(self, class);
        self.template_scopes.pop();
        result
    }

    fn fold_named_type(&mut self, node: NamedType) -> Result<TypeExpr, TreeError> {
        if node.name == ANY_TYPE_NAME || self.is_template_parameter(&node.name) {
            return Ok(node.into());
        }
        self.converted += 1;
        Ok(ClassReference::new(node.name).into())
    }

    /// Existing links point into the tree being replaced; drop them so stage
    /// 2 links against the rebuilt classes.
    fn fold_class_reference(&mut self, node: ClassReference) -> Result<TypeExpr, TreeError> {
        Ok(ClassReference::new(node.name).into())
    }
}

/// Stage 2: write every empty link cell from a symbol table.
///
/// References that are already linked are left as they are.
pub struct LinkClasses<'a, S: SymbolTable + ?Sized> {
    symbols: &'a S,
    linked: usize,
}

impl<'a, S: SymbolTable + ?Sized> LinkClasses<'a, S> {
    pub fn new(symbols: &'a S) -> Self {
        Self { symbols, linked: 0 }
    }

    /// Number of cells written so far.
    pub fn linked(&self) -> usize {
        self.linked
    }
}

impl<S: SymbolTable + ?Sized> Visit for LinkClasses<'_, S> {
    fn visit_class_reference(&mut self, node: &ClassReference) -> Result<(), TreeError> {
        if node.is_linked() {
            return Ok(());
        }
        let class = self.symbols.lookup(&node.name)?;
        node.link(&class)?;
        self.linked += 1;
        trace!(name = %node.name, "linked class reference");
        Ok(())
    }
}

/// Stage 1 over a whole module.
pub fn names_to_references(module: Module) -> Result<Module, TreeError> {
    let mut stage = NamesToReferences::new();
    let module = stage.fold_module(module)?;
    debug!(converted = stage.converted(), "converted names to class references");
    Ok(module)
}

/// Stage 2 over a whole module, using the module itself as symbol table.
///
/// On error some cells may already be written; the module should then be
/// discarded.
pub fn link_classes(module: &Module) -> Result<usize, TreeError> {
    let index = ClassIndex::new(module);
    let mut stage = LinkClasses::new(&index);
    stage.visit_module(module)?;
    Ok(stage.linked())
}

/// Resolve every class name in `module` to a link to its definition.
///
/// Both stages run on a rebuilt copy, which replaces `module` only once
/// every reference has been linked. If any name cannot be resolved the
/// error names it and `module` is left exactly as it was.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn resolve_classes(module: &mut Module) -> Result<(), TreeError> {
    let staged = names_to_references(module.clone())?;
    let linked = link_classes(&staged)?;
    debug!(
        classes = staged.classes.len(),
        linked, "resolved class references"
    );
    *module = staged;
    Ok(())
}
