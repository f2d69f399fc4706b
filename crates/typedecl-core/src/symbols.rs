//! Class lookup by name.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{Class, Module, NameResolutionError};

/// Name to class lookup, closed over a single module.
pub trait SymbolTable {
    /// Look up the class called `name`.
    fn lookup(&self, name: &str) -> Result<Rc<Class>, NameResolutionError>;
}

impl SymbolTable for Module {
    fn lookup(&self, name: &str) -> Result<Rc<Class>, NameResolutionError> {
        self.class(name)
            .cloned()
            .ok_or_else(|| NameResolutionError::new(name))
    }
}

/// Hashed view over a module's classes.
///
/// Lookups go through a map built once, which pays off for passes that
/// resolve every reference in a large module. The first class with a given
/// name wins, matching [`Module::class`].
#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: FxHashMap<String, Rc<Class>>,
}

impl ClassIndex {
    pub fn new(module: &Module) -> Self {
        let mut classes = FxHashMap::default();
        for class in &module.classes {
            classes
                .entry(class.name.clone())
                .or_insert_with(|| Rc::clone(class));
        }
        Self { classes }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SymbolTable for ClassIndex {
    fn lookup(&self, name: &str) -> Result<Rc<Class>, NameResolutionError> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| NameResolutionError::new(name))
    }
}
