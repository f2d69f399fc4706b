//! Instantiated class cache.
//!
//! Owned by a single instantiation run and dropped with it.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use typedecl_core::Class;

/// Canonical name → specialized class, in insertion order.
#[derive(Debug, Default)]
pub struct InstanceCache {
    by_name: FxHashMap<String, usize>,
    classes: Vec<Rc<Class>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a specialized class by canonical name.
    pub fn get(&self, canonical: &str) -> Option<&Rc<Class>> {
        self.by_name.get(canonical).map(|&i| &self.classes[i])
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.by_name.contains_key(canonical)
    }

    /// Cache a specialized class under its own name.
    ///
    /// A class whose name is already cached is not inserted again; the
    /// cached instance is returned instead.
    pub fn insert(&mut self, class: Rc<Class>) -> Rc<Class> {
        if let Some(existing) = self.get(&class.name) {
            return Rc::clone(existing);
        }
        self.by_name.insert(class.name.clone(), self.classes.len());
        self.classes.push(Rc::clone(&class));
        class
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Consume the cache, yielding classes in insertion order.
    pub fn into_classes(self) -> Vec<Rc<Class>> {
        self.classes
    }
}
