//! Type expressions.
//!
//! A type expression is one of a closed set of variants. Only
//! [`ClassReference`] carries state that may change after construction: its
//! link cell, which is written at most once by class resolution.

use std::cell::OnceCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{Class, NodeKind, TreeError};

/// Name of the universal type. Parameters and return types that carry it
/// are printed without an annotation.
pub const ANY_TYPE_NAME: &str = "object";

/// A type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// An unresolved name.
    Named(NamedType),
    /// A name that is, or will be, linked to a class definition.
    ClassRef(ClassReference),
    /// A generic usage with exactly one argument, e.g. `list<int>`.
    Container(ContainerType),
    /// A generic usage with any number of arguments, e.g. `dict<str, int>`.
    Generic(GenericType),
    /// `A or B or ...`
    Union(UnionType),
    /// `A and B and ...`
    Intersection(IntersectionType),
}

impl TypeExpr {
    /// An unresolved named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named(NamedType::new(name))
    }

    /// The universal type.
    pub fn any() -> Self {
        TypeExpr::named(ANY_TYPE_NAME)
    }

    /// A homogeneous container usage `base<element>`.
    pub fn container(base: TypeExpr, element: TypeExpr) -> Self {
        TypeExpr::Container(ContainerType {
            base: Box::new(base),
            element: Box::new(element),
        })
    }

    /// A generic usage `base<p1, p2, ...>`.
    pub fn generic(base: TypeExpr, parameters: Vec<TypeExpr>) -> Self {
        TypeExpr::Generic(GenericType {
            base: Box::new(base),
            parameters,
        })
    }

    /// A union of types.
    pub fn union(types: Vec<TypeExpr>) -> Self {
        TypeExpr::Union(UnionType { types })
    }

    /// An intersection of types.
    pub fn intersection(types: Vec<TypeExpr>) -> Self {
        TypeExpr::Intersection(IntersectionType { types })
    }

    /// The name carried by a named type or class reference.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named(named) => Some(&named.name),
            TypeExpr::ClassRef(reference) => Some(&reference.name),
            _ => None,
        }
    }

    /// Whether this is the universal type, resolved or not.
    pub fn is_any(&self) -> bool {
        self.name() == Some(ANY_TYPE_NAME)
    }

    /// The class reference inside this expression, if it is one.
    pub fn as_class_ref(&self) -> Option<&ClassReference> {
        match self {
            TypeExpr::ClassRef(reference) => Some(reference),
            _ => None,
        }
    }

    /// The node kind of this variant.
    pub fn kind(&self) -> NodeKind {
        match self {
            TypeExpr::Named(_) => NodeKind::NamedType,
            TypeExpr::ClassRef(_) => NodeKind::ClassReference,
            TypeExpr::Container(_) => NodeKind::ContainerType,
            TypeExpr::Generic(_) => NodeKind::GenericType,
            TypeExpr::Union(_) => NodeKind::UnionType,
            TypeExpr::Intersection(_) => NodeKind::IntersectionType,
        }
    }
}

impl Default for TypeExpr {
    fn default() -> Self {
        TypeExpr::any()
    }
}

impl From<NamedType> for TypeExpr {
    fn from(node: NamedType) -> Self {
        TypeExpr::Named(node)
    }
}

impl From<ClassReference> for TypeExpr {
    fn from(node: ClassReference) -> Self {
        TypeExpr::ClassRef(node)
    }
}

/// A type known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    pub name: String,
}

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A reference to a class by name, plus a link to its definition.
///
/// The link is a single-assignment cell: empty when the reference is built,
/// written once by resolution, never changed afterwards. It holds a weak
/// pointer because classes are owned by their module and may refer to each
/// other in cycles.
#[derive(Clone)]
pub struct ClassReference {
    pub name: String,
    link: OnceCell<Weak<Class>>,
}

impl ClassReference {
    /// Create an unlinked reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: OnceCell::new(),
        }
    }

    /// Create a reference already linked to `class`.
    pub fn linked(name: impl Into<String>, class: &Rc<Class>) -> Self {
        let reference = Self::new(name);
        let _ = reference.link.set(Rc::downgrade(class));
        reference
    }

    /// Write the link cell.
    ///
    /// Linking again to the same class is a no-op; linking to a different
    /// class is an error because the cell is write-once.
    pub fn link(&self, class: &Rc<Class>) -> Result<(), TreeError> {
        match self.link.get() {
            None => {
                let _ = self.link.set(Rc::downgrade(class));
                Ok(())
            }
            Some(existing) if std::ptr::eq(existing.as_ptr(), Rc::as_ptr(class)) => Ok(()),
            Some(_) => Err(TreeError::malformed(
                NodeKind::ClassReference,
                format!("reference to '{}' is already linked", self.name),
            )),
        }
    }

    /// Whether the link cell has been written.
    pub fn is_linked(&self) -> bool {
        self.link.get().is_some()
    }

    /// The linked class, if the cell is written and the class is still alive.
    pub fn class(&self) -> Option<Rc<Class>> {
        self.link.get().and_then(Weak::upgrade)
    }

    /// Whether this reference is linked to exactly `class`.
    pub fn points_to(&self, class: &Rc<Class>) -> bool {
        self.link
            .get()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), Rc::as_ptr(class)))
    }
}

impl PartialEq for ClassReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && match (self.link.get(), other.link.get()) {
                (None, None) => true,
                (Some(a), Some(b)) => Weak::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl fmt::Debug for ClassReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassReference")
            .field("name", &self.name)
            .field("linked", &self.is_linked())
            .finish()
    }
}

/// `base<element>`
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerType {
    pub base: Box<TypeExpr>,
    pub element: Box<TypeExpr>,
}

/// `base<p1, p2, ...>`
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    pub base: Box<TypeExpr>,
    pub parameters: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub types: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionType {
    pub types: Vec<TypeExpr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_type_matches_named_and_reference() {
        assert!(TypeExpr::any().is_any());
        assert!(TypeExpr::ClassRef(ClassReference::new(ANY_TYPE_NAME)).is_any());
        assert!(!TypeExpr::named("int").is_any());
        assert!(!TypeExpr::container(TypeExpr::any(), TypeExpr::any()).is_any());
    }

    #[test]
    fn link_is_write_once() {
        let a = Rc::new(Class::new("A"));
        let b = Rc::new(Class::new("B"));

        let reference = ClassReference::new("A");
        assert!(!reference.is_linked());
        assert!(reference.class().is_none());

        reference.link(&a).unwrap();
        assert!(reference.points_to(&a));
        // Same target again is fine.
        reference.link(&a).unwrap();

        let err = reference.link(&b).unwrap_err();
        assert!(err.is_malformed());
        assert!(reference.points_to(&a));
    }

    #[test]
    fn reference_equality_uses_link_identity() {
        let a = Rc::new(Class::new("A"));
        let other_a = Rc::new(Class::new("A"));

        assert_eq!(ClassReference::new("A"), ClassReference::new("A"));
        assert_eq!(ClassReference::linked("A", &a), ClassReference::linked("A", &a));
        assert_ne!(
            ClassReference::linked("A", &a),
            ClassReference::linked("A", &other_a)
        );
        assert_ne!(ClassReference::new("A"), ClassReference::linked("A", &a));
    }
}
