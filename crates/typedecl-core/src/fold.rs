//! Owned, rebuilding traversal.
//!
//! A [`Fold`] consumes a tree and returns a rebuilt one. Each `fold_*`
//! method corresponds to a node kind. The default implementations call the
//! matching `walk_*` function, which folds every child first and then
//! reassembles a node of the same kind, so traversal is post-order.
//!
//! For type expressions the per-variant hooks (`fold_named_type`,
//! `fold_container_type`, ...) receive the variant *after* its children have
//! been folded and return any [`TypeExpr`], which lets a pass replace a node
//! with a different kind of node.
//!
//! # Example: renaming a type
//!
//! ```
//! use typedecl_core::{Fold, NamedType, TreeError, TypeExpr};
//!
//! struct Rename;
//!
//! impl Fold for Rename {
//!     fn fold_named_type(&mut self, node: NamedType) -> Result<TypeExpr, TreeError> {
//!         if node.name == "str" {
//!             return Ok(TypeExpr::named("unicode"));
//!         }
//!         Ok(node.into())
//!     }
//! }
//!
//! let ty = TypeExpr::container(TypeExpr::named("list"), TypeExpr::named("str"));
//! let renamed = Rename.fold_type(ty).unwrap();
//! assert_eq!(
//!     renamed,
//!     TypeExpr::container(TypeExpr::named("list"), TypeExpr::named("unicode"))
//! );
//! ```
//!
//! Folding a module rebuilds every class, so each class gets a new identity.
//! Passes that need class identity to survive must re-link references
//! afterwards, or use [`Visit`](crate::Visit) instead.

use std::rc::Rc;

use crate::{
    Class, ClassReference, Constant, ContainerType, Function, GenericType, IntersectionType,
    Module, NamedType, Node, Parameter, Signature, TemplateItem, TreeError, TypeExpr, UnionType,
};

/// Rebuilding traversal with per-kind hooks.
pub trait Fold {
    // === Declarations ===

    fn fold_module(&mut self, module: Module) -> Result<Module, TreeError> {
        walk_module(self, module)
    }

    fn fold_constant(&mut self, constant: Constant) -> Result<Constant, TreeError> {
        walk_constant(self, constant)
    }

    fn fold_function(&mut self, function: Function) -> Result<Function, TreeError> {
        walk_function(self, function)
    }

    fn fold_signature(&mut self, signature: Signature) -> Result<Signature, TreeError> {
        walk_signature(self, signature)
    }

    fn fold_parameter(&mut self, parameter: Parameter) -> Result<Parameter, TreeError> {
        walk_parameter(self, parameter)
    }

    fn fold_class(&mut self, class: Class) -> Result<Class, TreeError> {
        walk_class(self, class)
    }

    fn fold_template_item(&mut self, item: TemplateItem) -> Result<TemplateItem, TreeError> {
        walk_template_item(self, item)
    }

    // === Type expressions ===

    /// Fold any type expression. Dispatches on the variant.
    fn fold_type(&mut self, ty: TypeExpr) -> Result<TypeExpr, TreeError> {
        walk_type(self, ty)
    }

    fn fold_named_type(&mut self, node: NamedType) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::Named(node))
    }

    fn fold_class_reference(&mut self, node: ClassReference) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::ClassRef(node))
    }

    fn fold_container_type(&mut self, node: ContainerType) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::Container(node))
    }

    fn fold_generic_type(&mut self, node: GenericType) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::Generic(node))
    }

    fn fold_union_type(&mut self, node: UnionType) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::Union(node))
    }

    fn fold_intersection_type(&mut self, node: IntersectionType) -> Result<TypeExpr, TreeError> {
        Ok(TypeExpr::Intersection(node))
    }
}

/// Fold a node of any kind.
pub fn fold_node<F: Fold + ?Sized>(folder: &mut F, node: Node) -> Result<Node, TreeError> {
    Ok(match node {
        Node::Module(module) => Node::Module(folder.fold_module(module)?),
        Node::Constant(constant) => Node::Constant(folder.fold_constant(constant)?),
        Node::Function(function) => Node::Function(folder.fold_function(function)?),
        Node::Signature(signature) => Node::Signature(folder.fold_signature(signature)?),
        Node::Parameter(parameter) => Node::Parameter(folder.fold_parameter(parameter)?),
        Node::Class(class) => Node::Class(folder.fold_class(class)?),
        Node::TemplateItem(item) => Node::TemplateItem(folder.fold_template_item(item)?),
        Node::Type(ty) => Node::Type(folder.fold_type(ty)?),
    })
}

fn fold_all<T, F>(items: Vec<T>, fold: F) -> Result<Vec<T>, TreeError>
where
    F: FnMut(T) -> Result<T, TreeError>,
{
    items.into_iter().map(fold).collect()
}

fn fold_types<F: Fold + ?Sized>(
    folder: &mut F,
    types: Vec<TypeExpr>,
) -> Result<Vec<TypeExpr>, TreeError> {
    fold_all(types, |ty| folder.fold_type(ty))
}

pub fn walk_module<F: Fold + ?Sized>(folder: &mut F, module: Module) -> Result<Module, TreeError> {
    let Module {
        constants,
        functions,
        classes,
    } = module;
    Ok(Module {
        constants: fold_all(constants, |c| folder.fold_constant(c))?,
        functions: fold_all(functions, |f| folder.fold_function(f))?,
        classes: fold_all(classes, |class| {
            folder
                .fold_class(Rc::unwrap_or_clone(class))
                .map(Rc::new)
        })?,
    })
}

pub fn walk_constant<F: Fold + ?Sized>(
    folder: &mut F,
    constant: Constant,
) -> Result<Constant, TreeError> {
    Ok(Constant {
        name: constant.name,
        ty: folder.fold_type(constant.ty)?,
    })
}

pub fn walk_function<F: Fold + ?Sized>(
    folder: &mut F,
    function: Function,
) -> Result<Function, TreeError> {
    Ok(Function {
        name: function.name,
        signatures: fold_all(function.signatures, |s| folder.fold_signature(s))?,
    })
}

pub fn walk_signature<F: Fold + ?Sized>(
    folder: &mut F,
    signature: Signature,
) -> Result<Signature, TreeError> {
    Ok(Signature {
        params: fold_all(signature.params, |p| folder.fold_parameter(p))?,
        has_optional: signature.has_optional,
        return_type: folder.fold_type(signature.return_type)?,
        exceptions: fold_types(folder, signature.exceptions)?,
    })
}

pub fn walk_parameter<F: Fold + ?Sized>(
    folder: &mut F,
    parameter: Parameter,
) -> Result<Parameter, TreeError> {
    Ok(Parameter {
        name: parameter.name,
        ty: folder.fold_type(parameter.ty)?,
    })
}

pub fn walk_class<F: Fold + ?Sized>(folder: &mut F, class: Class) -> Result<Class, TreeError> {
    Ok(Class {
        name: class.name,
        template: fold_all(class.template, |t| folder.fold_template_item(t))?,
        parents: fold_types(folder, class.parents)?,
        constants: fold_all(class.constants, |c| folder.fold_constant(c))?,
        methods: fold_all(class.methods, |m| folder.fold_function(m))?,
    })
}

pub fn walk_template_item<F: Fold + ?Sized>(
    folder: &mut F,
    item: TemplateItem,
) -> Result<TemplateItem, TreeError> {
    Ok(TemplateItem {
        name: item.name,
        bound: folder.fold_type(item.bound)?,
    })
}

pub fn walk_type<F: Fold + ?Sized>(folder: &mut F, ty: TypeExpr) -> Result<TypeExpr, TreeError> {
    match ty {
        TypeExpr::Named(node) => folder.fold_named_type(node),
        TypeExpr::ClassRef(node) => folder.fold_class_reference(node),
        TypeExpr::Container(node) => {
            let base = folder.fold_type(*node.base)?;
            let element = folder.fold_type(*node.element)?;
            folder.fold_container_type(ContainerType {
                base: Box::new(base),
                element: Box::new(element),
            })
        }
        TypeExpr::Generic(node) => {
            let base = folder.fold_type(*node.base)?;
            let parameters = fold_types(folder, node.parameters)?;
            folder.fold_generic_type(GenericType {
                base: Box::new(base),
                parameters,
            })
        }
        TypeExpr::Union(node) => {
            let types = fold_types(folder, node.types)?;
            folder.fold_union_type(UnionType { types })
        }
        TypeExpr::Intersection(node) => {
            let types = fold_types(folder, node.types)?;
            folder.fold_intersection_type(IntersectionType { types })
        }
    }
}
