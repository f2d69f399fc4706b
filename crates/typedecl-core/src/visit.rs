//! Borrowed, in-place traversal.
//!
//! A [`Visit`] walks a tree by shared reference and rebuilds nothing. It is
//! the traversal to use when a pass has to write class reference link cells:
//! those cells are interior-mutable, so a hook can fill them in place and
//! every ancestor, including classes shared through [`Rc`](std::rc::Rc),
//! keeps its identity. Children are visited before the hook of their parent
//! type expression runs, matching [`Fold`](crate::Fold).

use crate::{
    Class, ClassReference, Constant, ContainerType, Function, GenericType, IntersectionType,
    Module, NamedType, Node, Parameter, Signature, TemplateItem, TreeError, TypeExpr, UnionType,
};

/// Read-only traversal with per-kind hooks.
pub trait Visit {
    // === Declarations ===

    fn visit_module(&mut self, module: &Module) -> Result<(), TreeError> {
        walk_module(self, module)
    }

    fn visit_constant(&mut self, constant: &Constant) -> Result<(), TreeError> {
        self.visit_type(&constant.ty)
    }

    fn visit_function(&mut self, function: &Function) -> Result<(), TreeError> {
        walk_function(self, function)
    }

    fn visit_signature(&mut self, signature: &Signature) -> Result<(), TreeError> {
        walk_signature(self, signature)
    }

    fn visit_parameter(&mut self, parameter: &Parameter) -> Result<(), TreeError> {
        self.visit_type(&parameter.ty)
    }

    fn visit_class(&mut self, class: &Class) -> Result<(), TreeError> {
        walk_class(self, class)
    }

    fn visit_template_item(&mut self, item: &TemplateItem) -> Result<(), TreeError> {
        self.visit_type(&item.bound)
    }

    // === Type expressions ===

    fn visit_type(&mut self, ty: &TypeExpr) -> Result<(), TreeError> {
        walk_type(self, ty)
    }

    fn visit_named_type(&mut self, _node: &NamedType) -> Result<(), TreeError> {
        Ok(())
    }

    fn visit_class_reference(&mut self, _node: &ClassReference) -> Result<(), TreeError> {
        Ok(())
    }

    fn visit_container_type(&mut self, _node: &ContainerType) -> Result<(), TreeError> {
        Ok(())
    }

    fn visit_generic_type(&mut self, _node: &GenericType) -> Result<(), TreeError> {
        Ok(())
    }

    fn visit_union_type(&mut self, _node: &UnionType) -> Result<(), TreeError> {
        Ok(())
    }

    fn visit_intersection_type(&mut self, _node: &IntersectionType) -> Result<(), TreeError> {
        Ok(())
    }
}

/// Visit a node of any kind.
pub fn visit_node<V: Visit + ?Sized>(visitor: &mut V, node: &Node) -> Result<(), TreeError> {
    match node {
        Node::Module(module) => visitor.visit_module(module),
        Node::Constant(constant) => visitor.visit_constant(constant),
        Node::Function(function) => visitor.visit_function(function),
        Node::Signature(signature) => visitor.visit_signature(signature),
        Node::Parameter(parameter) => visitor.visit_parameter(parameter),
        Node::Class(class) => visitor.visit_class(class),
        Node::TemplateItem(item) => visitor.visit_template_item(item),
        Node::Type(ty) => visitor.visit_type(ty),
    }
}

pub fn walk_module<V: Visit + ?Sized>(visitor: &mut V, module: &Module) -> Result<(), TreeError> {
    for constant in &module.constants {
        visitor.visit_constant(constant)?;
    }
    for function in &module.functions {
        visitor.visit_function(function)?;
    }
    for class in &module.classes {
        visitor.visit_class(class)?;
    }
    Ok(())
}

pub fn walk_function<V: Visit + ?Sized>(
    visitor: &mut V,
    function: &Function,
) -> Result<(), TreeError> {
    for signature in &function.signatures {
        visitor.visit_signature(signature)?;
    }
    Ok(())
}

pub fn walk_signature<V: Visit + ?Sized>(
    visitor: &mut V,
    signature: &Signature,
) -> Result<(), TreeError> {
    for parameter in &signature.params {
        visitor.visit_parameter(parameter)?;
    }
    visitor.visit_type(&signature.return_type)?;
    for exception in &signature.exceptions {
        visitor.visit_type(exception)?;
    }
    Ok(())
}

pub fn walk_class<V: Visit + ?Sized>(visitor: &mut V, class: &Class) -> Result<(), TreeError> {
    for item in &class.template {
        visitor.visit_template_item(item)?;
    }
    for parent in &class.parents {
        visitor.visit_type(parent)?;
    }
    for constant in &class.constants {
        visitor.visit_constant(constant)?;
    }
    for method in &class.methods {
        visitor.visit_function(method)?;
    }
    Ok(())
}

pub fn walk_type<V: Visit + ?Sized>(visitor: &mut V, ty: &TypeExpr) -> Result<(), TreeError> {
    match ty {
        TypeExpr::Named(node) => visitor.visit_named_type(node),
        TypeExpr::ClassRef(node) => visitor.visit_class_reference(node),
        TypeExpr::Container(node) => {
            visitor.visit_type(&node.base)?;
            visitor.visit_type(&node.element)?;
            visitor.visit_container_type(node)
        }
        TypeExpr::Generic(node) => {
            visitor.visit_type(&node.base)?;
            for parameter in &node.parameters {
                visitor.visit_type(parameter)?;
            }
            visitor.visit_generic_type(node)
        }
        TypeExpr::Union(node) => {
            for member in &node.types {
                visitor.visit_type(member)?;
            }
            visitor.visit_union_type(node)
        }
        TypeExpr::Intersection(node) => {
            for member in &node.types {
                visitor.visit_type(member)?;
            }
            visitor.visit_intersection_type(node)
        }
    }
}
