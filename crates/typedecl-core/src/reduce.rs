//! Bottom-up evaluation.
//!
//! A [`Reduce`] computes one value per node. Each `walk_*` function evaluates
//! every child first, then calls the hook for the node's kind with the node
//! itself and the values of its children. The order is the same post-order
//! as [`Fold`](crate::Fold) and [`Visit`](crate::Visit), but the result can
//! be any type instead of a rebuilt node. The [`Printer`](crate::Printer) is
//! a reduction to `String`.
//!
//! Every hook is required, since there is no sensible default value for an
//! arbitrary output type.

use crate::{
    Class, ClassReference, Constant, ContainerType, Function, GenericType, IntersectionType,
    Module, NamedType, Node, Parameter, Signature, TemplateItem, TreeError, TypeExpr, UnionType,
};

/// Post-order evaluation with one hook per node kind.
pub trait Reduce {
    type Output;

    // === Declarations ===

    fn reduce_module(
        &mut self,
        module: &Module,
        constants: Vec<Self::Output>,
        functions: Vec<Self::Output>,
        classes: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_constant(
        &mut self,
        constant: &Constant,
        ty: Self::Output,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_function(
        &mut self,
        function: &Function,
        signatures: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_signature(
        &mut self,
        signature: &Signature,
        params: Vec<Self::Output>,
        return_type: Self::Output,
        exceptions: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_parameter(
        &mut self,
        parameter: &Parameter,
        ty: Self::Output,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_class(
        &mut self,
        class: &Class,
        template: Vec<Self::Output>,
        parents: Vec<Self::Output>,
        constants: Vec<Self::Output>,
        methods: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_template_item(
        &mut self,
        item: &TemplateItem,
        bound: Self::Output,
    ) -> Result<Self::Output, TreeError>;

    // === Type expressions ===

    fn reduce_named_type(&mut self, node: &NamedType) -> Result<Self::Output, TreeError>;

    fn reduce_class_reference(&mut self, node: &ClassReference)
    -> Result<Self::Output, TreeError>;

    fn reduce_container_type(
        &mut self,
        node: &ContainerType,
        base: Self::Output,
        element: Self::Output,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_generic_type(
        &mut self,
        node: &GenericType,
        base: Self::Output,
        parameters: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_union_type(
        &mut self,
        node: &UnionType,
        types: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;

    fn reduce_intersection_type(
        &mut self,
        node: &IntersectionType,
        types: Vec<Self::Output>,
    ) -> Result<Self::Output, TreeError>;
}

/// Reduce a node of any kind.
pub fn walk_node<R: Reduce + ?Sized>(reducer: &mut R, node: &Node) -> Result<R::Output, TreeError> {
    match node {
        Node::Module(module) => walk_module(reducer, module),
        Node::Constant(constant) => walk_constant(reducer, constant),
        Node::Function(function) => walk_function(reducer, function),
        Node::Signature(signature) => walk_signature(reducer, signature),
        Node::Parameter(parameter) => walk_parameter(reducer, parameter),
        Node::Class(class) => walk_class(reducer, class),
        Node::TemplateItem(item) => walk_template_item(reducer, item),
        Node::Type(ty) => walk_type(reducer, ty),
    }
}

fn walk_types<R: Reduce + ?Sized>(
    reducer: &mut R,
    types: &[TypeExpr],
) -> Result<Vec<R::Output>, TreeError> {
    types.iter().map(|ty| walk_type(reducer, ty)).collect()
}

pub fn walk_module<R: Reduce + ?Sized>(
    reducer: &mut R,
    module: &Module,
) -> Result<R::Output, TreeError> {
    let constants = module
        .constants
        .iter()
        .map(|c| walk_constant(reducer, c))
        .collect::<Result<Vec<_>, _>>()?;
    let functions = module
        .functions
        .iter()
        .map(|f| walk_function(reducer, f))
        .collect::<Result<Vec<_>, _>>()?;
    let classes = module
        .classes
        .iter()
        .map(|class| walk_class(reducer, class))
        .collect::<Result<Vec<_>, _>>()?;
    reducer.reduce_module(module, constants, functions, classes)
}

pub fn walk_constant<R: Reduce + ?Sized>(
    reducer: &mut R,
    constant: &Constant,
) -> Result<R::Output, TreeError> {
    let ty = walk_type(reducer, &constant.ty)?;
    reducer.reduce_constant(constant, ty)
}

pub fn walk_function<R: Reduce + ?Sized>(
    reducer: &mut R,
    function: &Function,
) -> Result<R::Output, TreeError> {
    let signatures = function
        .signatures
        .iter()
        .map(|s| walk_signature(reducer, s))
        .collect::<Result<Vec<_>, _>>()?;
    reducer.reduce_function(function, signatures)
}

pub fn walk_signature<R: Reduce + ?Sized>(
    reducer: &mut R,
    signature: &Signature,
) -> Result<R::Output, TreeError> {
    let params = signature
        .params
        .iter()
        .map(|p| walk_parameter(reducer, p))
        .collect::<Result<Vec<_>, _>>()?;
    let return_type = walk_type(reducer, &signature.return_type)?;
    let exceptions = walk_types(reducer, &signature.exceptions)?;
    reducer.reduce_signature(signature, params, return_type, exceptions)
}

pub fn walk_parameter<R: Reduce + ?Sized>(
    reducer: &mut R,
    parameter: &Parameter,
) -> Result<R::Output, TreeError> {
    let ty = walk_type(reducer, &parameter.ty)?;
    reducer.reduce_parameter(parameter, ty)
}

pub fn walk_class<R: Reduce + ?Sized>(
    reducer: &mut R,
    class: &Class,
) -> Result<R::Output, TreeError> {
    let template = class
        .template
        .iter()
        .map(|item| walk_template_item(reducer, item))
        .collect::<Result<Vec<_>, _>>()?;
    let parents = walk_types(reducer, &class.parents)?;
    let constants = class
        .constants
        .iter()
        .map(|c| walk_constant(reducer, c))
        .collect::<Result<Vec<_>, _>>()?;
    let methods = class
        .methods
        .iter()
        .map(|m| walk_function(reducer, m))
        .collect::<Result<Vec<_>, _>>()?;
    reducer.reduce_class(class, template, parents, constants, methods)
}

pub fn walk_template_item<R: Reduce + ?Sized>(
    reducer: &mut R,
    item: &TemplateItem,
) -> Result<R::Output, TreeError> {
    let bound = walk_type(reducer, &item.bound)?;
    reducer.reduce_template_item(item, bound)
}

pub fn walk_type<R: Reduce + ?Sized>(
    reducer: &mut R,
    ty: &TypeExpr,
) -> Result<R::Output, TreeError> {
    match ty {
        TypeExpr::Named(node) => reducer.reduce_named_type(node),
        TypeExpr::ClassRef(node) => reducer.reduce_class_reference(node),
        TypeExpr::Container(node) => {
            let base = walk_type(reducer, &node.base)?;
            let element = walk_type(reducer, &node.element)?;
            reducer.reduce_container_type(node, base, element)
        }
        TypeExpr::Generic(node) => {
            let base = walk_type(reducer, &node.base)?;
            let parameters = walk_types(reducer, &node.parameters)?;
            reducer.reduce_generic_type(node, base, parameters)
        }
        TypeExpr::Union(node) => {
            let types = walk_types(reducer, &node.types)?;
            reducer.reduce_union_type(node, types)
        }
        TypeExpr::Intersection(node) => {
            let types = walk_types(reducer, &node.types)?;
            reducer.reduce_intersection_type(node, types)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts every node; type leaves count one.
    struct CountNodes;

    impl Reduce for CountNodes {
        type Output = usize;

        fn reduce_module(
            &mut self,
            _module: &Module,
            constants: Vec<usize>,
            functions: Vec<usize>,
            classes: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + constants.iter().chain(&functions).chain(&classes).sum::<usize>())
        }

        fn reduce_constant(&mut self, _constant: &Constant, ty: usize) -> Result<usize, TreeError> {
            Ok(1 + ty)
        }

        fn reduce_function(
            &mut self,
            _function: &Function,
            signatures: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + signatures.iter().sum::<usize>())
        }

        fn reduce_signature(
            &mut self,
            _signature: &Signature,
            params: Vec<usize>,
            return_type: usize,
            exceptions: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + params.iter().sum::<usize>() + return_type + exceptions.iter().sum::<usize>())
        }

        fn reduce_parameter(
            &mut self,
            _parameter: &Parameter,
            ty: usize,
        ) -> Result<usize, TreeError> {
            Ok(1 + ty)
        }

        fn reduce_class(
            &mut self,
            _class: &Class,
            template: Vec<usize>,
            parents: Vec<usize>,
            constants: Vec<usize>,
            methods: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + [template, parents, constants, methods].iter().flatten().sum::<usize>())
        }

        fn reduce_template_item(
            &mut self,
            _item: &TemplateItem,
            bound: usize,
        ) -> Result<usize, TreeError> {
            Ok(1 + bound)
        }

        fn reduce_named_type(&mut self, _node: &NamedType) -> Result<usize, TreeError> {
            Ok(1)
        }

        fn reduce_class_reference(&mut self, _node: &ClassReference) -> Result<usize, TreeError> {
            Ok(1)
        }

        fn reduce_container_type(
            &mut self,
            _node: &ContainerType,
            base: usize,
            element: usize,
        ) -> Result<usize, TreeError> {
            Ok(1 + base + element)
        }

        fn reduce_generic_type(
            &mut self,
            _node: &GenericType,
            base: usize,
            parameters: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + base + parameters.iter().sum::<usize>())
        }

        fn reduce_union_type(
            &mut self,
            _node: &UnionType,
            types: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + types.iter().sum::<usize>())
        }

        fn reduce_intersection_type(
            &mut self,
            _node: &IntersectionType,
            types: Vec<usize>,
        ) -> Result<usize, TreeError> {
            Ok(1 + types.iter().sum::<usize>())
        }
    }

    #[test]
    fn children_values_reach_their_parent() {
        // list<int or str>: container, base, union, two members.
        let ty = TypeExpr::container(
            TypeExpr::named("list"),
            TypeExpr::union(vec![TypeExpr::named("int"), TypeExpr::named("str")]),
        );
        assert_eq!(walk_type(&mut CountNodes, &ty).unwrap(), 5);

        // module, class, constant + type, method + signature + parameter + type + return type.
        let module = Module::new().with_class(
            Class::new("A")
                .with_constant(Constant::new("x", TypeExpr::named("int")))
                .with_method(Function::single(
                    "f",
                    Signature::new(vec![Parameter::untyped("self")]),
                )),
        );
        assert_eq!(walk_node(&mut CountNodes, &Node::Module(module)).unwrap(), 9);
    }
}
