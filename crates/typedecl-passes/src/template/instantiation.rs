//! Template instantiation.
//!
//! Every container usage `Base<Arg>` becomes a reference to a concrete class
//! literally named `Base<Arg>`, built by substituting `Arg` for the single
//! template parameter of `Base`. Usages are specialized post-order: in
//! `Box<list<int>>` the argument is first rewritten to a reference to
//! `list<int>`, then `Box<list<int>>` is named and built from that.
//!
//! Instance names use [`render_canonical`], which leaves names unquoted. A
//! rewritten argument therefore names the same instance as the usage it
//! replaced, and two usages share one class object exactly when their
//! canonical names are equal, however deeply they are nested.

use std::rc::Rc;

use tracing::{debug, trace};
use typedecl_core::{
    Class, ClassIndex, ClassReference, Fold, GenericType, Module, SymbolTable, TreeError, TypeExpr,
    fold, render_canonical, render_type,
};

use super::cache::InstanceCache;
use super::substitution::{build_substitution_map, substitute_class};
use crate::resolve::link_classes;

/// Format the canonical name of a specialized class: `base<element>`.
pub fn format_instance_name(base: &str, element: &str) -> String {
    format!("{base}<{element}>")
}

/// A specialization that has started but not finished.
#[derive(Debug)]
struct InProgress {
    template: String,
    canonical: String,
}

/// Fold that specializes container usages and finalizes the module.
///
/// The instantiator owns its cache; it is meant for one run over one
/// module and is consumed by [`Fold::fold_module`]'s finalization, which
/// drops every generic class and appends the specialized ones.
///
/// Class references are rebuilt unlinked (except the ones it creates
/// itself), because folding gives every class a new identity. Run
/// [`link_classes`] on the result, or use [`instantiate_templates`], which
/// does.
pub struct TemplateInstantiator<'a, S: SymbolTable + ?Sized> {
    symbols: &'a S,
    cache: InstanceCache,
    /// Outermost first.
    in_progress: Vec<InProgress>,
}

impl<'a, S: SymbolTable + ?Sized> TemplateInstantiator<'a, S> {
    /// Create an instantiator looking up template classes in `symbols`.
    pub fn new(symbols: &'a S) -> Self {
        Self {
            symbols,
            cache: InstanceCache::new(),
            in_progress: Vec::new(),
        }
    }

    /// Number of classes specialized so far in this run.
    pub fn instantiated_count(&self) -> usize {
        self.cache.len()
    }

    /// Specialize the usage `base<element>`.
    fn specialize(&mut self, base: TypeExpr, element: TypeExpr) -> Result<TypeExpr, TreeError> {
        let base = self.fold_type(base)?;
        let element = self.fold_type(element)?;
        let canonical =
            format_instance_name(&render_canonical(&base)?, &render_canonical(&element)?);

        if let Some(class) = self.cache.get(&canonical) {
            trace!(class = %canonical, "instance cache hit");
            return Ok(ClassReference::linked(canonical, class).into());
        }
        // Specialized by an earlier run; it is kept in the module as a
        // concrete class and linked during finalization.
        if let Ok(existing) = self.symbols.lookup(&canonical) {
            if !existing.is_generic() {
                return Ok(ClassReference::new(canonical).into());
            }
        }

        let base_name = base.name().ok_or_else(|| TreeError::UnsupportedNode {
            kind: base.kind(),
            context: format!("as the base of container type '{canonical}'"),
        })?;
        let template = self.symbols.lookup(base_name)?;

        // A template reached again from its own specialization either needs
        // itself or an ever growing argument; neither terminates.
        if let Some(outer) = self
            .in_progress
            .iter()
            .find(|entry| entry.template == template.name)
        {
            return Err(TreeError::UnsupportedConstruct {
                construct: format!(
                    "'{canonical}' is required while instantiating '{}'",
                    outer.canonical
                ),
            });
        }
        self.in_progress.push(InProgress {
            template: template.name.clone(),
            canonical: canonical.clone(),
        });
        let result = self.instantiate(&template, &canonical, element);
        self.in_progress.pop();

        Ok(ClassReference::linked(canonical, &result?).into())
    }

    fn instantiate(
        &mut self,
        template: &Class,
        canonical: &str,
        element: TypeExpr,
    ) -> Result<Rc<Class>, TreeError> {
        let map = build_substitution_map(
            &template.name,
            &template.template,
            std::slice::from_ref(&element),
        )?;
        let specialized = substitute_class(template, canonical, &map)?;
        // Container usages inside the body are specialized too.
        let specialized = self.fold_class(specialized)?;
        debug!(class = %canonical, template = %template.name, "instantiated template");
        Ok(self.cache.insert(Rc::new(specialized)))
    }
}

impl<S: SymbolTable + ?Sized> Fold for TemplateInstantiator<'_, S> {
    fn fold_module(&mut self, module: Module) -> Result<Module, TreeError> {
        let Module {
            constants,
            functions,
            classes,
        } = module;

        let constants = constants
            .into_iter()
            .map(|c| self.fold_constant(c))
            .collect::<Result<Vec<_>, _>>()?;
        let functions = functions
            .into_iter()
            .map(|f| self.fold_function(f))
            .collect::<Result<Vec<_>, _>>()?;

        let mut kept = Vec::with_capacity(classes.len());
        for class in classes {
            if class.is_generic() {
                trace!(class = %class.name, "dropping generic class");
                continue;
            }
            kept.push(Rc::new(self.fold_class(Rc::unwrap_or_clone(class))?));
        }

        let instantiated = std::mem::take(&mut self.cache).into_classes();
        debug!(
            kept = kept.len(),
            instantiated = instantiated.len(),
            "finalized module classes"
        );
        kept.extend(instantiated);

        Ok(Module {
            constants,
            functions,
            classes: kept,
        })
    }

    fn fold_class_reference(&mut self, node: ClassReference) -> Result<TypeExpr, TreeError> {
        Ok(ClassReference::new(node.name).into())
    }

    fn fold_type(&mut self, ty: TypeExpr) -> Result<TypeExpr, TreeError> {
        match ty {
            TypeExpr::Container(node) => self.specialize(*node.base, *node.element),
            TypeExpr::Generic(node) if node.parameters.len() == 1 => {
                let GenericType {
                    base,
                    mut parameters,
                } = node;
                self.specialize(*base, parameters.remove(0))
            }
            other => fold::walk_type(self, other),
        }
    }

    /// Only reached for generic usages with other than one argument.
    fn fold_generic_type(&mut self, node: GenericType) -> Result<TypeExpr, TreeError> {
        Err(TreeError::UnsupportedConstruct {
            construct: format!(
                "instantiating multi-parameter generic type '{}'",
                render_type(&TypeExpr::Generic(node))?
            ),
        })
    }
}

/// Replace every generic class usage in `module` with a specialized class.
///
/// Afterwards the module holds its concrete classes followed by the
/// specialized ones, no generic class, and every class reference linked to
/// a class of the module. On error `module` is left as it was.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn instantiate_templates(module: &mut Module) -> Result<(), TreeError> {
    let symbols = ClassIndex::new(module);
    let mut instantiator = TemplateInstantiator::new(&symbols);
    let instantiated = instantiator.fold_module(module.clone())?;
    let linked = link_classes(&instantiated)?;
    debug!(
        classes = instantiated.classes.len(),
        linked, "instantiated module"
    );
    *module = instantiated;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve_classes;
    use typedecl_core::{Constant, Function, NodeKind, Parameter, Signature, TemplateItem};

    fn box_template() -> Class {
        Class::new("Box")
            .with_template(TemplateItem::unbounded("T"))
            .with_constant(Constant::new("item", TypeExpr::named("T")))
    }

    fn box_of(element: TypeExpr) -> TypeExpr {
        TypeExpr::container(TypeExpr::named("Box"), element)
    }

    fn int() -> TypeExpr {
        TypeExpr::named("int")
    }

    fn returning(name: &str, ty: TypeExpr) -> Function {
        Function::single(name, Signature::new(vec![]).returning(ty))
    }

    fn return_ref(module: &Module, index: usize) -> ClassReference {
        module.functions[index].signatures[0]
            .return_type
            .as_class_ref()
            .cloned()
            .expect("return type is a class reference")
    }

    #[test]
    fn instance_name_format() {
        assert_eq!(format_instance_name("list", "int"), "list<int>");
    }

    #[test]
    fn instantiates_and_reuses_one_class() {
        let mut module = Module::new()
            .with_class(box_template())
            .with_function(returning("f", box_of(int())))
            .with_function(returning("g", box_of(int())));
        instantiate_templates(&mut module).unwrap();

        assert_eq!(module.classes.len(), 1);
        let boxed = &module.classes[0];
        assert_eq!(boxed.name, "Box<int>");
        assert!(!boxed.is_generic());
        assert_eq!(boxed.constant("item").unwrap().ty, int());

        assert!(return_ref(&module, 0).points_to(boxed));
        assert!(return_ref(&module, 1).points_to(boxed));
    }

    #[test]
    fn unused_generic_classes_are_dropped() {
        let mut module = Module::new()
            .with_class(box_template())
            .with_class(Class::new("Plain"));
        instantiate_templates(&mut module).unwrap();
        assert!(!module.has_generic_classes());
        assert_eq!(module.classes.len(), 1);
        assert_eq!(module.classes[0].name, "Plain");
    }

    #[test]
    fn nested_containers_resolve_innermost_first() {
        let mut module = Module::new()
            .with_class(box_template())
            .with_function(returning("f", box_of(box_of(int()))));
        instantiate_templates(&mut module).unwrap();

        let names: Vec<&str> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Box<int>", "Box<Box<int>>"]);

        let inner = module.class("Box<int>").unwrap();
        let outer = module.class("Box<Box<int>>").unwrap();
        assert!(return_ref(&module, 0).points_to(outer));
        let field = outer.constant("item").unwrap().ty.as_class_ref().unwrap();
        assert!(field.points_to(inner));
    }

    #[test]
    fn container_usages_inside_templates_are_specialized() {
        let list = Class::new("List")
            .with_template(TemplateItem::unbounded("E"))
            .with_method(returning("first", TypeExpr::named("E")));
        let holder = Class::new("Holder")
            .with_template(TemplateItem::unbounded("T"))
            .with_constant(Constant::new(
                "items",
                TypeExpr::container(TypeExpr::named("List"), TypeExpr::named("T")),
            ));
        let mut module = Module::new()
            .with_class(list)
            .with_class(holder)
            .with_function(returning(
                "f",
                TypeExpr::container(TypeExpr::named("Holder"), TypeExpr::named("str")),
            ));
        instantiate_templates(&mut module).unwrap();

        let holder = module.class("Holder<str>").unwrap();
        let list = module.class("List<str>").unwrap();
        let items = holder.constant("items").unwrap().ty.as_class_ref().unwrap();
        assert!(items.points_to(list));
        assert_eq!(
            list.method("first").unwrap().signatures[0].return_type,
            TypeExpr::named("str")
        );
    }

    #[test]
    fn resolved_modules_keep_links_valid() {
        let mut module = Module::new()
            .with_class(Class::new("int"))
            .with_class(Class::new("A").with_constant(Constant::new("b", TypeExpr::named("B"))))
            .with_class(
                Class::new("B")
                    .with_constant(Constant::new("a", TypeExpr::named("A")))
                    .with_constant(Constant::new("box", box_of(int()))),
            )
            .with_class(box_template());
        resolve_classes(&mut module).unwrap();
        instantiate_templates(&mut module).unwrap();

        let a = module.class("A").unwrap();
        let b = module.class("B").unwrap();
        let int_class = module.class("int").unwrap();
        let boxed = module.class("Box<int>").unwrap();

        assert!(a.constant("b").unwrap().ty.as_class_ref().unwrap().points_to(b));
        assert!(b.constant("a").unwrap().ty.as_class_ref().unwrap().points_to(a));
        assert!(b.constant("box").unwrap().ty.as_class_ref().unwrap().points_to(boxed));
        let item = boxed.constant("item").unwrap().ty.as_class_ref().unwrap();
        assert!(item.points_to(int_class));
    }

    #[test]
    fn arity_mismatch_is_malformed() {
        let pair = Class::new("Pair")
            .with_template(TemplateItem::unbounded("K"))
            .with_template(TemplateItem::unbounded("V"));
        let mut module = Module::new()
            .with_class(pair)
            .with_function(returning(
                "f",
                TypeExpr::container(TypeExpr::named("Pair"), int()),
            ));
        let err = instantiate_templates(&mut module).unwrap_err();
        assert!(matches!(
            err,
            TreeError::MalformedNode {
                kind: NodeKind::Class,
                ..
            }
        ));

        let mut module = Module::new()
            .with_class(Class::new("Plain"))
            .with_function(returning(
                "f",
                TypeExpr::container(TypeExpr::named("Plain"), int()),
            ));
        assert!(instantiate_templates(&mut module).unwrap_err().is_malformed());
    }

    #[test]
    fn multi_parameter_generic_is_unsupported() {
        let mut module = Module::new().with_class(box_template()).with_function(returning(
            "f",
            TypeExpr::generic(TypeExpr::named("dict"), vec![TypeExpr::named("str"), int()]),
        ));
        let before = module.clone();
        let err = instantiate_templates(&mut module).unwrap_err();
        assert_eq!(
            err,
            TreeError::UnsupportedConstruct {
                construct: "instantiating multi-parameter generic type 'dict<str, int>'"
                    .to_string()
            }
        );
        assert_eq!(module, before);
    }

    #[test]
    fn single_parameter_generic_is_a_container() {
        let mut module = Module::new().with_class(box_template()).with_function(returning(
            "f",
            TypeExpr::generic(TypeExpr::named("Box"), vec![int()]),
        ));
        instantiate_templates(&mut module).unwrap();
        assert!(return_ref(&module, 0).points_to(module.class("Box<int>").unwrap()));
    }

    #[test]
    fn self_recursive_template_is_rejected() {
        let node = Class::new("Node")
            .with_template(TemplateItem::unbounded("T"))
            .with_constant(Constant::new(
                "next",
                TypeExpr::container(TypeExpr::named("Node"), TypeExpr::named("T")),
            ));
        let mut module = Module::new().with_class(node).with_function(returning(
            "f",
            TypeExpr::container(TypeExpr::named("Node"), int()),
        ));
        let err = instantiate_templates(&mut module).unwrap_err();
        assert!(err.is_unsupported_construct());
    }

    #[test]
    fn growing_self_instantiation_is_rejected() {
        let node = Class::new("Node")
            .with_template(TemplateItem::unbounded("T"))
            .with_constant(Constant::new(
                "next",
                TypeExpr::container(TypeExpr::named("Node"), box_of(TypeExpr::named("T"))),
            ));
        let mut module = Module::new()
            .with_class(box_template())
            .with_class(node)
            .with_function(returning(
                "f",
                TypeExpr::container(TypeExpr::named("Node"), int()),
            ));
        let before = module.clone();

        let err = instantiate_templates(&mut module).unwrap_err();
        assert_eq!(
            err,
            TreeError::UnsupportedConstruct {
                construct: "'Node<Box<int>>' is required while instantiating 'Node<int>'"
                    .to_string()
            }
        );
        assert_eq!(module, before);
    }

    #[test]
    fn same_template_may_nest_in_its_own_argument() {
        let mut module = Module::new()
            .with_class(box_template())
            .with_function(returning("f", box_of(box_of(box_of(int())))));
        instantiate_templates(&mut module).unwrap();
        let names: Vec<&str> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Box<int>", "Box<Box<int>>", "Box<Box<Box<int>>>"]);
    }

    #[test]
    fn usage_inside_a_specialized_body_shares_the_direct_instance() {
        let holder = Class::new("Holder")
            .with_template(TemplateItem::unbounded("T"))
            .with_constant(Constant::new("items", box_of(TypeExpr::named("T"))));
        let mut module = Module::new()
            .with_class(box_template())
            .with_class(holder)
            .with_function(returning(
                "f",
                TypeExpr::container(TypeExpr::named("Holder"), box_of(int())),
            ))
            .with_function(returning("g", box_of(box_of(int()))));
        instantiate_templates(&mut module).unwrap();

        let names: Vec<&str> = module.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Box<int>", "Box<Box<int>>", "Holder<Box<int>>"]);

        let nested = module.class("Box<Box<int>>").unwrap();
        let holder = module.class("Holder<Box<int>>").unwrap();
        let items = holder.constant("items").unwrap().ty.as_class_ref().unwrap();
        assert!(items.points_to(nested));
        assert!(return_ref(&module, 1).points_to(nested));
        assert!(module.to_string().contains("class `Box<Box<int>>`:\n    item: `Box<int>`\n"));
    }

    #[test]
    fn quoted_arguments_give_printable_instances() {
        let mut module = Module::new()
            .with_class(Class::new("my thing"))
            .with_class(box_template())
            .with_function(returning("f", box_of(TypeExpr::named("my thing"))));
        resolve_classes(&mut module).unwrap();
        instantiate_templates(&mut module).unwrap();

        assert!(module.class("Box<my thing>").is_some());
        assert_eq!(
            module.to_string(),
            "def f() -> `Box<my thing>`\n\nclass `my thing`:\n    pass\n\nclass `Box<my thing>`:\n    item: `my thing`\n"
        );
    }

    #[test]
    fn container_base_must_name_a_class() {
        let mut module = Module::new().with_function(returning(
            "f",
            TypeExpr::container(TypeExpr::union(vec![int(), TypeExpr::named("str")]), int()),
        ));
        let err = instantiate_templates(&mut module).unwrap_err();
        assert!(matches!(
            err,
            TreeError::UnsupportedNode {
                kind: NodeKind::UnionType,
                ..
            }
        ));
    }

    #[test]
    fn unknown_base_is_unresolved() {
        let mut module = Module::new().with_function(returning("f", box_of(int())));
        let err = instantiate_templates(&mut module).unwrap_err();
        assert_eq!(
            err,
            TreeError::UnresolvedName {
                name: "Box".to_string()
            }
        );
    }

    #[test]
    fn second_run_reuses_earlier_instances() {
        let mut module = Module::new()
            .with_class(box_template())
            .with_function(returning("f", box_of(int())));
        instantiate_templates(&mut module).unwrap();

        module.functions.push(Function::single(
            "g",
            Signature::new(vec![Parameter::new("b", box_of(int()))]),
        ));
        instantiate_templates(&mut module).unwrap();

        assert_eq!(module.classes.len(), 1);
        let boxed = &module.classes[0];
        assert!(return_ref(&module, 0).points_to(boxed));
        let param = module.functions[1].signatures[0].params[0]
            .ty
            .as_class_ref()
            .unwrap();
        assert!(param.points_to(boxed));
    }
}
