//! Removal of the receiver parameter from methods.
//!
//! Useful for post-processing and for comparing method signatures against
//! module-level functions. The first parameter of every method signature is
//! assumed to be the receiver; no check is made on its name.

use typedecl_core::{Class, Fold, Function, Signature, TreeError, fold};

/// Drops the leading parameter of every method signature of every class.
///
/// Module-level functions are left alone.
#[derive(Debug, Default)]
pub struct StripSelf;

impl Fold for StripSelf {
    fn fold_class(&mut self, class: Class) -> Result<Class, TreeError> {
        let mut class = fold::walk_class(self, class)?;
        class.methods = class.methods.into_iter().map(strip_function).collect();
        Ok(class)
    }
}

/// Strip every signature of a method.
pub fn strip_function(function: Function) -> Function {
    Function {
        name: function.name,
        signatures: function.signatures.into_iter().map(strip_signature).collect(),
    }
}

/// Remove the first parameter of a signature. An empty list stays empty.
pub fn strip_signature(mut signature: Signature) -> Signature {
    if !signature.params.is_empty() {
        signature.params.remove(0);
    }
    signature
}

#[cfg(test)]
mod tests {
    use super::*;
    use typedecl_core::{Module, Parameter, TypeExpr};

    fn method() -> Function {
        Function::new(
            "get",
            vec![
                Signature::new(vec![Parameter::untyped("self")]).returning(TypeExpr::named("int")),
                Signature::new(vec![
                    Parameter::untyped("self"),
                    Parameter::new("key", TypeExpr::named("str")),
                ])
                .returning(TypeExpr::named("int"))
                .raising(TypeExpr::named("KeyError")),
            ],
        )
    }

    #[test]
    fn strips_every_overload_of_every_method() {
        let class = Class::new("Map").with_method(method()).with_method(Function::single(
            "clear",
            Signature::new(vec![Parameter::untyped("self")]),
        ));
        let stripped = StripSelf.fold_class(class.clone()).unwrap();

        for (before, after) in class.methods.iter().zip(&stripped.methods) {
            assert_eq!(before.name, after.name);
            for (old, new) in before.signatures.iter().zip(&after.signatures) {
                assert_eq!(new.params.len(), old.params.len() - 1);
                assert_eq!(new.params, old.params[1..]);
                assert_eq!(new.return_type, old.return_type);
                assert_eq!(new.exceptions, old.exceptions);
                assert_eq!(new.has_optional, old.has_optional);
            }
        }
    }

    #[test]
    fn module_functions_are_untouched() {
        let module = Module::new()
            .with_function(method())
            .with_class(Class::new("Map").with_method(method()));
        let stripped = StripSelf.fold_module(module).unwrap();

        assert_eq!(stripped.functions[0], method());
        assert_eq!(stripped.classes[0].methods[0].signatures[0].params.len(), 0);
        assert_eq!(stripped.classes[0].methods[0].signatures[1].params.len(), 1);
    }

    #[test]
    fn empty_parameter_list_stays_empty() {
        let sig = strip_signature(Signature::new(vec![]));
        assert!(sig.params.is_empty());
    }
}
