//! Template parameter substitution.

use typedecl_core::{Class, Fold, NodeKind, TemplateItem, TreeError, TypeExpr};

use crate::replace::{ReplaceTypes, TypeMapping};

/// Template parameter name → argument type.
pub type SubstitutionMap = TypeMapping;

/// Bind each template parameter of `class_name` to its argument.
///
/// # Errors
/// Returns [`TreeError::MalformedNode`] if the number of arguments differs
/// from the number of template parameters.
pub fn build_substitution_map(
    class_name: &str,
    template: &[TemplateItem],
    args: &[TypeExpr],
) -> Result<SubstitutionMap, TreeError> {
    if template.len() != args.len() {
        return Err(TreeError::malformed(
            NodeKind::Class,
            format!(
                "'{class_name}' declares {} template parameter(s), got {} argument(s)",
                template.len(),
                args.len()
            ),
        ));
    }

    Ok(template
        .iter()
        .zip(args)
        .map(|(item, arg)| (item.name.clone(), arg.clone()))
        .collect())
}

/// Deep-copy `template` as a concrete class called `name`, with every
/// template parameter replaced by its argument.
pub fn substitute_class(
    template: &Class,
    name: impl Into<String>,
    map: &SubstitutionMap,
) -> Result<Class, TreeError> {
    let mut class = template.clone();
    class.name = name.into();
    class.template.clear();
    ReplaceTypes::new(map).fold_class(class)
}
