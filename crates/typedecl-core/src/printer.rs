//! Canonical text rendering.
//!
//! The printer is a [`Reduce`] to `String`: every node is rendered from the
//! already rendered text of its children.
//!
//! The text form of a type expression is also its identity: template
//! instantiation names specialized classes after the canonical form of their
//! arguments (see [`render_canonical`]). Type rendering therefore never
//! depends on printer configuration; only the indentation of class bodies
//! does.
//!
//! ```text
//! x: int
//!
//! def f(a: int, b, ...) -> str raises ValueError
//!
//! class Box<T>(Base):
//!     size: int
//!     def get(self) -> T
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::reduce::{self, Reduce};
use crate::{
    Class, ClassReference, Constant, ContainerType, Function, GenericType, IntersectionType,
    Module, NamedType, Node, NodeKind, Parameter, Signature, TemplateItem, TreeError, TypeExpr,
    UnionType,
};

/// Default class body indentation, in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Reject names that cannot be rendered at all.
fn check_name(name: &str, kind: NodeKind) -> Result<(), TreeError> {
    if name.contains('`') {
        return Err(TreeError::malformed(
            kind,
            format!("name {name:?} contains a back-tick and cannot be quoted"),
        ));
    }
    if name.is_empty() {
        return Err(TreeError::malformed(kind, "empty name"));
    }
    Ok(())
}

/// Quote `name` with back-ticks unless it is a bare identifier.
///
/// Names containing a back-tick cannot be quoted and are rejected.
pub fn safe_name(name: &str, kind: NodeKind) -> Result<Cow<'_, str>, TreeError> {
    check_name(name, kind)?;
    if is_bare_identifier(name) {
        Ok(Cow::Borrowed(name))
    } else {
        Ok(Cow::Owned(format!("`{name}`")))
    }
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render a type expression in canonical form.
pub fn render_type(ty: &TypeExpr) -> Result<String, TreeError> {
    Printer::default().print_type(ty)
}

/// Render a type expression as it appears inside an instance name.
///
/// Same grammar as [`render_type`], but names are never quoted, so the
/// name of an instance is the same whether its argument is written out
/// (`Box<int>`) or already refers to the instance named `Box<int>`. Names
/// are still checked, so the result never contains a back-tick.
pub fn render_canonical(ty: &TypeExpr) -> Result<String, TreeError> {
    reduce::walk_type(
        &mut TextRenderer {
            indent: "",
            names: NameStyle::Bare,
        },
        ty,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameStyle {
    /// Back-tick quote anything that is not a bare identifier.
    Quoted,
    /// Names as they are.
    Bare,
}

/// Renders nodes as declaration text.
#[derive(Debug, Clone)]
pub struct Printer {
    indent: String,
}

impl Default for Printer {
    fn default() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A printer indenting class bodies by `width` spaces.
    pub fn with_indent(width: usize) -> Self {
        Self {
            indent: " ".repeat(width),
        }
    }

    fn renderer(&self) -> TextRenderer<'_> {
        TextRenderer {
            indent: &self.indent,
            names: NameStyle::Quoted,
        }
    }

    /// Print a node of any kind.
    pub fn print_node(&self, node: &Node) -> Result<String, TreeError> {
        reduce::walk_node(&mut self.renderer(), node)
    }

    /// Constants, functions and classes, each section newline-joined, the
    /// non-empty sections separated by a blank line.
    pub fn print_module(&self, module: &Module) -> Result<String, TreeError> {
        reduce::walk_module(&mut self.renderer(), module)
    }

    pub fn print_constant(&self, constant: &Constant) -> Result<String, TreeError> {
        reduce::walk_constant(&mut self.renderer(), constant)
    }

    /// One `def` line per overload.
    pub fn print_function(&self, function: &Function) -> Result<String, TreeError> {
        reduce::walk_function(&mut self.renderer(), function)
    }

    /// `(params) -> Return raises E1, E2`, without the function name.
    pub fn print_signature(&self, signature: &Signature) -> Result<String, TreeError> {
        reduce::walk_signature(&mut self.renderer(), signature)
    }

    pub fn print_parameter(&self, parameter: &Parameter) -> Result<String, TreeError> {
        reduce::walk_parameter(&mut self.renderer(), parameter)
    }

    pub fn print_class(&self, class: &Class) -> Result<String, TreeError> {
        reduce::walk_class(&mut self.renderer(), class)
    }

    /// `T` for an unbounded parameter, `T<Bound>` otherwise.
    pub fn print_template_item(&self, item: &TemplateItem) -> Result<String, TreeError> {
        reduce::walk_template_item(&mut self.renderer(), item)
    }

    pub fn print_type(&self, ty: &TypeExpr) -> Result<String, TreeError> {
        reduce::walk_type(&mut self.renderer(), ty)
    }
}

struct TextRenderer<'p> {
    indent: &'p str,
    names: NameStyle,
}

impl TextRenderer<'_> {
    fn name<'n>(&self, name: &'n str, kind: NodeKind) -> Result<Cow<'n, str>, TreeError> {
        match self.names {
            NameStyle::Quoted => safe_name(name, kind),
            NameStyle::Bare => check_name(name, kind).map(|()| Cow::Borrowed(name)),
        }
    }
}

impl Reduce for TextRenderer<'_> {
    type Output = String;

    fn reduce_module(
        &mut self,
        _module: &Module,
        constants: Vec<String>,
        functions: Vec<String>,
        classes: Vec<String>,
    ) -> Result<String, TreeError> {
        let sections: Vec<String> = [constants, functions, classes]
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| section.join("\n"))
            .collect();
        Ok(sections.join("\n\n"))
    }

    fn reduce_constant(&mut self, constant: &Constant, ty: String) -> Result<String, TreeError> {
        Ok(format!("{}: {ty}", constant.name))
    }

    fn reduce_function(
        &mut self,
        function: &Function,
        signatures: Vec<String>,
    ) -> Result<String, TreeError> {
        if signatures.is_empty() {
            return Err(TreeError::malformed(
                NodeKind::Function,
                format!("function '{}' has no signatures", function.name),
            ));
        }
        let lines: Vec<String> = signatures
            .iter()
            .map(|sig| format!("def {}{sig}", function.name))
            .collect();
        Ok(lines.join("\n"))
    }

    fn reduce_signature(
        &mut self,
        signature: &Signature,
        mut params: Vec<String>,
        return_type: String,
        exceptions: Vec<String>,
    ) -> Result<String, TreeError> {
        if signature.has_optional {
            params.push("...".to_string());
        }

        let mut out = format!("({})", params.join(", "));
        if !signature.return_type.is_any() {
            out.push_str(" -> ");
            out.push_str(&return_type);
        }
        if !exceptions.is_empty() {
            out.push_str(" raises ");
            out.push_str(&exceptions.join(", "));
        }
        Ok(out)
    }

    fn reduce_parameter(&mut self, parameter: &Parameter, ty: String) -> Result<String, TreeError> {
        if parameter.ty.is_any() {
            return Ok(parameter.name.clone());
        }
        Ok(format!("{}: {ty}", parameter.name))
    }

    fn reduce_class(
        &mut self,
        class: &Class,
        template: Vec<String>,
        parents: Vec<String>,
        constants: Vec<String>,
        methods: Vec<String>,
    ) -> Result<String, TreeError> {
        let mut header = format!("class {}", self.name(&class.name, NodeKind::Class)?);
        if !template.is_empty() {
            header.push('<');
            header.push_str(&template.join(", "));
            header.push('>');
        }
        if !parents.is_empty() {
            header.push('(');
            header.push_str(&parents.join(", "));
            header.push(')');
        }
        header.push(':');

        let mut lines = vec![header];
        lines.extend(constants.iter().map(|c| format!("{}{c}", self.indent)));
        for method in &methods {
            // Each overload is its own line.
            lines.extend(method.lines().map(|line| format!("{}{line}", self.indent)));
        }
        if constants.is_empty() && methods.is_empty() {
            lines.push(format!("{}pass", self.indent));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    fn reduce_template_item(
        &mut self,
        item: &TemplateItem,
        bound: String,
    ) -> Result<String, TreeError> {
        let name = self.name(&item.name, NodeKind::TemplateItem)?;
        if item.bound.is_any() {
            return Ok(name.into_owned());
        }
        Ok(format!("{name}<{bound}>"))
    }

    fn reduce_named_type(&mut self, node: &NamedType) -> Result<String, TreeError> {
        Ok(self.name(&node.name, NodeKind::NamedType)?.into_owned())
    }

    fn reduce_class_reference(&mut self, node: &ClassReference) -> Result<String, TreeError> {
        Ok(self.name(&node.name, NodeKind::ClassReference)?.into_owned())
    }

    fn reduce_container_type(
        &mut self,
        _node: &ContainerType,
        base: String,
        element: String,
    ) -> Result<String, TreeError> {
        Ok(format!("{base}<{element}>"))
    }

    fn reduce_generic_type(
        &mut self,
        _node: &GenericType,
        base: String,
        parameters: Vec<String>,
    ) -> Result<String, TreeError> {
        Ok(format!("{base}<{}>", parameters.join(", ")))
    }

    // TODO: parenthesize a union nested directly inside an intersection
    fn reduce_union_type(
        &mut self,
        _node: &UnionType,
        types: Vec<String>,
    ) -> Result<String, TreeError> {
        Ok(types.join(" or "))
    }

    fn reduce_intersection_type(
        &mut self,
        _node: &IntersectionType,
        types: Vec<String>,
    ) -> Result<String, TreeError> {
        Ok(types.join(" and "))
    }
}

macro_rules! display_via_printer {
    ($($node:ty => $method:ident),* $(,)?) => {
        $(
            impl fmt::Display for $node {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let text = Printer::default().$method(self).map_err(|_| fmt::Error)?;
                    f.write_str(&text)
                }
            }
        )*
    };
}

display_via_printer! {
    Module => print_module,
    Constant => print_constant,
    Function => print_function,
    Signature => print_signature,
    Parameter => print_parameter,
    Class => print_class,
    TemplateItem => print_template_item,
    TypeExpr => print_type,
}
