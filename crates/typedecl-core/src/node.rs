//! Declaration nodes.
//!
//! A [`Module`] owns its classes through [`Rc`] so that class references
//! elsewhere in the tree can hold stable, identity-comparable links to them.
//! All other nodes are plain owned values.

use std::fmt;
use std::rc::Rc;

use crate::TypeExpr;

/// The kind of a node, used for dispatch diagnostics and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Constant,
    Function,
    Signature,
    Parameter,
    Class,
    TemplateItem,
    NamedType,
    ClassReference,
    ContainerType,
    GenericType,
    UnionType,
    IntersectionType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Module => "module",
            NodeKind::Constant => "constant",
            NodeKind::Function => "function",
            NodeKind::Signature => "signature",
            NodeKind::Parameter => "parameter",
            NodeKind::Class => "class",
            NodeKind::TemplateItem => "template item",
            NodeKind::NamedType => "named type",
            NodeKind::ClassReference => "class reference",
            NodeKind::ContainerType => "container type",
            NodeKind::GenericType => "generic type",
            NodeKind::UnionType => "union type",
            NodeKind::IntersectionType => "intersection type",
        };
        f.write_str(name)
    }
}

/// A node of any kind, for passes that accept whatever they are handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Module(Module),
    Constant(Constant),
    Function(Function),
    Signature(Signature),
    Parameter(Parameter),
    Class(Class),
    TemplateItem(TemplateItem),
    Type(TypeExpr),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Module(_) => NodeKind::Module,
            Node::Constant(_) => NodeKind::Constant,
            Node::Function(_) => NodeKind::Function,
            Node::Signature(_) => NodeKind::Signature,
            Node::Parameter(_) => NodeKind::Parameter,
            Node::Class(_) => NodeKind::Class,
            Node::TemplateItem(_) => NodeKind::TemplateItem,
            Node::Type(ty) => ty.kind(),
        }
    }
}

/// A unit of constants, functions and classes.
///
/// A module is also the symbol table for its own classes, see
/// [`SymbolTable`](crate::SymbolTable).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub constants: Vec<Constant>,
    pub functions: Vec<Function>,
    pub classes: Vec<Rc<Class>>,
}

impl Module {
    /// Create an empty module.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn with_function(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn with_class(mut self, class: Class) -> Self {
        self.classes.push(Rc::new(class));
        self
    }

    /// Find a class by name without going through the symbol table error path.
    pub fn class(&self, name: &str) -> Option<&Rc<Class>> {
        self.classes.iter().find(|class| class.name == name)
    }

    /// Whether any class still declares template parameters.
    pub fn has_generic_classes(&self) -> bool {
        self.classes.iter().any(|class| class.is_generic())
    }
}

/// A module-level or class-level constant, `name: type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub ty: TypeExpr,
}

impl Constant {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A function or method with one or more overloads.
///
/// A function always has at least one signature; the printer rejects a
/// function without any.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub signatures: Vec<Signature>,
}

impl Function {
    pub fn new(name: impl Into<String>, signatures: Vec<Signature>) -> Self {
        Self {
            name: name.into(),
            signatures,
        }
    }

    /// A function with a single overload.
    pub fn single(name: impl Into<String>, signature: Signature) -> Self {
        Self::new(name, vec![signature])
    }
}

/// One overload of a function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Parameter>,
    /// Trailing variadic marker, printed as `...`.
    pub has_optional: bool,
    pub return_type: TypeExpr,
    pub exceptions: Vec<TypeExpr>,
}

impl Signature {
    /// A signature with the given parameters, returning the universal type.
    pub fn new(params: Vec<Parameter>) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn returning(mut self, return_type: TypeExpr) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn raising(mut self, exception: TypeExpr) -> Self {
        self.exceptions.push(exception);
        self
    }

    pub fn variadic(mut self) -> Self {
        self.has_optional = true;
        self
    }
}

/// A named, typed parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeExpr,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// An unannotated parameter, typed with the universal type.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, TypeExpr::any())
    }
}

/// A class definition.
///
/// An empty `template` means the class is concrete; a non-empty one makes it
/// generic. Generic classes never survive template instantiation.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: String,
    pub template: Vec<TemplateItem>,
    pub parents: Vec<TypeExpr>,
    pub constants: Vec<Constant>,
    pub methods: Vec<Function>,
}

impl Class {
    /// Create an empty concrete class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: Vec::new(),
            parents: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_template(mut self, item: TemplateItem) -> Self {
        self.template.push(item);
        self
    }

    pub fn with_parent(mut self, parent: TypeExpr) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn with_constant(mut self, constant: Constant) -> Self {
        self.constants.push(constant);
        self
    }

    pub fn with_method(mut self, method: Function) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether this class declares template parameters.
    pub fn is_generic(&self) -> bool {
        !self.template.is_empty()
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Function> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A template parameter with its upper bound.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItem {
    pub name: String,
    pub bound: TypeExpr,
}

impl TemplateItem {
    pub fn new(name: impl Into<String>, bound: TypeExpr) -> Self {
        Self {
            name: name.into(),
            bound,
        }
    }

    /// A template parameter bounded only by the universal type.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self::new(name, TypeExpr::any())
    }
}
