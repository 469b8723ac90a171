//! # Type Error Definitions
//!
//! Errors raised while determining the type of an already-parsed node,
//! solving generic bindings, or resolving syntactic types into runtime
//! types. They are distinct from structural parse failures, which never
//! leave the parser (see [`crate::parser::ParseError`]):
//!
//! - a structural failure means the text might still be rewritten into
//!   something parseable, so it becomes an invalid node;
//! - a type error means a well-formed program cannot be typed, so it
//!   propagates to the caller.
//!
//! Variants that concern a specific node carry it in canonical source form.

use std::fmt;

use super::ast_type::AstType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Reference to a name the environment does not know.
    UnboundVariable { name: String },

    /// The callee has a type entry that is not a function.
    NotCallable { callee: AstType, node: String },

    /// The callee's type has no entries at all.
    EmptyCallee { node: String },

    /// No entry of the parent type declares the member.
    UnknownMember {
        owner: AstType,
        member: String,
        node: String,
    },

    /// Asked for the type of the invalid sentinel.
    InvalidExpression { text: String },

    /// A generic name occurs inside a multi-entry union of the signature.
    AmbiguousGeneric { generic: String, ty: AstType },

    /// A generic name occurs nowhere as a standalone parameter or return type.
    UnassignableGeneric { generic: String },

    /// Explicit generic arguments do not match the declared generic names.
    GenericArity {
        expected: usize,
        found: usize,
        node: String,
    },

    /// A single-entry type was required.
    NotSingleEntry { ty: AstType },

    /// A type name that is not registered.
    UnknownType { name: String },

    /// A registered type used with the wrong number of generic arguments.
    DataTypeArity {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Dereferenced a variable that is not a `reference[T]`.
    NotAReference { ty: AstType, node: String },
}

impl TypeError {
    pub fn unbound_variable(name: impl Into<String>) -> Self {
        TypeError::UnboundVariable { name: name.into() }
    }

    /// The node this error is about, if any.
    pub fn node(&self) -> Option<&str> {
        match self {
            TypeError::NotCallable { node, .. }
            | TypeError::EmptyCallee { node }
            | TypeError::UnknownMember { node, .. }
            | TypeError::GenericArity { node, .. }
            | TypeError::NotAReference { node, .. } => Some(node),
            TypeError::InvalidExpression { text } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeError::UnboundVariable { name } => {
                write!(f, "Type error: unbound variable: {}", name)
            }
            TypeError::NotCallable { callee, node } => {
                write!(
                    f,
                    "Type error: cannot call a non-function of type {}\n  in: {}",
                    callee, node
                )
            }
            TypeError::EmptyCallee { node } => {
                write!(f, "Type error: caller has no type entries\n  in: {}", node)
            }
            TypeError::UnknownMember {
                owner,
                member,
                node,
            } => {
                write!(
                    f,
                    "Type error: type {} has no member '{}'\n  in: {}",
                    owner, member, node
                )
            }
            TypeError::InvalidExpression { text } => {
                write!(f, "Type error: cannot determine the type of invalid expression: {}", text)
            }
            TypeError::AmbiguousGeneric { generic, ty } => {
                write!(
                    f,
                    "Type error: generic '{}' occurs in union {} and cannot be inferred, supply it explicitly",
                    generic, ty
                )
            }
            TypeError::UnassignableGeneric { generic } => {
                write!(
                    f,
                    "Type error: generic '{}' cannot be inferred from the call, supply it explicitly",
                    generic
                )
            }
            TypeError::GenericArity {
                expected,
                found,
                node,
            } => {
                write!(
                    f,
                    "Type error: expected {} generic argument(s), found {}\n  in: {}",
                    expected, found, node
                )
            }
            TypeError::NotSingleEntry { ty } => {
                write!(f, "Type error: expected a single type, found union {}", ty)
            }
            TypeError::UnknownType { name } => {
                write!(f, "Type error: unknown type: {}", name)
            }
            TypeError::DataTypeArity {
                name,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Type error: type {} takes {} generic argument(s), found {}",
                    name, expected, found
                )
            }
            TypeError::NotAReference { ty, node } => {
                write!(
                    f,
                    "Type error: cannot dereference a value of type {}\n  in: {}",
                    ty, node
                )
            }
        }
    }
}

impl std::error::Error for TypeError {}
