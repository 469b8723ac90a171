use crate::types::AstType;

use super::AstNode;
use super::expression::MemberAccess;

/// `var name:type = value` or `const name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub constant: bool,
    pub name: String,
    pub declared: Option<AstType>,
    /// The declared type if given, otherwise the initializer's type
    pub ty: AstType,
    pub value: Box<AstNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: AssignTarget,
    pub value: Box<AstNode>,
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable(String),
    /// `*name`
    Dereference(String),
    Member(MemberAccess),
}

/// `return` with an optional value; no value returns `void`.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Box<AstNode>>,
}

/// The parse-failure sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Invalid {
    /// The complete text that was submitted
    pub text: String,
    /// The part of `text` that could not be parsed
    pub fragment: String,
    pub reason: String,
}
