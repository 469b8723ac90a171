use crate::types::{AstType, EnvironmentMode, FunctionEntry, Parameter};

use super::AstNode;

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// Unescaped content, without the surrounding quotes
    pub value: String,
}

/// `&name`
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLiteral {
    pub name: String,
}

/// `{a, b, c}`
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub elements: Vec<AstNode>,
}

/// `[G](params):ret=>{body}` or the `[expr]` shorthand.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub generics: Vec<String>,
    pub params: Vec<Parameter>,
    /// Declared return type, or the type inferred from the body
    pub return_type: AstType,
    pub explicit_return: bool,
    /// `=>` creates a runtime environment, `~>` runs in the caller's
    pub creates_env: bool,
    pub pure: bool,
    pub varargs: bool,
    pub body: Vec<AstNode>,
}

impl Lambda {
    /// The function type of this literal.
    pub fn function_entry(&self) -> FunctionEntry {
        let environment = if self.creates_env {
            EnvironmentMode::ForceEnvironment
        } else {
            EnvironmentMode::ForceNoEnvironment
        };

        FunctionEntry {
            return_type: self.return_type.clone(),
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
            environment,
            pure: self.pure,
            varargs: self.varargs,
            generic_names: self.generics.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
}

/// `callee<generics>(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<AstNode>,
    pub args: Vec<AstNode>,
    /// Explicit generic arguments, empty when omitted
    pub generics: Vec<AstType>,
}

/// `parent.name`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub parent: Box<AstNode>,
    pub name: String,
}
