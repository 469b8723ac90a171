//! # Abstract Syntax Tree
//!
//! The parser produces a closed set of node kinds. Every node owns its
//! children; nothing is shared and nothing is cyclic.
//!
//! Parse failure is a value: [`AstNode::Invalid`] carries the rejected text
//! so that a preprocessor can rewrite it and submit it again.

pub mod expression;
pub mod statement;

pub use expression::*;
pub use statement::*;

#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Number(NumberLiteral),
    String(StringLiteral),
    Reference(ReferenceLiteral),
    List(ListLiteral),
    Lambda(Lambda),
    Variable(Variable),
    Call(Call),
    Member(MemberAccess),
    Declaration(Declaration),
    Assignment(Assignment),
    Return(Return),
    Invalid(Invalid),
}

impl AstNode {
    /// Short name of the node kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AstNode::Number(_) => "number",
            AstNode::String(_) => "string",
            AstNode::Reference(_) => "reference",
            AstNode::List(_) => "list",
            AstNode::Lambda(_) => "lambda",
            AstNode::Variable(_) => "variable",
            AstNode::Call(_) => "call",
            AstNode::Member(_) => "member access",
            AstNode::Declaration(_) => "declaration",
            AstNode::Assignment(_) => "assignment",
            AstNode::Return(_) => "return",
            AstNode::Invalid(_) => "invalid",
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AstNode::Invalid(_))
    }
}
