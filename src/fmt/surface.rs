//! Printer for parsed expressions
//!
//! Output is a single line with no optional whitespace, except around the
//! `=` of declarations and assignments.

use std::fmt::{self, Display};

use crate::ast::{
    AssignTarget, Assignment, AstNode, Call, Declaration, Invalid, Lambda, ListLiteral,
    MemberAccess, Return,
};

use super::escape_string;

impl Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Number(number) => write!(f, "{}", number.value),
            AstNode::String(string) => write!(f, "\"{}\"", escape_string(&string.value)),
            AstNode::Reference(reference) => write!(f, "&{}", reference.name),
            AstNode::List(list) => write!(f, "{}", list),
            AstNode::Lambda(lambda) => write!(f, "{}", lambda),
            AstNode::Variable(variable) => f.write_str(&variable.name),
            AstNode::Call(call) => write!(f, "{}", call),
            AstNode::Member(member) => write!(f, "{}", member),
            AstNode::Declaration(declaration) => write!(f, "{}", declaration),
            AstNode::Assignment(assignment) => write!(f, "{}", assignment),
            AstNode::Return(ret) => write!(f, "{}", ret),
            AstNode::Invalid(invalid) => write!(f, "{}", invalid),
        }
    }
}

/// Write `node`, parenthesized unless it can directly precede `(` or `.`.
fn write_operand(node: &AstNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match node {
        AstNode::Variable(_) | AstNode::Call(_) | AstNode::Member(_) | AstNode::Reference(_) => {
            write!(f, "{}", node)
        }
        _ => write!(f, "({})", node),
    }
}

fn write_separated<T: Display>(items: &[T], separator: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        write_separated(&self.elements, ",", f)?;
        f.write_str("}")
    }
}

impl Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.generics.is_empty() {
            write!(f, "[{}]", self.generics.join(","))?;
        }

        f.write_str("(")?;
        write_separated(&self.params, ",", f)?;
        if self.varargs {
            f.write_str("...")?;
        }
        f.write_str(")")?;

        if self.explicit_return {
            write!(f, ":{}", self.return_type)?;
        }
        f.write_str(if self.creates_env { "=>" } else { "~>" })?;

        f.write_str("{")?;
        match self.body.as_slice() {
            [] => {}
            [single] => write!(f, "{}", single)?,
            statements => {
                for statement in statements {
                    write!(f, "{};", statement)?;
                }
            }
        }
        f.write_str("}")
    }
}

impl Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(&self.callee, f)?;
        if !self.generics.is_empty() {
            f.write_str("<")?;
            write_separated(&self.generics, ",", f)?;
            f.write_str(">")?;
        }
        f.write_str("(")?;
        write_separated(&self.args, ",", f)?;
        f.write_str(")")
    }
}

impl Display for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_operand(&self.parent, f)?;
        write!(f, ".{}", self.name)
    }
}

impl Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.constant { "const " } else { "var " })?;
        f.write_str(&self.name)?;
        if let Some(declared) = &self.declared {
            write!(f, ":{}", declared)?;
        }
        write!(f, " = {}", self.value)
    }
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Variable(name) => f.write_str(name),
            AssignTarget::Dereference(name) => write!(f, "*{}", name),
            AssignTarget::Member(member) => write!(f, "{}", member),
        }
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

impl Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {}", value),
            None => f.write_str("return"),
        }
    }
}

impl Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
