//! Statement parsers: return, declarations and assignments

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::ast::{AssignTarget, Assignment, AstNode, Declaration, Return};
use crate::scanner::find_top_level_assignment;
use crate::types::determine_type;

use crate::parser::combinators::{BoxedParser, pattern};
use crate::parser::state::{ParseError, ParseResult, ParseState, Parser};

use super::call::member;
use super::types::parse_type;
use super::{expression, is_identifier, strip_parens};

static RETURN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^return(?:\s+(.+))?$").expect("return pattern is valid")
});

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(var|const)\s+(.*)$").expect("declaration pattern is valid")
});

/// return := 'return' [expression]
pub fn return_statement() -> BoxedParser<AstNode> {
    let keyword = pattern(&RETURN);
    BoxedParser::new(move |text: &str, state: &mut ParseState| {
        let captures = keyword.parse(text, state)?;
        let value = match captures.first().cloned().flatten() {
            Some(value) => Some(Box::new(expression().parse(&value, state)?)),
            None => None,
        };
        Ok(AstNode::Return(Return { value }))
    })
    .label("return")
}

/// declaration := ('var' | 'const') ident [':' type] '=' expression
///
/// With an explicit type the name is bound before the initializer is
/// parsed, so the initializer may refer to it.
pub fn declaration() -> BoxedParser<AstNode> {
    let head = pattern(&DECLARATION);
    BoxedParser::new(move |text: &str, state: &mut ParseState| {
        let captures = head.parse(text, state)?;
        let constant = captures.first().cloned().flatten().as_deref() == Some("const");
        let rest = captures.get(1).cloned().flatten().unwrap_or_default();

        let name_end = rest
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        if !is_identifier(name) {
            return Err(ParseError::invalid(text, format!("invalid variable name `{}`", name)));
        }

        let after = rest[name_end..].trim_start();
        let Some(equals) = find_top_level_assignment(after) else {
            return Err(ParseError::invalid(text, "missing initializer"));
        };

        let annotation = after[..equals].trim();
        let declared = if annotation.is_empty() {
            None
        } else {
            let Some(ty) = annotation.strip_prefix(':') else {
                return Err(ParseError::invalid(annotation, "expected `:` before the type"));
            };
            Some(parse_type(ty)?)
        };

        state.atomically(|state| {
            if let Some(declared) = &declared {
                state.env_mut().insert(name, declared.clone());
            }

            let value = expression().parse(&after[equals + 1..], state)?;
            let inferred = determine_type(&value, state.env())?;

            let ty = match declared.clone() {
                Some(declared) if declared != inferred => {
                    return Err(ParseError::invalid(
                        text,
                        format!("`{}` is declared as {} but assigned {}", name, declared, inferred),
                    ));
                }
                Some(declared) => declared,
                None => inferred,
            };

            debug!("bound {} : {}", name, ty);
            state.env_mut().insert(name, ty.clone());

            Ok(AstNode::Declaration(Declaration {
                constant,
                name: name.to_string(),
                declared,
                ty,
                value: Box::new(value),
            }))
        })
    })
    .label("declaration")
}

fn assign_target(text: &str, state: &mut ParseState) -> ParseResult<AssignTarget> {
    let text = strip_parens(text);

    if let Some(name) = text.strip_prefix('*') {
        let name = name.trim();
        if is_identifier(name) {
            return Ok(AssignTarget::Dereference(name.to_string()));
        }
    }
    if is_identifier(text) {
        return Ok(AssignTarget::Variable(text.to_string()));
    }

    match member(text, state) {
        Ok(access) => Ok(AssignTarget::Member(access)),
        Err(ParseError::NoMatch) => Err(ParseError::invalid(text, "cannot assign to this")),
        Err(err) => Err(err),
    }
}

/// assignment := target '=' expression
/// target     := ident | '*' ident | member
pub fn assignment() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        let Some(equals) = find_top_level_assignment(text) else {
            return Err(ParseError::NoMatch);
        };

        let target = assign_target(&text[..equals], state)?;
        let value = expression().parse(&text[equals + 1..], state)?;
        let node = AstNode::Assignment(Assignment {
            target,
            value: Box::new(value),
        });

        // the target has to be typeable
        determine_type(&node, state.env())?;
        Ok(node)
    })
    .label("assignment")
}
