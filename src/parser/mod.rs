//! # Parser
//!
//! Recursive descent over substrings. There is no token stream: each grammar
//! form looks at the whole (trimmed) text it was handed, decides from its
//! shape whether it applies, and recurses into the pieces it splits off.
//!
//! Parsing and typing happen in the same pass. The [`TypeEnvironment`]
//! threaded through [`ParseState`] is updated by declarations and lambda
//! parameters as they are parsed, so later expressions see them.
//!
//! ## Results
//!
//! - `Ok(node)` - a well-typed node
//! - `Ok(AstNode::Invalid(..))` - the text is malformed, or a declared type
//!   contradicts the inferred one. The sentinel carries the full input so a
//!   preprocessor may rewrite and resubmit it.
//! - `Err(TypeError)` - the text is well-formed but cannot be typed

mod combinators;
mod grammar;
mod state;

pub use combinators::{BoxedParser, choice, pattern};
pub use grammar::{CallParts, RESERVED_WORDS, expression, is_identifier, is_reserved, match_call};
pub use state::{ParseError, ParseResult, ParseState, Parser};

use log::debug;

use crate::ast::{AstNode, Invalid};
use crate::scanner::{Wrapper, split_top_level};
use crate::types::{AstType, Parameter, TypeEnvironment, TypeError, default_environment};

/// Parse a single expression against a fresh copy of the default environment.
pub fn parse(text: &str) -> Result<AstNode, TypeError> {
    let mut env = default_environment();
    parse_with_env(text, &mut env)
}

/// Parse a single expression against `env`, keeping the bindings it makes.
pub fn parse_with_env(text: &str, env: &mut TypeEnvironment) -> Result<AstNode, TypeError> {
    let mut state = ParseState::new(std::mem::take(env));
    let result = expression().parse(text, &mut state);
    *env = state.into_env();

    settle(text, result)
}

/// Parse a sequence of `;` terminated statements sharing `env`.
///
/// Unlike a lambda body, a program may omit the final `;`.
pub fn parse_program(text: &str, env: &mut TypeEnvironment) -> Result<Vec<AstNode>, TypeError> {
    let mut state = ParseState::new(std::mem::take(env));
    let text = text.trim();
    let text = text.strip_suffix(';').unwrap_or(text);

    let mut nodes = Vec::new();
    let mut failure = None;
    for statement in split_top_level(text, ';', &Wrapper::ALL) {
        if statement.trim().is_empty() {
            continue;
        }
        match settle(statement, expression().parse(statement, &mut state)) {
            Ok(node) => nodes.push(node),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    *env = state.into_env();
    match failure {
        Some(err) => Err(err),
        None => Ok(nodes),
    }
}

fn settle(text: &str, result: ParseResult<AstNode>) -> Result<AstNode, TypeError> {
    match result {
        Ok(node) => Ok(node),
        Err(ParseError::Type(err)) => Err(err),
        Err(ParseError::Invalid {
            fragment,
            reason,
            form,
        }) => {
            let reason = ParseError::describe(form, &reason);
            debug!("invalid `{}`: {}", fragment, reason);
            Ok(AstNode::Invalid(Invalid {
                text: text.trim().to_string(),
                fragment,
                reason,
            }))
        }
        Err(ParseError::NoMatch) => Ok(AstNode::Invalid(Invalid {
            text: text.trim().to_string(),
            fragment: text.trim().to_string(),
            reason: "unrecognized expression".to_string(),
        })),
    }
}

/// Parse the canonical text form of a type.
pub fn parse_type(text: &str) -> ParseResult<AstType> {
    grammar::parse_type(text)
}

/// Canonical text form of a type; [`parse_type`] reads it back unchanged.
pub fn unparse_type(ty: &AstType) -> String {
    ty.to_string()
}

/// Parse `name[:type]`, untyped parameters are `any`.
pub fn parse_parameter(text: &str) -> ParseResult<Parameter> {
    grammar::parse_parameter(text)
}

pub fn unparse_parameter(param: &Parameter) -> String {
    param.to_string()
}
