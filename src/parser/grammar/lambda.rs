//! Lambda parsers
//!
//! ```text
//! lambda  := ['[' generics ']'] '(' params ')' [':' type] ('=>' | '~>') '{' body '}'
//! params  := [param (',' param)*]
//! param   := ident [':' type] ['...']
//! simple  := '[' expression ']'
//! ```
//!
//! `=>` gives the body its own environment: parameters and declarations in
//! the body are invisible to the enclosing code. With `~>` the body shares
//! the caller's environment and everything it binds stays visible.

use log::debug;

use crate::ast::{AstNode, Lambda};
use crate::scanner::{Wrapper, find_bracket_end, find_last_opening, match_wrapped, split_top_level};
use crate::types::{AstType, Parameter, determine_body_type, determine_type};

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseResult, ParseState, Parser};

use super::types::{parameter_parts, parse_type};
use super::{expression, is_identifier, statements};

/// Textual pieces of a lambda literal.
struct LambdaParts<'a> {
    generics: Option<&'a str>,
    params: &'a str,
    return_type: Option<&'a str>,
    creates_env: bool,
    body: &'a str,
}

fn split_lambda(text: &str) -> Option<LambdaParts<'_>> {
    let mut rest = text;
    let mut generics = None;
    if rest.starts_with('[') {
        let end = find_bracket_end(rest, 0, Wrapper::Bracket)?;
        generics = Some(&rest[1..end]);
        rest = rest[end + 1..].trim_start();
    }

    if !rest.starts_with('(') {
        return None;
    }
    let params_end = find_bracket_end(rest, 0, Wrapper::Paren)?;
    let params = &rest[1..params_end];

    let tail = rest[params_end + 1..].trim();
    if !tail.ends_with('}') {
        return None;
    }
    let body_start = find_last_opening(tail, Wrapper::Brace)?;
    if find_bracket_end(tail, body_start, Wrapper::Brace)? != tail.len() - 1 {
        return None;
    }
    let body = &tail[body_start + 1..tail.len() - 1];

    let head = tail[..body_start].trim_end().strip_suffix('>')?;
    let (signature, creates_env) = match head.strip_suffix('=') {
        Some(signature) => (signature, true),
        None => (head.strip_suffix('~')?, false),
    };

    let signature = signature.trim();
    let return_type = if signature.is_empty() {
        None
    } else {
        Some(signature.strip_prefix(':')?.trim())
    };

    Some(LambdaParts {
        generics,
        params,
        return_type,
        creates_env,
        body,
    })
}

fn generic_names(text: Option<&str>) -> ParseResult<Vec<String>> {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(Vec::new());
    };

    split_top_level(text, ',', &Wrapper::ALL)
        .into_iter()
        .map(str::trim)
        .map(|name| {
            if is_identifier(name) {
                Ok(name.to_string())
            } else {
                Err(ParseError::invalid(name, "invalid generic name"))
            }
        })
        .collect()
}

/// Parse a parameter list, reporting whether the last one is variadic.
///
/// An untyped parameter is `any`, an untyped variadic one is `list[any]`.
/// A typed variadic parameter must have a list type.
fn parameters(text: &str) -> ParseResult<(Vec<Parameter>, bool)> {
    if text.trim().is_empty() {
        return Ok((Vec::new(), false));
    }

    let items = split_top_level(text, ',', &Wrapper::ALL);
    let last = items.len() - 1;
    let mut params = Vec::with_capacity(items.len());
    let mut varargs = false;

    for (index, item) in items.into_iter().enumerate() {
        let item = item.trim();
        let (item, variadic) = match item.strip_suffix("...") {
            Some(stem) => (stem.trim_end(), true),
            None => (item, false),
        };
        if variadic && index != last {
            return Err(ParseError::invalid(item, "only the last parameter may be variadic"));
        }

        let (name, declared) = parameter_parts(item)?;
        let ty = match (declared, variadic) {
            (Some(ty), true) if !ty.is_list_type() => {
                return Err(ParseError::invalid(item, "a variadic parameter needs a list type"));
            }
            (Some(ty), _) => ty,
            (None, true) => AstType::list(AstType::any()),
            (None, false) => AstType::any(),
        };

        varargs = variadic;
        params.push(Parameter::new(name, ty));
    }

    Ok((params, varargs))
}

/// lambda := ['[' generics ']'] '(' params ')' [':' type] ('=>' | '~>') '{' body '}'
pub fn lambda() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        let Some(parts) = split_lambda(text) else {
            return Err(ParseError::NoMatch);
        };

        let generics = generic_names(parts.generics)?;
        let (params, varargs) = parameters(parts.params)?;
        let declared = parts.return_type.map(parse_type).transpose()?;

        state.atomically(|state| {
            let (body, inferred) = if parts.creates_env {
                let mut scope = state.isolated();
                scope.env_mut().bind_parameters(&params);
                let body = statements(parts.body, &mut scope)?;
                let inferred = determine_body_type(&body, scope.env())?;
                (body, inferred)
            } else {
                debug!("binding {} parameter(s) into the enclosing scope", params.len());
                state.env_mut().bind_parameters(&params);
                let body = statements(parts.body, state)?;
                let inferred = determine_body_type(&body, state.env())?;
                (body, inferred)
            };

            let explicit_return = declared.is_some();
            let return_type = match declared {
                Some(declared) if declared != inferred => {
                    return Err(ParseError::invalid(
                        text,
                        format!("declared return type {} but the body is {}", declared, inferred),
                    ));
                }
                Some(declared) => declared,
                None => inferred,
            };

            Ok(AstNode::Lambda(Lambda {
                generics,
                params,
                return_type,
                explicit_return,
                creates_env: parts.creates_env,
                pure: false,
                varargs,
                body,
            }))
        })
    })
    .label("lambda")
}

/// simple_lambda := '[' expression ']'
///
/// A parameterless lambda without its own environment whose body is the
/// single wrapped expression.
pub fn simple_lambda() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        if !match_wrapped(text, Wrapper::Bracket) {
            return Err(ParseError::NoMatch);
        }

        let statement = expression().parse(&text[1..text.len() - 1], state)?;
        let return_type = determine_type(&statement, state.env())?;

        Ok(AstNode::Lambda(Lambda {
            generics: Vec::new(),
            params: Vec::new(),
            return_type,
            explicit_return: false,
            creates_env: false,
            pure: false,
            varargs: false,
            body: vec![statement],
        }))
    })
    .label("simple lambda")
}
