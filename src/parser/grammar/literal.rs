//! Literal parsers: numbers, strings, references, lists and variables

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{AstNode, ListLiteral, NumberLiteral, ReferenceLiteral, StringLiteral, Variable};
use crate::scanner::{Wrapper, match_wrapped};

use crate::parser::combinators::{BoxedParser, pattern};
use crate::parser::state::{ParseError, ParseState, Parser};

use super::{comma_separated, is_identifier};

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+))$").expect("number pattern is valid")
});

static STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^"((?:[^"\\]|\\.)*)"$"#).expect("string pattern is valid")
});

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&([A-Za-z_][A-Za-z0-9_]*)$").expect("reference pattern is valid")
});

/// Captured group `index`, empty when the group did not participate.
fn group(captures: &[Option<String>], index: usize) -> String {
    captures
        .get(index)
        .cloned()
        .flatten()
        .unwrap_or_default()
}

/// number := [+-] digits [. digits]
pub fn number() -> BoxedParser<AstNode> {
    let digits = pattern(&NUMBER);
    BoxedParser::new(move |text: &str, state: &mut ParseState| {
        let captures = digits.parse(text, state)?;
        let value = group(&captures, 0)
            .parse::<f64>()
            .map_err(|err| ParseError::invalid(text, err.to_string()))?;
        Ok(AstNode::Number(NumberLiteral { value }))
    })
}

/// string := '"' (char | '\' char)* '"'
pub fn string_literal() -> BoxedParser<AstNode> {
    pattern(&STRING)
        >> |captures: Vec<Option<String>>| {
            AstNode::String(StringLiteral {
                value: unescape(&group(&captures, 0)),
            })
        }
}

/// reference := '&' ident
pub fn reference() -> BoxedParser<AstNode> {
    let target = pattern(&REFERENCE);
    BoxedParser::new(move |text: &str, state: &mut ParseState| {
        let name = group(&target.parse(text, state)?, 0);
        if !is_identifier(&name) {
            return Err(ParseError::invalid(text, "cannot reference a reserved word"));
        }
        Ok(AstNode::Reference(ReferenceLiteral { name }))
    })
}

/// literal := number | string | reference
pub fn literal() -> BoxedParser<AstNode> {
    number() | string_literal() | reference()
}

/// list := '{' [expression (',' expression)*] '}'
pub fn list() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        if !match_wrapped(text, Wrapper::Brace) {
            return Err(ParseError::NoMatch);
        }

        let elements = comma_separated(&text[1..text.len() - 1], state)?;
        Ok(AstNode::List(ListLiteral { elements }))
    })
    .label("list")
}

/// variable := ident
pub fn variable() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, _state: &mut ParseState| {
        if !is_identifier(text) {
            return Err(ParseError::NoMatch);
        }
        Ok(AstNode::Variable(Variable {
            name: text.to_string(),
        }))
    })
}

/// Resolve the escapes of a string literal's content.
pub fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}
