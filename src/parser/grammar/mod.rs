//! Grammar of the expression language
//!
//! Every form is a [`BoxedParser`] over a trimmed substring. Forms are tried
//! in a fixed order by [`expression`]; the first one whose shape matches the
//! text owns it, and any error it reports from then on is final.
//!
//! - `call`: calls and member access
//! - `literal`: numbers, strings, references, lists and variables
//! - `lambda`: full lambdas and the `[expr]` shorthand
//! - `statement`: return, declarations and assignments
//! - `types`: the type syntax

mod call;
mod lambda;
mod literal;
mod statement;
mod types;

use std::sync::LazyLock;

use log::trace;
use regex::Regex;

use crate::ast::AstNode;
use crate::scanner::{Wrapper, find_top_level_assignment, match_wrapped, split_top_level};

use super::combinators::{BoxedParser, choice};
use super::state::{ParseError, ParseResult, ParseState, Parser};

pub use call::{CallParts, match_call};
pub use types::{parse_parameter, parse_type};

use call::{call, member_access};
use lambda::{lambda, simple_lambda};
use literal::{list, literal, variable};
use statement::{assignment, declaration, return_statement};

/// Words that can never name a variable, parameter or generic.
pub const RESERVED_WORDS: [&str; 3] = ["var", "const", "return"];

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

static KEYWORD_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:var|const|return)\b").expect("keyword pattern is valid")
});

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// A name usable for a variable, parameter or generic.
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER.is_match(text) && !is_reserved(text)
}

/// Whether `text` can stand as the callee of a call or the parent of a
/// member access: statements cannot.
fn is_operand(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && find_top_level_assignment(text).is_none() && !KEYWORD_HEAD.is_match(text)
}

/// Remove redundant outer parentheses, `((x))` becomes `x`.
fn strip_parens(text: &str) -> &str {
    let mut text = text.trim();
    while match_wrapped(text, Wrapper::Paren) {
        text = text[1..text.len() - 1].trim();
    }
    text
}

/// Parse a comma separated list of expressions. Empty text is an empty
/// list, an empty item is an error.
fn comma_separated(text: &str, state: &mut ParseState) -> ParseResult<Vec<AstNode>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    split_top_level(text, ',', &Wrapper::ALL)
        .into_iter()
        .map(|item| expression().parse(item, state))
        .collect()
}

/// Parse the statements of a lambda body or a program.
///
/// A single statement needs no terminator. Several statements are each
/// terminated by `;`, so the text after the last `;` must be empty.
pub fn statements(text: &str, state: &mut ParseState) -> ParseResult<Vec<AstNode>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let segments = split_top_level(text, ';', &Wrapper::ALL);
    let Some((last, terminated)) = segments.split_last() else {
        return Ok(Vec::new());
    };
    if terminated.is_empty() {
        return Ok(vec![expression().parse(last, state)?]);
    }
    if !last.trim().is_empty() {
        return Err(ParseError::invalid(
            *last,
            "statements must be terminated by ';'",
        ));
    }

    terminated
        .iter()
        .map(|segment| expression().parse(segment, state))
        .collect()
}

/// expression := call | literal | list | lambda | simple_lambda
///             | member | return | declaration | assignment | variable
pub fn expression() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        let text = strip_parens(text);
        if text.is_empty() {
            return Err(ParseError::invalid(text, "empty expression"));
        }

        let forms = choice(vec![
            call(),
            literal(),
            list(),
            lambda(),
            simple_lambda(),
            member_access(),
            return_statement(),
            declaration(),
            assignment(),
            variable(),
        ]);

        state.enter();
        let result = forms.parse(text, state);
        state.leave();

        match result {
            Ok(node) => {
                trace!("{:indent$}{} <- {}", "", node.kind(), text, indent = state.depth() * 2);
                Ok(node)
            }
            Err(ParseError::NoMatch) => Err(ParseError::invalid(text, "unrecognized expression")),
            Err(err) => Err(err),
        }
    })
}
