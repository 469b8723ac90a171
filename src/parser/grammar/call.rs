//! Calls and member access
//!
//! Both forms are recognized from the end of the text: a call is anything
//! ending in a parenthesized group that does not start the text, a member
//! access is anything whose last top-level `.` is followed by a name.

use crate::ast::{AstNode, Call, MemberAccess};
use crate::scanner::{
    Wrapper, find_bracket_end, find_last_opening, find_last_top_level, split_top_level,
};
use crate::types::AstType;

use crate::parser::combinators::BoxedParser;
use crate::parser::state::{ParseError, ParseResult, ParseState, Parser};

use super::types::parse_type;
use super::{IDENTIFIER, comma_separated, expression, is_operand};

/// The three pieces of a call expression, as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallParts<'a> {
    pub caller: &'a str,
    /// Text between the call parentheses
    pub args: &'a str,
    /// Text between the generic angle brackets, empty when absent
    pub generics: &'a str,
}

/// Split `text` into caller, arguments and generics if it is a call.
///
/// ```text
/// x<number>(5,2)   caller "x"  args "5,2"  generics "number"
/// x()              caller "x"  args ""     generics ""
/// (5)              not a call, the group starts the text
/// f(1)(2)          caller "f(1)"  args "2"
/// ```
pub fn match_call(text: &str) -> Option<CallParts<'_>> {
    let text = text.trim();
    if !text.ends_with(')') {
        return None;
    }

    let open = find_last_opening(text, Wrapper::Paren)?;
    if open == 0 || find_bracket_end(text, open, Wrapper::Paren)? != text.len() - 1 {
        return None;
    }

    let called = text[..open].trim_end();
    let args = &text[open + 1..text.len() - 1];

    if !called.ends_with('>') {
        return Some(CallParts {
            caller: called,
            args,
            generics: "",
        });
    }

    // a trailing `>` is either a generic list or the tip of an arrow
    let angle = find_last_opening(called, Wrapper::Angle)?;
    if angle == 0 || find_bracket_end(called, angle, Wrapper::Angle)? != called.len() - 1 {
        return None;
    }
    Some(CallParts {
        caller: called[..angle].trim_end(),
        args,
        generics: &called[angle + 1..called.len() - 1],
    })
}

/// Split at the last top-level `.` when it is followed by a member name.
pub(super) fn split_member(text: &str) -> Option<(&str, &str)> {
    let dot = find_last_top_level(text, '.')?;
    let parent = text[..dot].trim();
    let name = text[dot + 1..].trim();

    (!parent.is_empty() && IDENTIFIER.is_match(name)).then_some((parent, name))
}

fn generic_arguments(text: &str) -> ParseResult<Vec<AstType>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',', &Wrapper::ALL)
        .into_iter()
        .map(parse_type)
        .collect()
}

/// call := expression ['<' type (',' type)* '>'] '(' [expression (',' expression)*] ')'
pub fn call() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        let Some(parts) = match_call(text) else {
            return Err(ParseError::NoMatch);
        };
        if !is_operand(parts.caller) {
            return Err(ParseError::NoMatch);
        }

        let callee = expression().parse(parts.caller, state)?;
        let generics = generic_arguments(parts.generics)?;
        let args = comma_separated(parts.args, state)?;

        Ok(AstNode::Call(Call {
            callee: Box::new(callee),
            args,
            generics,
        }))
    })
    .label("call")
}

/// Parse `parent.name` into its node parts.
pub(super) fn member(text: &str, state: &mut ParseState) -> ParseResult<MemberAccess> {
    let Some((parent, name)) = split_member(text) else {
        return Err(ParseError::NoMatch);
    };
    if !is_operand(parent) {
        return Err(ParseError::NoMatch);
    }

    let parent = expression().parse(parent, state)?;
    Ok(MemberAccess {
        parent: Box::new(parent),
        name: name.to_string(),
    })
}

/// member := expression '.' ident
pub fn member_access() -> BoxedParser<AstNode> {
    BoxedParser::new(|text: &str, state: &mut ParseState| {
        member(text, state).map(AstNode::Member)
    })
    .label("member access")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_call_with_generics() {
        assert_eq!(
            match_call("x<number>(5,2)"),
            Some(CallParts {
                caller: "x",
                args: "5,2",
                generics: "number"
            })
        );
    }

    #[test]
    fn test_match_call_without_arguments() {
        assert_eq!(
            match_call("x()"),
            Some(CallParts {
                caller: "x",
                args: "",
                generics: ""
            })
        );
    }

    #[test]
    fn test_match_call_rejects_groups() {
        assert_eq!(match_call("(5)"), None);
        assert_eq!(match_call("x"), None);
        assert_eq!(match_call("f(1)+"), None);
    }

    #[test]
    fn test_match_call_chained() {
        let parts = match_call("f(1)(2)").unwrap();
        assert_eq!(parts.caller, "f(1)");
        assert_eq!(parts.args, "2");
    }

    #[test]
    fn test_match_call_on_lambda() {
        let parts = match_call("((x)=>{x})(5)").unwrap();
        assert_eq!(parts.caller, "((x)=>{x})");
        assert_eq!(parts.generics, "");
    }

    #[test]
    fn test_split_member() {
        assert_eq!(split_member("a.b.c"), Some(("a.b", "c")));
        assert_eq!(split_member("f(a.b)"), None);
        assert_eq!(split_member(".b"), None);
        assert_eq!(split_member("a.5"), None);
    }
}
