//! Type syntax
//!
//! ```text
//! type     := member ('|' member)*
//! member   := '(' type ')' | function | named
//! named    := ident ['[' [type (',' type)*] ']']
//! function := ['pure'] ['[' ident (',' ident)* ']'] '(' [type (',' type)* ['...']] ')'
//!             ['!'] ('=>' | '~>') type
//! ```
//!
//! Without `!` a function type accepts any environment mode; `!=>` forces
//! its own environment and `!~>` forces the caller's.

use crate::scanner::{Wrapper, find_bracket_end, match_wrapped, split_top_level};
use crate::types::{AstType, EnvironmentMode, FunctionEntry, Parameter};

use crate::parser::state::{ParseError, ParseResult};

use super::is_identifier;

/// Parse a type written in the canonical type syntax.
pub fn parse_type(text: &str) -> ParseResult<AstType> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::invalid(text, "empty type"));
    }

    let members = split_top_level(text, '|', &Wrapper::ALL);
    if members.len() > 1 {
        return members
            .into_iter()
            .try_fold(AstType::union_base(), |acc, member| Ok(acc.union(&parse_type(member)?)));
    }

    if match_wrapped(text, Wrapper::Paren) {
        return parse_type(&text[1..text.len() - 1]);
    }

    if let Some(function) = function_type(text)? {
        return Ok(AstType::function(function));
    }

    named_type(text)
}

fn type_list(text: &str) -> ParseResult<Vec<AstType>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, ',', &Wrapper::ALL)
        .into_iter()
        .map(parse_type)
        .collect()
}

/// `Ok(None)` when `text` does not have the shape of a function type.
fn function_type(text: &str) -> ParseResult<Option<FunctionEntry>> {
    let mut rest = text;
    let mut pure = false;
    if let Some(after) = rest.strip_prefix("pure") {
        let after = after.trim_start();
        if after.starts_with('(') || after.starts_with('[') {
            pure = true;
            rest = after;
        }
    }

    let mut generics = None;
    if rest.starts_with('[') {
        let Some(end) = find_bracket_end(rest, 0, Wrapper::Bracket) else {
            return Ok(None);
        };
        generics = Some(&rest[1..end]);
        rest = rest[end + 1..].trim_start();
    }

    if !rest.starts_with('(') {
        return Ok(None);
    }
    let Some(close) = find_bracket_end(rest, 0, Wrapper::Paren) else {
        return Ok(None);
    };
    let params = &rest[1..close];
    let tail = rest[close + 1..].trim_start();

    let arrows = [
        ("!=>", EnvironmentMode::ForceEnvironment),
        ("!~>", EnvironmentMode::ForceNoEnvironment),
        ("=>", EnvironmentMode::AllowAny),
        ("~>", EnvironmentMode::AllowAny),
    ];
    let Some((environment, return_text)) = arrows
        .iter()
        .find_map(|(arrow, mode)| tail.strip_prefix(arrow).map(|rest| (*mode, rest)))
    else {
        return Ok(None);
    };

    let generic_names = match generics {
        Some(names) if !names.trim().is_empty() => split_top_level(names, ',', &Wrapper::ALL)
            .into_iter()
            .map(str::trim)
            .map(|name| {
                if is_identifier(name) {
                    Ok(name.to_string())
                } else {
                    Err(ParseError::invalid(name, "invalid generic name"))
                }
            })
            .collect::<ParseResult<Vec<_>>>()?,
        _ => Vec::new(),
    };

    let params = params.trim();
    let (params, varargs) = match params.strip_suffix("...") {
        Some(stem) => (stem, true),
        None => (params, false),
    };
    if varargs && params.trim().is_empty() {
        return Err(ParseError::invalid(text, "`...` needs a parameter"));
    }

    let mut function = FunctionEntry::new(type_list(params)?, parse_type(return_text)?)
        .with_environment(environment)
        .with_generics(generic_names);
    if pure {
        function = function.pure();
    }
    if varargs {
        function = function.variadic();
    }
    Ok(Some(function))
}

fn named_type(text: &str) -> ParseResult<AstType> {
    let name_end = text
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(text.len());
    let name = &text[..name_end];
    if name.is_empty() || name.starts_with(|ch: char| ch.is_ascii_digit()) {
        return Err(ParseError::invalid(text, "expected a type name"));
    }

    let rest = text[name_end..].trim_start();
    if rest.is_empty() {
        return Ok(AstType::named(name));
    }
    if !match_wrapped(rest, Wrapper::Bracket) {
        return Err(ParseError::invalid(text, "malformed type arguments"));
    }

    Ok(AstType::generic(name, type_list(&rest[1..rest.len() - 1])?))
}

/// Split `name[:type]` into the name and the optional type.
pub(super) fn parameter_parts(text: &str) -> ParseResult<(String, Option<AstType>)> {
    let text = text.trim();
    let (name, ty) = match text.split_once(':') {
        Some((name, ty)) => (name.trim(), Some(parse_type(ty)?)),
        None => (text, None),
    };

    if !is_identifier(name) {
        return Err(ParseError::invalid(text, format!("invalid parameter name `{}`", name)));
    }
    Ok((name.to_string(), ty))
}

/// Parse `name[:type]`, an untyped parameter is `any`.
pub fn parse_parameter(text: &str) -> ParseResult<Parameter> {
    let (name, ty) = parameter_parts(text)?;
    Ok(Parameter::new(name, ty.unwrap_or_else(AstType::any)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_with_arguments() {
        assert_eq!(
            parse_type("list[number]"),
            Ok(AstType::list(AstType::number()))
        );
        assert_eq!(parse_type("number[]"), Ok(AstType::number()));
    }

    #[test]
    fn test_union_and_grouping() {
        assert_eq!(
            parse_type("(number|string)|number"),
            Ok(AstType::number() | AstType::string())
        );
    }

    #[test]
    fn test_function_modes() {
        let plain = parse_type("(number)=>number").unwrap();
        let forced = parse_type("(number)!=>number").unwrap();
        let shared = parse_type("(number)!~>number").unwrap();
        assert_ne!(plain, forced);
        assert_ne!(forced, shared);
        let Some(crate::types::TypeEntry::Function(function)) = shared.single_entry() else {
            panic!("expected a function type");
        };
        assert_eq!(function.environment, EnvironmentMode::ForceNoEnvironment);
    }

    #[test]
    fn test_pure_generic_variadic() {
        let ty = parse_type("pure[T](T,list[T]...)=>T").unwrap();
        let Some(crate::types::TypeEntry::Function(function)) = ty.single_entry() else {
            panic!("expected a function type");
        };
        assert!(function.pure);
        assert!(function.varargs);
        assert_eq!(function.generic_names, vec!["T".to_string()]);
        assert_eq!(function.params.len(), 2);
    }

    #[test]
    fn test_pure_as_type_name() {
        assert_eq!(parse_type("pure"), Ok(AstType::named("pure")));
    }

    #[test]
    fn test_function_return_union_binds_loosely() {
        let ty = parse_type("()=>number|string").unwrap();
        assert_eq!(ty.entries().len(), 2);
        let grouped = parse_type("()=>(number|string)").unwrap();
        assert_eq!(grouped.entries().len(), 1);
    }

    #[test]
    fn test_malformed() {
        assert!(parse_type("").is_err());
        assert!(parse_type("list[number").is_err());
        assert!(parse_type("5").is_err());
    }

    #[test]
    fn test_parameters() {
        assert_eq!(
            parse_parameter("value:number"),
            Ok(Parameter::new("value", AstType::number()))
        );
        assert_eq!(parse_parameter("value"), Ok(Parameter::new("value", AstType::any())));
        assert!(parse_parameter("var:number").is_err());
    }
}
