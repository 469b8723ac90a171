use std::ops::{BitOr, Shr};
use std::rc::Rc;

use regex::Regex;

use super::state::{ParseError, ParseResult, ParseState, Parser};

type ParserFn<T> = Rc<dyn Fn(&str, &mut ParseState) -> ParseResult<T>>;

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: ParserFn<T>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |text: &str, state: &mut ParseState| parser.parse(text, state)),
        }
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, text: &str, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(text, state)
    }
}

// === Combinators as methods ===

impl<T: 'static> BoxedParser<T> {
    /// Map: transform result
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |text: &str, state: &mut ParseState| {
            let a = self.parse(text, state)?;
            Ok(f(a))
        })
    }

    /// Choice: try self, and only if its form does not apply try other.
    ///
    /// A recognized-but-invalid result is final. Parsers must not touch the
    /// state before they know their form applies.
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |text: &str, state: &mut ParseState| {
            match self.parse(text, state) {
                Err(ParseError::NoMatch) => other.parse(text, state),
                result => result,
            }
        })
    }

    /// Attribute an invalid result to this form, unless a nested form
    /// already claimed it
    pub fn label(self, name: &'static str) -> BoxedParser<T> {
        BoxedParser::new(move |text: &str, state: &mut ParseState| {
            match self.parse(text, state) {
                Err(ParseError::Invalid {
                    fragment,
                    reason,
                    form: None,
                }) => Err(ParseError::Invalid {
                    fragment,
                    reason,
                    form: Some(name),
                }),
                result => result,
            }
        })
    }
}

// === Operator Overloading ===

/// `|` for choice: A | B -> A, or B if A's form does not apply
impl<T: 'static> BitOr<BoxedParser<T>> for BoxedParser<T> {
    type Output = BoxedParser<T>;

    fn bitor(self, rhs: BoxedParser<T>) -> Self::Output {
        self.or(rhs)
    }
}

/// `>>` for map: A >> fn -> B
impl<T: 'static, U: 'static, F: Fn(T) -> U + 'static> Shr<F> for BoxedParser<T> {
    type Output = BoxedParser<U>;

    fn shr(self, f: F) -> Self::Output {
        self.map(f)
    }
}

// === Primitive Parsers ===

/// Match the whole text against an anchored pattern, yielding its capture
/// groups (group 0 excluded).
pub fn pattern(regex: &'static Regex) -> BoxedParser<Vec<Option<String>>> {
    BoxedParser::new(move |text: &str, _state: &mut ParseState| {
        let captures = regex.captures(text).ok_or(ParseError::NoMatch)?;
        Ok(captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect())
    })
}

/// Try each parser in order, first applicable one wins.
pub fn choice<T: 'static>(parsers: Vec<BoxedParser<T>>) -> BoxedParser<T> {
    parsers
        .into_iter()
        .reduce(BoxedParser::or)
        .unwrap_or_else(|| BoxedParser::new(|_: &str, _: &mut ParseState| Err(ParseError::NoMatch)))
}
