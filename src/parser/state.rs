use std::fmt;

use crate::types::{TypeEnvironment, TypeError};

/// Why a grammar form did not produce a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The text does not have the shape of this form, try the next one
    NoMatch,
    /// The form was recognized but the text is malformed. `form` names the
    /// innermost labelled grammar form that rejected it.
    Invalid {
        fragment: String,
        reason: String,
        form: Option<&'static str>,
    },
    /// A well-formed program that cannot be typed
    Type(TypeError),
}

impl ParseError {
    pub fn invalid(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::Invalid {
            fragment: fragment.into(),
            reason: reason.into(),
            form: None,
        }
    }

    /// The reason of an invalid result, prefixed with the rejecting form.
    pub fn describe(form: Option<&str>, reason: &str) -> String {
        match form {
            Some(form) => format!("{}: {}", form, reason),
            None => reason.to_string(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoMatch => f.write_str("no grammar form matches"),
            ParseError::Invalid {
                fragment,
                reason,
                form,
            } => write!(
                f,
                "invalid expression `{}`: {}",
                fragment,
                ParseError::describe(*form, reason)
            ),
            ParseError::Type(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<TypeError> for ParseError {
    fn from(err: TypeError) -> Self {
        ParseError::Type(err)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Mutable state threaded through one top-level parse.
pub struct ParseState {
    env: TypeEnvironment,
    depth: usize,
}

impl ParseState {
    pub fn new(env: TypeEnvironment) -> Self {
        Self { env, depth: 0 }
    }

    pub fn env(&self) -> &TypeEnvironment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut TypeEnvironment {
        &mut self.env
    }

    pub fn into_env(self) -> TypeEnvironment {
        self.env
    }

    /// A state over a copy of the environment, for scopes whose bindings
    /// must not leak back.
    pub fn isolated(&self) -> ParseState {
        ParseState {
            env: self.env.clone(),
            depth: self.depth,
        }
    }

    /// Run `form`, discarding every binding it made if it fails.
    pub fn atomically<T>(
        &mut self,
        form: impl FnOnce(&mut ParseState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let snapshot = self.env.clone();
        let result = form(self);
        if result.is_err() {
            self.env = snapshot;
        }
        result
    }

    /// Nesting level of the expression currently being parsed.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

pub trait Parser<T>: Sized {
    fn parse(&self, text: &str, state: &mut ParseState) -> ParseResult<T>;
}

impl<T, F: Fn(&str, &mut ParseState) -> ParseResult<T>> Parser<T> for F {
    fn parse(&self, text: &str, state: &mut ParseState) -> ParseResult<T> {
        self(text, state)
    }
}
