//! # mlang - Parser and Structural Type System
//!
//! mlang reads a small expression-oriented language directly from strings
//! and types it while it parses. There is no lexer: every grammar decision
//! is made on a substring with the depth-aware scans of [`scanner`].
//!
//! ## Pipeline
//!
//! ```text
//! Source Text (&str)
//!     ↓
//! [Parser] → AstNode, typed against a TypeEnvironment as it is built
//!     ↓
//! [Determiner] → AstType of any node
//! ```
//!
//! Parsing has three outcomes:
//!
//! - a node
//! - the [`ast::Invalid`] sentinel, for text that is malformed or whose
//!   declared types contradict the inferred ones
//! - a [`types::TypeError`], for well-formed text that cannot be typed
//!
//! ## Type System
//!
//! Types are unions of entries. An entry is either a named type with
//! generic arguments (`list[number]`) or a function signature
//! (`[T](T,list[T]...)!=>T`). The union operator deduplicates, absorbs into
//! `any`, and merges function entries that differ only in their return
//! type by unioning the return types. `list[a]` and `list[b]` merge into
//! `list[a|b]` the same way. Generic names of a callee are solved at each call site
//! from the arguments.
//!
//! ## Module Structure
//!
//! - [`scanner`] - bracket, string and escape aware character scans
//! - [`ast`] - syntax tree node kinds
//! - [`parser`] - the recursive descent parser and the type syntax
//! - [`types`] - type models, environment, determination and generics
//! - [`fmt`] - canonical source text of nodes
//!
//! ## Example
//!
//! ```
//! use mlang::parser::parse;
//! use mlang::types::{AstType, TypeEnvironment, determine_type};
//!
//! let node = parse("():list[number]=>{{1,2,3}}").unwrap();
//! assert!(!node.is_invalid());
//!
//! let ty = determine_type(&parse("{1,2}").unwrap(), &TypeEnvironment::empty()).unwrap();
//! assert_eq!(ty, AstType::list(AstType::number()));
//! ```

pub mod ast;
pub mod fmt;
pub mod parser;
pub mod scanner;
pub mod types;
