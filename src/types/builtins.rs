//! The environment every top-level parse starts from.

use std::sync::OnceLock;

use log::warn;

use crate::parser::parse_type;

use super::ast_type::{AstType, LIST, STRING};
use super::env::TypeEnvironment;

/// Builtin variables and their signatures, in the type syntax.
const BUILTINS: &[(&str, &str)] = &[
    ("_add", "pure(number,number)=>number"),
    ("_sub", "pure(number,number)=>number"),
    ("_mul", "pure(number,number)=>number"),
    ("_div", "pure(number,number)=>number"),
    ("_concat", "pure(string,string)=>string"),
    ("print", "(any)!~>void"),
    ("identity", "[T](T)=>T"),
    ("length", "(list[any]|string)=>number"),
];

static DEFAULT_ENVIRONMENT: OnceLock<TypeEnvironment> = OnceLock::new();

/// A fresh copy of the builtin environment.
pub fn default_environment() -> TypeEnvironment {
    DEFAULT_ENVIRONMENT.get_or_init(build).clone()
}

fn build() -> TypeEnvironment {
    let mut env = TypeEnvironment::empty();

    for (name, signature) in BUILTINS {
        match parse_type(signature) {
            Ok(ty) => env.insert(*name, ty),
            Err(err) => warn!("skipping builtin {}: {}", name, err),
        }
    }

    env.insert_member(LIST, "length", AstType::number());
    env.insert_member(STRING, "length", AstType::number());
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_signature_parses() {
        for (name, signature) in BUILTINS {
            assert!(parse_type(signature).is_ok(), "builtin {} does not parse", name);
        }
        assert_eq!(default_environment().len(), BUILTINS.len());
    }

    #[test]
    fn test_members() {
        let env = default_environment();
        assert_eq!(env.lookup_member(LIST, "length"), Some(&AstType::number()));
        assert_eq!(env.lookup_member(STRING, "length"), Some(&AstType::number()));
    }

    #[test]
    fn test_copies_are_independent() {
        let mut first = default_environment();
        first.insert("extra", AstType::number());
        assert!(!default_environment().contains("extra"));
    }
}
