//! # Type System
//!
//! - [`ast_type`] - syntactic types ([`AstType`]) with the union operator
//! - [`mtype`] - runtime-facing types ([`MType`]) over registered data types
//! - [`union`] - the merge policy both type models share
//! - [`env`] - the name to type mapping threaded through parsing
//! - [`determine`] - type of an already-parsed node
//! - [`generics`] - solving generic names at a call site
//! - [`subst`] - replacing generic names by concrete types
//! - [`builtins`] - the default, pre-seeded environment

pub mod ast_type;
pub mod builtins;
pub mod determine;
pub mod env;
pub mod error;
pub mod generics;
pub mod mtype;
pub mod subst;
pub mod union;

pub use ast_type::{AstType, EnvironmentMode, FunctionEntry, NamedEntry, Parameter, TypeEntry};
pub use builtins::default_environment;
pub use determine::{determine_body_type, determine_type};
pub use env::TypeEnvironment;
pub use error::TypeError;
pub use generics::{GenericBindingList, assign_generics};
pub use mtype::{DataType, MFunction, MType, MTypeEntry, TypeRegistry};
pub use subst::Substitution;
