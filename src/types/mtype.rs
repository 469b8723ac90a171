//! # Runtime-Facing Types
//!
//! Once an expression is evaluated its values are described by [`MType`]
//! rather than by the syntactic [`AstType`]. An `MType` refers to data types
//! registered in a [`TypeRegistry`] instead of bare names, so an unknown name
//! or a wrong number of generic arguments is caught when the syntactic type is
//! resolved, not when it is used.
//!
//! The union algebra is the same one [`AstType`] uses (see
//! [`super::union`]).

use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;
use std::rc::Rc;

use super::ast_type::{ANY, AstType, EnvironmentMode, LIST, NUMBER, REFERENCE, STRING, TypeEntry, VOID};
use super::error::TypeError;
use super::union::{UnionEntry, same_entries, union_entries};

/// A registered data type, e.g. `list` with one generic argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub name: String,
    pub generic_arity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MType {
    entries: Vec<MTypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MTypeEntry {
    Data {
        data: Rc<DataType>,
        generics: Vec<MType>,
    },
    Function(MFunction),
    /// A generic name declared by an enclosing function type
    Generic(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MFunction {
    pub return_type: MType,
    pub params: Vec<MType>,
    pub environment: EnvironmentMode,
    pub pure: bool,
    pub varargs: bool,
    pub generic_names: Vec<String>,
}

impl MType {
    pub fn union_base() -> Self {
        MType {
            entries: Vec::new(),
        }
    }

    pub fn single(entry: MTypeEntry) -> Self {
        MType {
            entries: vec![entry],
        }
    }

    pub fn data(data: Rc<DataType>, generics: Vec<MType>) -> Self {
        MType::single(MTypeEntry::Data { data, generics })
    }

    pub fn any() -> Self {
        MType::data(
            Rc::new(DataType {
                name: ANY.to_string(),
                generic_arity: 0,
            }),
            Vec::new(),
        )
    }

    pub fn entries(&self) -> &[MTypeEntry] {
        &self.entries
    }

    pub fn is_union_base(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_any(&self) -> bool {
        self.entries.iter().any(UnionEntry::is_any)
    }

    pub fn union(&self, other: &MType) -> MType {
        if self.is_union_base() {
            return other.clone();
        }
        if other.is_union_base() {
            return self.clone();
        }
        if self.is_any() || other.is_any() {
            return MType::any();
        }

        MType {
            entries: union_entries(&self.entries, &other.entries),
        }
    }
}

impl PartialEq for MType {
    fn eq(&self, other: &Self) -> bool {
        same_entries(&self.entries, &other.entries)
    }
}

impl Eq for MType {}

impl BitOr for &MType {
    type Output = MType;

    fn bitor(self, rhs: &MType) -> MType {
        self.union(rhs)
    }
}

impl UnionEntry for MTypeEntry {
    fn is_any(&self) -> bool {
        matches!(self, MTypeEntry::Data { data, generics } if data.name == ANY && generics.is_empty())
    }

    fn merge(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (MTypeEntry::Function(left), MTypeEntry::Function(right))
                if left.same_signature(right) =>
            {
                Some(MTypeEntry::Function(MFunction {
                    return_type: left.return_type.union(&right.return_type),
                    ..left.clone()
                }))
            }
            (
                MTypeEntry::Data {
                    data: left,
                    generics: left_generics,
                },
                MTypeEntry::Data {
                    data: right,
                    generics: right_generics,
                },
            ) if left == right && left_generics.len() == 1 && right_generics.len() == 1 => {
                Some(MTypeEntry::Data {
                    data: Rc::clone(left),
                    generics: vec![left_generics[0].union(&right_generics[0])],
                })
            }
            _ => None,
        }
    }
}

impl MFunction {
    pub fn same_signature(&self, other: &MFunction) -> bool {
        self.environment == other.environment
            && self.pure == other.pure
            && self.varargs == other.varargs
            && self.generic_names == other.generic_names
            && self.params == other.params
    }
}

/// The set of data types known to the runtime.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Rc<DataType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    /// A registry holding the language's primitive data types.
    pub fn with_builtins() -> Self {
        let mut registry = TypeRegistry::new();
        for (name, arity) in [
            (ANY, 0),
            (VOID, 0),
            (NUMBER, 0),
            (STRING, 0),
            (LIST, 1),
            (REFERENCE, 1),
        ] {
            registry.register(name, arity);
        }
        registry
    }

    /// Register a data type, replacing an earlier one of the same name.
    pub fn register(&mut self, name: impl Into<String>, generic_arity: usize) -> Rc<DataType> {
        let name = name.into();
        let data = Rc::new(DataType {
            name: name.clone(),
            generic_arity,
        });
        self.types.insert(name, Rc::clone(&data));
        data
    }

    pub fn get(&self, name: &str) -> Option<Rc<DataType>> {
        self.types.get(name).cloned()
    }

    /// Convert a syntactic type, replacing generic names found in `bindings`.
    pub fn resolve(
        &self,
        ty: &AstType,
        bindings: &HashMap<String, MType>,
    ) -> Result<MType, TypeError> {
        self.resolve_in(ty, bindings, &[])
    }

    fn resolve_in(
        &self,
        ty: &AstType,
        bindings: &HashMap<String, MType>,
        declared: &[String],
    ) -> Result<MType, TypeError> {
        let mut resolved = MType::union_base();
        for entry in ty.entries() {
            let entry = self.resolve_entry(entry, bindings, declared)?;
            resolved = resolved.union(&entry);
        }
        Ok(resolved)
    }

    fn resolve_entry(
        &self,
        entry: &TypeEntry,
        bindings: &HashMap<String, MType>,
        declared: &[String],
    ) -> Result<MType, TypeError> {
        match entry {
            TypeEntry::Named(named) if named.generics.is_empty() && declared.contains(&named.name) => {
                Ok(MType::single(MTypeEntry::Generic(named.name.clone())))
            }
            TypeEntry::Named(named) if named.generics.is_empty() && bindings.contains_key(&named.name) => {
                Ok(bindings[&named.name].clone())
            }
            TypeEntry::Named(named) => {
                let data = self.get(&named.name).ok_or_else(|| TypeError::UnknownType {
                    name: named.name.clone(),
                })?;
                if data.generic_arity != named.generics.len() {
                    return Err(TypeError::DataTypeArity {
                        name: named.name.clone(),
                        expected: data.generic_arity,
                        found: named.generics.len(),
                    });
                }
                let generics = named
                    .generics
                    .iter()
                    .map(|generic| self.resolve_in(generic, bindings, declared))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MType::data(data, generics))
            }
            TypeEntry::Function(function) => {
                let mut scope = declared.to_vec();
                scope.extend(function.generic_names.iter().cloned());

                let params = function
                    .params
                    .iter()
                    .map(|param| self.resolve_in(param, bindings, &scope))
                    .collect::<Result<Vec<_>, _>>()?;
                let return_type = self.resolve_in(&function.return_type, bindings, &scope)?;

                Ok(MType::single(MTypeEntry::Function(MFunction {
                    return_type,
                    params,
                    environment: function.environment,
                    pure: function.pure,
                    varargs: function.varargs,
                    generic_names: function.generic_names.clone(),
                })))
            }
        }
    }
}

impl fmt::Display for MType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(|entry| entry.to_string()).collect();
        f.write_str(&parts.join("|"))
    }
}

impl fmt::Display for MTypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MTypeEntry::Data { data, generics } => {
                let generics: Vec<String> = generics.iter().map(|g| g.to_string()).collect();
                write!(f, "{}[{}]", data.name, generics.join(","))
            }
            MTypeEntry::Generic(name) => f.write_str(name),
            MTypeEntry::Function(function) => {
                if function.pure {
                    f.write_str("pure")?;
                }
                if !function.generic_names.is_empty() {
                    write!(f, "[{}]", function.generic_names.join(","))?;
                }
                let params: Vec<String> = function.params.iter().map(|p| p.to_string()).collect();
                let varargs = if function.varargs { "..." } else { "" };
                let arrow = match function.environment {
                    EnvironmentMode::AllowAny => "=>",
                    EnvironmentMode::ForceEnvironment => "!=>",
                    EnvironmentMode::ForceNoEnvironment => "!~>",
                };
                write!(f, "({}{}){}{}", params.join(","), varargs, arrow, function.return_type)
            }
        }
    }
}
