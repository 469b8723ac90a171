use std::fmt;
use std::ops::BitOr;

use super::union::{UnionEntry, same_entries, union_entries};

pub const ANY: &str = "any";
pub const VOID: &str = "void";
pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const LIST: &str = "list";
pub const REFERENCE: &str = "reference";
pub const FUNCTION: &str = "function";

/// Whether calling a lambda of this type creates a fresh variable scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvironmentMode {
    /// Only lambdas that create an environment (`=>`) fit
    ForceEnvironment,
    /// Only lambdas that run in the caller's scope (`~>`) fit
    ForceNoEnvironment,
    #[default]
    AllowAny,
}

/// A syntactic type: the union of one or more [`TypeEntry`] values.
///
/// Equality is set equality of the entries. The zero-entry value returned by
/// [`AstType::union_base`] is only the identity element of [`AstType::union`]
/// and never a real type.
#[derive(Debug, Clone, Default)]
pub struct AstType {
    entries: Vec<TypeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeEntry {
    Named(NamedEntry),
    Function(FunctionEntry),
}

/// A type name with its generic arguments, e.g. `list[number]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedEntry {
    pub name: String,
    pub generics: Vec<AstType>,
}

/// The type of a lambda. Its entry name is always `function`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionEntry {
    pub return_type: AstType,
    pub params: Vec<AstType>,
    pub environment: EnvironmentMode,
    pub pure: bool,
    /// The last parameter collects the remaining arguments
    pub varargs: bool,
    pub generic_names: Vec<String>,
}

/// A named, typed lambda parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: AstType,
}

impl AstType {
    pub fn union_base() -> Self {
        AstType {
            entries: Vec::new(),
        }
    }

    pub fn single(entry: TypeEntry) -> Self {
        AstType {
            entries: vec![entry],
        }
    }

    /// Build a normalized union out of arbitrary entries.
    pub fn from_entries(entries: impl IntoIterator<Item = TypeEntry>) -> Self {
        entries
            .into_iter()
            .fold(AstType::union_base(), |acc, entry| {
                acc.union(&AstType::single(entry))
            })
    }

    pub fn named(name: impl Into<String>) -> Self {
        AstType::generic(name, Vec::new())
    }

    pub fn generic(name: impl Into<String>, generics: Vec<AstType>) -> Self {
        AstType::single(TypeEntry::Named(NamedEntry {
            name: name.into(),
            generics,
        }))
    }

    pub fn function(entry: FunctionEntry) -> Self {
        AstType::single(TypeEntry::Function(entry))
    }

    pub fn any() -> Self {
        AstType::named(ANY)
    }

    pub fn void() -> Self {
        AstType::named(VOID)
    }

    pub fn number() -> Self {
        AstType::named(NUMBER)
    }

    pub fn string() -> Self {
        AstType::named(STRING)
    }

    pub fn list(element: AstType) -> Self {
        AstType::generic(LIST, vec![element])
    }

    pub fn reference(target: AstType) -> Self {
        AstType::generic(REFERENCE, vec![target])
    }

    pub fn entries(&self) -> &[TypeEntry] {
        &self.entries
    }

    pub fn is_union_base(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_any(&self) -> bool {
        self.entries.iter().any(UnionEntry::is_any)
    }

    /// The only entry of a non-union type.
    pub fn single_entry(&self) -> Option<&TypeEntry> {
        match self.entries.as_slice() {
            [entry] => Some(entry),
            _ => None,
        }
    }

    /// `name` on its own, with no generic arguments and no other entries.
    pub fn is_single_named(&self, name: &str) -> bool {
        matches!(self.single_entry(), Some(TypeEntry::Named(entry)) if entry.is_bare(name))
    }

    /// A union with more than one entry, one of which is the bare `name`.
    pub fn is_union_mentioning(&self, name: &str) -> bool {
        self.entries.len() > 1
            && self
                .entries
                .iter()
                .any(|entry| matches!(entry, TypeEntry::Named(named) if named.is_bare(name)))
    }

    /// `list[T]` or a union made only of list types.
    pub fn is_list_type(&self) -> bool {
        !self.entries.is_empty()
            && self.entries.iter().all(|entry| {
                matches!(entry, TypeEntry::Named(named) if named.name == LIST && named.generics.len() == 1)
            })
    }

    /// The union operator `|`.
    pub fn union(&self, other: &AstType) -> AstType {
        if self.is_union_base() {
            return other.clone();
        }
        if other.is_union_base() {
            return self.clone();
        }
        if self.is_any() || other.is_any() {
            return AstType::any();
        }

        AstType {
            entries: union_entries(&self.entries, &other.entries),
        }
    }
}

impl PartialEq for AstType {
    fn eq(&self, other: &Self) -> bool {
        same_entries(&self.entries, &other.entries)
    }
}

impl Eq for AstType {}

impl BitOr for AstType {
    type Output = AstType;

    fn bitor(self, rhs: AstType) -> AstType {
        self.union(&rhs)
    }
}

impl BitOr for &AstType {
    type Output = AstType;

    fn bitor(self, rhs: &AstType) -> AstType {
        self.union(rhs)
    }
}

impl TypeEntry {
    pub fn name(&self) -> &str {
        match self {
            TypeEntry::Named(named) => &named.name,
            TypeEntry::Function(_) => FUNCTION,
        }
    }
}

impl UnionEntry for TypeEntry {
    fn is_any(&self) -> bool {
        matches!(self, TypeEntry::Named(named) if named.is_bare(ANY))
    }

    fn merge(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (TypeEntry::Function(left), TypeEntry::Function(right))
                if left.same_signature(right) =>
            {
                Some(TypeEntry::Function(FunctionEntry {
                    return_type: left.return_type.union(&right.return_type),
                    ..left.clone()
                }))
            }
            // only single-argument generics merge slot-wise, tuples would be unsound
            (TypeEntry::Named(left), TypeEntry::Named(right))
                if left.name == right.name
                    && left.generics.len() == 1
                    && right.generics.len() == 1 =>
            {
                Some(TypeEntry::Named(NamedEntry {
                    name: left.name.clone(),
                    generics: vec![left.generics[0].union(&right.generics[0])],
                }))
            }
            _ => None,
        }
    }
}

impl NamedEntry {
    pub fn is_bare(&self, name: &str) -> bool {
        self.name == name && self.generics.is_empty()
    }
}

impl FunctionEntry {
    pub fn new(params: Vec<AstType>, return_type: AstType) -> Self {
        FunctionEntry {
            return_type,
            params,
            environment: EnvironmentMode::AllowAny,
            pure: false,
            varargs: false,
            generic_names: Vec::new(),
        }
    }

    pub fn with_environment(mut self, environment: EnvironmentMode) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_generics(mut self, generic_names: Vec<String>) -> Self {
        self.generic_names = generic_names;
        self
    }

    pub fn pure(mut self) -> Self {
        self.pure = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.varargs = true;
        self
    }

    /// Equal in everything but the return type.
    pub fn same_signature(&self, other: &FunctionEntry) -> bool {
        self.environment == other.environment
            && self.pure == other.pure
            && self.varargs == other.varargs
            && self.generic_names == other.generic_names
            && self.params == other.params
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: AstType) -> Self {
        Parameter {
            name: name.into(),
            ty,
        }
    }
}

// === Canonical text form ===

impl fmt::Display for AstType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", entry)?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeEntry::Named(named) => write!(f, "{}", named),
            TypeEntry::Function(function) => write!(f, "{}", function),
        }
    }
}

impl fmt::Display for NamedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, join(&self.generics))
    }
}

impl fmt::Display for FunctionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pure {
            f.write_str("pure")?;
        }
        if !self.generic_names.is_empty() {
            write!(f, "[{}]", self.generic_names.join(","))?;
        }

        f.write_str("(")?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", param)?;
        }
        if self.varargs && !self.params.is_empty() {
            f.write_str("...")?;
        }
        f.write_str(")")?;

        let arrow = match self.environment {
            EnvironmentMode::AllowAny => "=>",
            EnvironmentMode::ForceEnvironment => "!=>",
            EnvironmentMode::ForceNoEnvironment => "!~>",
        };
        f.write_str(arrow)?;

        if self.return_type.entries().len() > 1 {
            write!(f, "({})", self.return_type)
        } else {
            write!(f, "{}", self.return_type)
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.ty)
    }
}

fn join(types: &[AstType]) -> String {
    types
        .iter()
        .map(|ty| ty.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
