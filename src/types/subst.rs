use std::collections::HashMap;

use super::ast_type::{AstType, FunctionEntry, NamedEntry, TypeEntry};

/// Replacement of generic names by concrete types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(pub HashMap<String, AstType>);

impl Substitution {
    /// Pair declared generic names with their bindings, position by position.
    pub fn from_bindings(names: &[String], bindings: &[AstType]) -> Self {
        Substitution(
            names
                .iter()
                .cloned()
                .zip(bindings.iter().cloned())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply(&self, ty: &AstType) -> AstType {
        if self.is_empty() {
            return ty.clone();
        }

        ty.entries()
            .iter()
            .fold(AstType::union_base(), |acc, entry| {
                acc.union(&self.apply_entry(entry))
            })
    }

    fn apply_entry(&self, entry: &TypeEntry) -> AstType {
        match entry {
            TypeEntry::Named(named) if named.generics.is_empty() => self
                .0
                .get(&named.name)
                .cloned()
                .unwrap_or_else(|| AstType::single(entry.clone())),
            TypeEntry::Named(named) => AstType::single(TypeEntry::Named(NamedEntry {
                name: named.name.clone(),
                generics: named.generics.iter().map(|g| self.apply(g)).collect(),
            })),
            TypeEntry::Function(function) => {
                // the function's own generic names shadow ours
                let inner = self.without(&function.generic_names);
                AstType::function(FunctionEntry {
                    return_type: inner.apply(&function.return_type),
                    params: function.params.iter().map(|p| inner.apply(p)).collect(),
                    ..function.clone()
                })
            }
        }
    }

    fn without(&self, names: &[String]) -> Substitution {
        Substitution(
            self.0
                .iter()
                .filter(|(name, _)| !names.contains(name))
                .map(|(name, ty)| (name.clone(), ty.clone()))
                .collect(),
        )
    }
}
