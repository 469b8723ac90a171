use std::collections::HashMap;

use super::ast_type::{AstType, Parameter};

/// Declared types of variables and members, threaded through parsing.
///
/// A single environment is created per top-level parse. Lambdas that create
/// a runtime environment parse their body against a clone; all other
/// constructs mutate the environment they were given, so a `var` declared
/// inside a `~>` lambda is visible after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeEnvironment {
    variables: HashMap<String, AstType>,
    members: HashMap<(String, String), AstType>,
}

impl TypeEnvironment {
    pub fn empty() -> Self {
        TypeEnvironment::default()
    }

    pub fn with_bindings(bindings: Vec<(String, AstType)>) -> Self {
        TypeEnvironment {
            variables: bindings.into_iter().collect(),
            members: HashMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&AstType> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Bind `name`, shadowing an earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, ty: AstType) {
        self.variables.insert(name.into(), ty);
    }

    pub fn bind_parameters(&mut self, params: &[Parameter]) {
        for param in params {
            self.insert(param.name.clone(), param.ty.clone());
        }
    }

    /// Type of `member` on values whose type entry is named `owner`.
    pub fn lookup_member(&self, owner: &str, member: &str) -> Option<&AstType> {
        self.members.get(&(owner.to_string(), member.to_string()))
    }

    pub fn insert_member(&mut self, owner: impl Into<String>, member: impl Into<String>, ty: AstType) {
        self.members.insert((owner.into(), member.into()), ty);
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_env() {
        let env = TypeEnvironment::empty();
        assert!(env.lookup("x").is_none());
        assert!(env.is_empty());
    }

    #[test]
    fn test_with_bindings() {
        let env = TypeEnvironment::with_bindings(vec![("x".to_string(), AstType::number())]);
        assert_eq!(env.lookup("x"), Some(&AstType::number()));
    }

    #[test]
    fn test_insert_shadows() {
        let mut env = TypeEnvironment::empty();
        env.insert("x", AstType::number());
        env.insert("x", AstType::string());
        assert_eq!(env.lookup("x"), Some(&AstType::string()));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_clone_does_not_leak_back() {
        let mut env = TypeEnvironment::empty();
        env.insert("x", AstType::number());

        let mut scope = env.clone();
        scope.insert("y", AstType::string());

        assert!(scope.contains("x"));
        assert!(!env.contains("y"));
    }

    #[test]
    fn test_bind_parameters() {
        let mut env = TypeEnvironment::empty();
        env.bind_parameters(&[
            Parameter::new("a", AstType::number()),
            Parameter::new("b", AstType::any()),
        ]);
        assert_eq!(env.lookup("b"), Some(&AstType::any()));
    }

    #[test]
    fn test_members() {
        let mut env = TypeEnvironment::empty();
        env.insert_member("list", "length", AstType::number());
        assert_eq!(env.lookup_member("list", "length"), Some(&AstType::number()));
        assert!(env.lookup_member("string", "length").is_none());
    }
}
