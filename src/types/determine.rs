//! # Type Determination
//!
//! Computes the [`AstType`] of an already-parsed node against a
//! [`TypeEnvironment`]. The parser calls into this module while it parses:
//! a lambda needs the type of its body before the lambda node can be built,
//! and a declaration needs the type of its initializer before the declared
//! name can be bound.
//!
//! ## Rules
//!
//! ```text
//! 5, "s"            number, string
//! &x                reference[type of x]
//! {a, b}            list[type of a | type of b]      {} is list[any]
//! (p:P)=>{body}     function entry of the lambda literal
//! f(args)           union of the return types of every entry of f's type
//! p.m               union of member m over every entry of p's type
//! var x = v         the declared (or inferred) type of x
//! t = v             type of v
//! return v          type of v, or void
//! ```
//!
//! A statement sequence has the type of its last statement, `void` if it is
//! empty. Multiple `return` statements are not unioned.

use crate::ast::{AssignTarget, AstNode, Call, ListLiteral, MemberAccess};

use super::ast_type::{AstType, REFERENCE, TypeEntry};
use super::env::TypeEnvironment;
use super::error::TypeError;
use super::generics::assign_generics;
use super::subst::Substitution;

/// Determine the type of a single node.
pub fn determine_type(node: &AstNode, env: &TypeEnvironment) -> Result<AstType, TypeError> {
    Determiner::new(env).determine(node)
}

/// Determine the type of a lambda or declaration body.
pub fn determine_body_type(body: &[AstNode], env: &TypeEnvironment) -> Result<AstType, TypeError> {
    match body.last() {
        Some(last) => determine_type(last, env),
        None => Ok(AstType::void()),
    }
}

struct Determiner<'a> {
    env: &'a TypeEnvironment,
}

impl<'a> Determiner<'a> {
    fn new(env: &'a TypeEnvironment) -> Self {
        Determiner { env }
    }

    fn lookup(&self, name: &str) -> Result<&'a AstType, TypeError> {
        self.env
            .lookup(name)
            .ok_or_else(|| TypeError::unbound_variable(name))
    }

    fn determine(&self, node: &AstNode) -> Result<AstType, TypeError> {
        match node {
            AstNode::Number(_) => Ok(AstType::number()),
            AstNode::String(_) => Ok(AstType::string()),
            AstNode::Reference(reference) => {
                Ok(AstType::reference(self.lookup(&reference.name)?.clone()))
            }
            AstNode::List(list) => self.determine_list(list),
            AstNode::Lambda(lambda) => Ok(AstType::function(lambda.function_entry())),
            AstNode::Variable(variable) => self.lookup(&variable.name).cloned(),
            AstNode::Call(call) => self.determine_call(call, node),
            AstNode::Member(member) => self.determine_member(member, node),
            AstNode::Declaration(declaration) => Ok(declaration.ty.clone()),
            AstNode::Assignment(assignment) => {
                self.determine_target(&assignment.target, node)?;
                self.determine(&assignment.value)
            }
            AstNode::Return(ret) => match &ret.value {
                Some(value) => self.determine(value),
                None => Ok(AstType::void()),
            },
            AstNode::Invalid(invalid) => Err(TypeError::InvalidExpression {
                text: invalid.fragment.clone(),
            }),
        }
    }

    fn determine_list(&self, list: &ListLiteral) -> Result<AstType, TypeError> {
        if list.elements.is_empty() {
            return Ok(AstType::list(AstType::any()));
        }

        let mut element = AstType::union_base();
        for item in &list.elements {
            element = element.union(&self.determine(item)?);
        }
        Ok(AstType::list(element))
    }

    fn determine_call(&self, call: &Call, node: &AstNode) -> Result<AstType, TypeError> {
        let callee = self.determine(&call.callee)?;
        if callee.is_any() {
            return Ok(AstType::any());
        }
        if callee.is_union_base() {
            return Err(TypeError::EmptyCallee {
                node: node.to_string(),
            });
        }

        let infers_generics = call.generics.is_empty()
            && callee.entries().iter().any(
                |entry| matches!(entry, TypeEntry::Function(function) if !function.generic_names.is_empty()),
            );
        let arg_types = if infers_generics {
            call.args
                .iter()
                .map(|arg| self.determine(arg))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        let mut result = AstType::union_base();
        for entry in callee.entries() {
            let TypeEntry::Function(function) = entry else {
                return Err(TypeError::NotCallable {
                    callee: callee.clone(),
                    node: node.to_string(),
                });
            };

            if !call.generics.is_empty() && call.generics.len() != function.generic_names.len() {
                return Err(TypeError::GenericArity {
                    expected: function.generic_names.len(),
                    found: call.generics.len(),
                    node: node.to_string(),
                });
            }
            if function.generic_names.is_empty() {
                result = result.union(&function.return_type);
                continue;
            }

            let bindings = if call.generics.is_empty() {
                assign_generics(function, &AstType::union_base(), &arg_types)?
            } else {
                call.generics.clone()
            };

            let subst = Substitution::from_bindings(&function.generic_names, &bindings);
            result = result.union(&subst.apply(&function.return_type));
        }

        Ok(result)
    }

    fn determine_member(&self, member: &MemberAccess, node: &AstNode) -> Result<AstType, TypeError> {
        let parent = self.determine(&member.parent)?;
        if parent.is_any() {
            return Ok(AstType::any());
        }

        let unknown = || TypeError::UnknownMember {
            owner: parent.clone(),
            member: member.name.clone(),
            node: node.to_string(),
        };

        let mut result = AstType::union_base();
        for entry in parent.entries() {
            let ty = self
                .env
                .lookup_member(entry.name(), &member.name)
                .ok_or_else(unknown)?;
            result = result.union(ty);
        }

        if result.is_union_base() {
            return Err(unknown());
        }
        Ok(result)
    }

    /// Type of the storage an assignment writes to.
    fn determine_target(&self, target: &AssignTarget, node: &AstNode) -> Result<AstType, TypeError> {
        match target {
            AssignTarget::Variable(name) => self.lookup(name).cloned(),
            AssignTarget::Member(member) => self.determine_member(member, node),
            AssignTarget::Dereference(name) => {
                let ty = self.lookup(name)?;
                if ty.is_any() {
                    return Ok(AstType::any());
                }
                match ty.single_entry() {
                    Some(TypeEntry::Named(named)) if named.name == REFERENCE && named.generics.len() == 1 => {
                        Ok(named.generics[0].clone())
                    }
                    Some(_) => Err(TypeError::NotAReference {
                        ty: ty.clone(),
                        node: node.to_string(),
                    }),
                    None => Err(TypeError::NotSingleEntry { ty: ty.clone() }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Lambda, NumberLiteral, StringLiteral, Variable};
    use crate::types::{FunctionEntry, Parameter};

    fn number(value: f64) -> AstNode {
        AstNode::Number(NumberLiteral { value })
    }

    fn string(value: &str) -> AstNode {
        AstNode::String(StringLiteral {
            value: value.to_string(),
        })
    }

    fn var(name: &str) -> AstNode {
        AstNode::Variable(Variable {
            name: name.to_string(),
        })
    }

    fn call(callee: AstNode, args: Vec<AstNode>) -> AstNode {
        AstNode::Call(Call {
            callee: Box::new(callee),
            args,
            generics: vec![],
        })
    }

    #[test]
    fn test_literals() {
        let env = TypeEnvironment::empty();
        assert_eq!(determine_type(&number(1.0), &env), Ok(AstType::number()));
        assert_eq!(determine_type(&string("a"), &env), Ok(AstType::string()));
    }

    #[test]
    fn test_list_is_union_of_elements() {
        let env = TypeEnvironment::empty();
        let list = AstNode::List(ListLiteral {
            elements: vec![number(1.0), string("a"), number(2.0)],
        });
        assert_eq!(
            determine_type(&list, &env),
            Ok(AstType::list(AstType::number() | AstType::string()))
        );
    }

    #[test]
    fn test_empty_list_is_any() {
        let env = TypeEnvironment::empty();
        let list = AstNode::List(ListLiteral { elements: vec![] });
        assert_eq!(determine_type(&list, &env), Ok(AstType::list(AstType::any())));
    }

    #[test]
    fn test_unbound_variable() {
        let env = TypeEnvironment::empty();
        assert_eq!(
            determine_type(&var("x"), &env),
            Err(TypeError::unbound_variable("x"))
        );
    }

    #[test]
    fn test_lambda_type() {
        let env = TypeEnvironment::empty();
        let lambda = AstNode::Lambda(Lambda {
            generics: vec![],
            params: vec![Parameter::new("x", AstType::number())],
            return_type: AstType::number(),
            explicit_return: false,
            creates_env: true,
            pure: false,
            varargs: false,
            body: vec![var("x")],
        });

        let ty = determine_type(&lambda, &env).unwrap();
        let Some(TypeEntry::Function(function)) = ty.single_entry() else {
            panic!("expected function type");
        };
        assert_eq!(function.params, vec![AstType::number()]);
        assert_eq!(
            function.environment,
            crate::types::EnvironmentMode::ForceEnvironment
        );
    }

    #[test]
    fn test_call_unions_return_types() {
        let f = AstType::function(FunctionEntry::new(vec![], AstType::number()))
            | AstType::function(
                FunctionEntry::new(vec![], AstType::string()).pure(),
            );
        let env = TypeEnvironment::with_bindings(vec![("f".to_string(), f)]);
        assert_eq!(
            determine_type(&call(var("f"), vec![]), &env),
            Ok(AstType::number() | AstType::string())
        );
    }

    #[test]
    fn test_call_non_function() {
        let env = TypeEnvironment::with_bindings(vec![("x".to_string(), AstType::number())]);
        let result = determine_type(&call(var("x"), vec![]), &env);
        assert!(matches!(result, Err(TypeError::NotCallable { .. })));
    }

    #[test]
    fn test_call_empty_callee() {
        let env = TypeEnvironment::with_bindings(vec![("x".to_string(), AstType::union_base())]);
        let result = determine_type(&call(var("x"), vec![]), &env);
        assert!(matches!(result, Err(TypeError::EmptyCallee { .. })));
    }

    #[test]
    fn test_call_on_any() {
        let env = TypeEnvironment::with_bindings(vec![("f".to_string(), AstType::any())]);
        assert_eq!(determine_type(&call(var("f"), vec![]), &env), Ok(AstType::any()));
    }

    #[test]
    fn test_generic_call_inferred_from_arguments() {
        let identity = FunctionEntry::new(vec![AstType::named("T")], AstType::named("T"))
            .with_generics(vec!["T".to_string()]);
        let env = TypeEnvironment::with_bindings(vec![(
            "identity".to_string(),
            AstType::function(identity),
        )]);
        assert_eq!(
            determine_type(&call(var("identity"), vec![string("s")]), &env),
            Ok(AstType::string())
        );
    }

    #[test]
    fn test_generic_call_with_explicit_arguments() {
        let make = FunctionEntry::new(vec![], AstType::list(AstType::named("T")))
            .with_generics(vec!["T".to_string()]);
        let env = TypeEnvironment::with_bindings(vec![("make".to_string(), AstType::function(make))]);

        let explicit = AstNode::Call(Call {
            callee: Box::new(var("make")),
            args: vec![],
            generics: vec![AstType::number()],
        });
        assert_eq!(
            determine_type(&explicit, &env),
            Ok(AstType::list(AstType::number()))
        );

        let inferred = call(var("make"), vec![]);
        assert!(matches!(
            determine_type(&inferred, &env),
            Err(TypeError::UnassignableGeneric { .. })
        ));
    }

    #[test]
    fn test_member_access() {
        let mut env = TypeEnvironment::with_bindings(vec![(
            "xs".to_string(),
            AstType::list(AstType::number()),
        )]);
        env.insert_member("list", "length", AstType::number());

        let member = AstNode::Member(MemberAccess {
            parent: Box::new(var("xs")),
            name: "length".to_string(),
        });
        assert_eq!(determine_type(&member, &env), Ok(AstType::number()));

        let missing = AstNode::Member(MemberAccess {
            parent: Box::new(var("xs")),
            name: "size".to_string(),
        });
        assert!(matches!(
            determine_type(&missing, &env),
            Err(TypeError::UnknownMember { .. })
        ));
    }

    #[test]
    fn test_body_type_is_last_statement() {
        let env = TypeEnvironment::empty();
        assert_eq!(
            determine_body_type(&[number(1.0), string("a")], &env),
            Ok(AstType::string())
        );
        assert_eq!(determine_body_type(&[], &env), Ok(AstType::void()));
    }
}
