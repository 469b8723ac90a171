use log::debug;

use super::ast_type::{AstType, FunctionEntry};
use super::error::TypeError;

/// One resolved type per declared generic name, in declaration order.
pub type GenericBindingList = Vec<AstType>;

/// Solve the generic names of `function` from the types seen at a call site.
///
/// # Algorithm
///
/// Only *standalone* occurrences of a generic name are used: a declared
/// parameter (or return) type that is exactly the bare name `T`. The actual
/// type found in that slot is added to `T`'s binding with the union operator.
///
/// ```text
/// [T](T)=>number   called with (string), return context number
///   slot 0: declared T, actual string   → T := string
///   binding: [string]
///
/// [T](T)=>T        called with (string), return context number
///   slot 0: declared T, actual string   → T := string
///   return: declared T, actual number   → T := string|number
///   binding: [string|number]
/// ```
///
/// # Rejections
///
/// - A declared return type or an actual argument type that is a
///   multi-entry union mentioning a generic name (`T|number`) cannot be
///   split between `T` and the rest, so the call needs explicit generic
///   arguments.
/// - A generic name that has no standalone occurrence stays at the union
///   base and cannot be assigned.
///
/// Passing the union base as `actual_return` means "no return context": it
/// is the identity of the union and adds nothing to a binding.
pub fn assign_generics(
    function: &FunctionEntry,
    actual_return: &AstType,
    actual_params: &[AstType],
) -> Result<GenericBindingList, TypeError> {
    if function.generic_names.is_empty() {
        return Ok(Vec::new());
    }

    for generic in &function.generic_names {
        let inspected = actual_params
            .iter()
            .chain(std::iter::once(&function.return_type));
        for ty in inspected {
            if ty.is_union_mentioning(generic) {
                return Err(TypeError::AmbiguousGeneric {
                    generic: generic.clone(),
                    ty: ty.clone(),
                });
            }
        }
    }

    let mut bindings = Vec::with_capacity(function.generic_names.len());
    for generic in &function.generic_names {
        let mut binding = AstType::union_base();

        for (declared, actual) in function.params.iter().zip(actual_params) {
            if declared.is_single_named(generic) {
                binding = binding.union(actual);
            }
        }
        if function.return_type.is_single_named(generic) {
            binding = binding.union(actual_return);
        }

        if binding.is_union_base() {
            return Err(TypeError::UnassignableGeneric {
                generic: generic.clone(),
            });
        }

        debug!("assigned generic {} := {}", generic, binding);
        bindings.push(binding);
    }

    Ok(bindings)
}
