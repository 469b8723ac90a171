use mlang::ast::AstNode;
use mlang::parser::{parse, parse_with_env};
use mlang::types::{
    AstType, TypeEnvironment, TypeError, default_environment, determine_body_type, determine_type,
};

fn type_of(text: &str, env: &mut TypeEnvironment) -> Result<AstType, TypeError> {
    let node = parse_with_env(text, env)?;
    assert!(!node.is_invalid(), "`{}` parsed as invalid", text);
    determine_type(&node, env)
}

#[test]
fn literal_types() {
    let mut env = TypeEnvironment::empty();
    assert_eq!(type_of("5", &mut env), Ok(AstType::number()));
    assert_eq!(type_of("\"s\"", &mut env), Ok(AstType::string()));
    assert_eq!(type_of("{}", &mut env), Ok(AstType::list(AstType::any())));
    assert_eq!(
        type_of("{1,\"a\"}", &mut env),
        Ok(AstType::list(AstType::number() | AstType::string()))
    );
}

#[test]
fn nested_lists_merge_element_types() {
    let mut env = TypeEnvironment::empty();
    assert_eq!(
        type_of("{{1},{\"a\"}}", &mut env),
        Ok(AstType::list(AstType::list(AstType::number() | AstType::string())))
    );
}

#[test]
fn lambda_type_is_function_entry() {
    let mut env = TypeEnvironment::empty();
    let ty = type_of("(x:number)=>{x}", &mut env).unwrap();
    assert_eq!(ty.to_string(), "(number[])!=>number[]");

    let ty = type_of("(x:number)~>{x}", &mut env).unwrap();
    assert_eq!(ty.to_string(), "(number[])!~>number[]");
}

#[test]
fn generic_call_is_inferred() {
    let mut env = default_environment();
    assert_eq!(type_of("identity(5)", &mut env), Ok(AstType::number()));
    assert_eq!(
        type_of("identity<string>(\"s\")", &mut env),
        Ok(AstType::string())
    );
}

#[test]
fn generic_arity_is_checked() {
    let mut env = default_environment();
    assert!(matches!(
        type_of("identity<string,number>(\"s\")", &mut env),
        Err(TypeError::GenericArity { expected: 1, found: 2, .. })
    ));
}

#[test]
fn type_arguments_on_non_generic_callee_are_rejected() {
    let mut env = default_environment();
    assert!(matches!(
        type_of("_add<number>(1,2)", &mut env),
        Err(TypeError::GenericArity { expected: 0, found: 1, .. })
    ));
    assert!(matches!(
        type_of("((x)=>{x})<number>(5)", &mut env),
        Err(TypeError::GenericArity { expected: 0, found: 1, .. })
    ));
}

#[test]
fn call_on_untyped_parameter_is_any() {
    let mut env = TypeEnvironment::empty();
    let ty = type_of("(f)=>{f(1)}", &mut env).unwrap();
    assert_eq!(ty.to_string(), "(any[])!=>any[]");
}

#[test]
fn calling_a_union_of_functions() {
    let mut env = TypeEnvironment::empty();
    env.insert(
        "f",
        mlang::parser::parse_type("(()=>number)|(()=>string)").unwrap(),
    );
    assert_eq!(
        type_of("f()", &mut env),
        Ok(AstType::number() | AstType::string())
    );
}

#[test]
fn calling_a_number_fails() {
    let mut env = default_environment();
    type_of("var n = 1", &mut env).unwrap();
    let err = type_of("n()", &mut env).unwrap_err();
    assert!(matches!(err, TypeError::NotCallable { .. }));
    assert!(err.to_string().contains("cannot call a non-function"));
}

#[test]
fn unknown_member() {
    let mut env = default_environment();
    assert!(matches!(
        type_of("{1}.size", &mut env),
        Err(TypeError::UnknownMember { .. })
    ));
    assert_eq!(type_of("{1}.length", &mut env), Ok(AstType::number()));
}

#[test]
fn body_type_uses_last_statement() {
    let mut env = TypeEnvironment::empty();
    let AstNode::Lambda(lambda) = parse_with_env("()~>{return 5;\"s\";}", &mut env).unwrap() else {
        panic!("expected lambda");
    };
    assert_eq!(determine_body_type(&lambda.body, &env), Ok(AstType::string()));
    assert_eq!(determine_body_type(&[], &env), Ok(AstType::void()));
}

#[test]
fn invalid_node_has_no_type() {
    let node = parse("5 5").unwrap();
    assert!(matches!(
        determine_type(&node, &TypeEnvironment::empty()),
        Err(TypeError::InvalidExpression { .. })
    ));
}
