use mlang::ast::{AssignTarget, AstNode, Declaration, Lambda};
use mlang::parser::{parse, parse_program, parse_with_env};
use mlang::types::{AstType, TypeEnvironment, TypeError, default_environment, determine_type};

fn lambda(node: &AstNode) -> &Lambda {
    match node {
        AstNode::Lambda(lambda) => lambda,
        other => panic!("expected lambda, got {:?}", other),
    }
}

fn parse_ok(text: &str) -> AstNode {
    let node = parse(text).expect("type error");
    assert!(!node.is_invalid(), "`{}` parsed as invalid: {:?}", text, node);
    node
}

#[test]
fn lambda_return_type_mismatch_is_invalid() {
    let node = parse("():string=>{5}").unwrap();
    let AstNode::Invalid(invalid) = node else {
        panic!("expected invalid node");
    };
    assert_eq!(invalid.text, "():string=>{5}");
}

#[test]
fn lambda_returning_list_literal() {
    let node = parse_ok("():list[number]=>{{1,2,3}}");
    let lambda = lambda(&node);
    assert_eq!(lambda.return_type, AstType::list(AstType::number()));
    assert!(lambda.explicit_return);
    assert_eq!(lambda.body.len(), 1);
}

#[test]
fn arrow_stem_decides_environment() {
    assert!(lambda(&parse_ok("(x)=>{x}")).creates_env);
    assert!(!lambda(&parse_ok("(x)~>{x}")).creates_env);
    assert!(lambda(&parse_ok("[T](x:T)=>{x}")).creates_env);
    assert!(!lambda(&parse_ok("()~>{}")).creates_env);
}

#[test]
fn declaration_in_shared_lambda_leaks() {
    let mut env = TypeEnvironment::empty();
    parse_with_env("()~>{var y = 5}", &mut env).unwrap();
    assert_eq!(env.lookup("y"), Some(&AstType::number()));
}

#[test]
fn declaration_in_isolated_lambda_stays_inside() {
    let mut env = TypeEnvironment::empty();
    parse_with_env("(p)=>{var y = 5}", &mut env).unwrap();
    assert!(!env.contains("y"));
    assert!(!env.contains("p"));
}

#[test]
fn shared_lambda_parameters_leak() {
    let mut env = TypeEnvironment::empty();
    parse_with_env("(p:string)~>{p}", &mut env).unwrap();
    assert_eq!(env.lookup("p"), Some(&AstType::string()));
}

#[test]
fn empty_body_is_void() {
    assert_eq!(lambda(&parse_ok("()=>{}")).return_type, AstType::void());
}

#[test]
fn multi_statement_body() {
    let node = parse_ok("(x:number)=>{var y = x; y;}");
    let lambda = lambda(&node);
    assert_eq!(lambda.body.len(), 2);
    assert_eq!(lambda.return_type, AstType::number());
}

#[test]
fn unterminated_statement_is_invalid() {
    assert!(parse("(x:number)=>{var y = x; y}").unwrap().is_invalid());
}

#[test]
fn variadic_lambda() {
    let node = parse_ok("(first, rest...)=>{rest}");
    let lambda = lambda(&node);
    assert!(lambda.varargs);
    assert_eq!(lambda.return_type, AstType::list(AstType::any()));
    assert!(parse("(rest:number...)=>{rest}").unwrap().is_invalid());
}

#[test]
fn simple_lambda_shorthand() {
    let node = parse_ok("[5]");
    let lambda = lambda(&node);
    assert!(lambda.params.is_empty());
    assert!(!lambda.creates_env);
    assert_eq!(lambda.return_type, AstType::number());
}

#[test]
fn generic_call_with_explicit_arguments() {
    let AstNode::Call(call) = parse_ok("identity<number>(5)") else {
        panic!("expected call");
    };
    assert_eq!(call.generics, vec![AstType::number()]);
    assert_eq!(call.args.len(), 1);
}

#[test]
fn call_on_parenthesized_lambda() {
    let AstNode::Call(call) = parse_ok("((x:number)=>{x})(5)") else {
        panic!("expected call");
    };
    assert!(matches!(*call.callee, AstNode::Lambda(_)));
}

#[test]
fn declarations_infer_call_types() {
    let mut env = default_environment();
    parse_with_env("var s = identity(\"text\")", &mut env).unwrap();
    parse_with_env("var n = _add(1, 2)", &mut env).unwrap();
    assert_eq!(env.lookup("s"), Some(&AstType::string()));
    assert_eq!(env.lookup("n"), Some(&AstType::number()));
}

#[test]
fn recursive_declaration_with_explicit_type() {
    let node = parse_ok("var f:(number)!=>number = (n:number)=>{f(n)}");
    let AstNode::Declaration(Declaration { declared, ty, .. }) = node else {
        panic!("expected declaration");
    };
    assert_eq!(declared, Some(ty));
}

#[test]
fn declared_type_mismatch_is_invalid() {
    assert!(parse("var x:string = 5").unwrap().is_invalid());
    assert!(parse("const var = 5").unwrap().is_invalid());
}

#[test]
fn member_access_on_string() {
    let mut env = default_environment();
    parse_with_env("var n = \"abc\".length", &mut env).unwrap();
    assert_eq!(env.lookup("n"), Some(&AstType::number()));
}

#[test]
fn return_statements() {
    assert!(matches!(parse_ok("return"), AstNode::Return(ret) if ret.value.is_none()));
    assert!(matches!(parse_ok("return 5"), AstNode::Return(ret) if ret.value.is_some()));
}

#[test]
fn assignment_through_reference() {
    let mut env = TypeEnvironment::empty();
    parse_with_env("var x = 5", &mut env).unwrap();
    parse_with_env("var p = &x", &mut env).unwrap();
    assert_eq!(env.lookup("p"), Some(&AstType::reference(AstType::number())));

    let node = parse_with_env("*p = 6", &mut env).unwrap();
    assert!(matches!(
        node,
        AstNode::Assignment(ref assignment) if matches!(assignment.target, AssignTarget::Dereference(_))
    ));

    let result = parse_with_env("*x = 6", &mut env);
    assert!(matches!(result, Err(TypeError::NotAReference { .. })));
}

#[test]
fn type_errors_propagate() {
    assert!(matches!(
        parse("()=>{unknown}"),
        Err(TypeError::UnboundVariable { .. })
    ));
    assert!(matches!(
        parse("var y = 5(1)"),
        Err(TypeError::NotCallable { .. })
    ));
}

#[test]
fn malformed_text_is_invalid() {
    for text in ["()", "{1,,2}", "f(", "(x)=>{x", "5 5", "x<number(1)", "var"] {
        let node = parse(text).unwrap();
        assert!(node.is_invalid(), "`{}` should be invalid", text);
    }
}

#[test]
fn redundant_parentheses_are_stripped() {
    assert_eq!(parse_ok("((5))"), parse_ok("5"));
}

#[test]
fn canonical_text_parses_back() {
    let env = default_environment();
    for text in [
        "(x:number)=>{x}",
        "[T](x:T):T=>{x}",
        "{1,\"a\",{2}}",
        "identity<number>(5)",
        "(x)~>{var y = x; y;}",
        "(first, rest...)=>{rest}",
        "\"line\\nbreak\"",
    ] {
        let first = parse_with_env(text, &mut env.clone()).unwrap();
        let printed = first.to_string();
        let second = parse_with_env(&printed, &mut env.clone()).unwrap();
        assert_eq!(first, second, "`{}` printed as `{}`", text, printed);
    }
}

#[test]
fn program_shares_environment() {
    let mut env = default_environment();
    let nodes = parse_program("var x = 5; var y = &x; y", &mut env).unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(
        determine_type(&nodes[2], &env),
        Ok(AstType::reference(AstType::number()))
    );
}

#[test]
fn rejected_declaration_leaves_environment_untouched() {
    let mut env = TypeEnvironment::empty();
    let nodes = parse_program("var x:string = 5; var y = 1", &mut env).unwrap();
    assert!(nodes[0].is_invalid());
    assert!(!env.contains("x"));
    assert_eq!(env.lookup("y"), Some(&AstType::number()));
}

#[test]
fn rejected_shared_lambda_leaves_environment_untouched() {
    let mut env = TypeEnvironment::empty();
    let node = parse_with_env("(p:string):number~>{var q = 1; p;}", &mut env).unwrap();
    assert!(node.is_invalid());
    assert!(!env.contains("p"));
    assert!(!env.contains("q"));

    parse_with_env("(p:string):string~>{var q = 1; p;}", &mut env).unwrap();
    assert_eq!(env.lookup("p"), Some(&AstType::string()));
    assert_eq!(env.lookup("q"), Some(&AstType::number()));
}
