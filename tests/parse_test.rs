// Integration tests for the declaration parser

use cdecl::parser::parse::{ParseErrorKind, Parser};
use cdecl::parser::parse_decls;
use cdecl::parser::types::{ArrayLen, Param, Type};
use rustc_hash::FxHashMap;

fn parse(content: &str) -> FxHashMap<String, Type> {
    Parser::new(content)
        .expect("lexing failed")
        .parse()
        .expect("parsing failed")
}

fn parse_err(content: &str) -> ParseErrorKind {
    Parser::new(content)
        .and_then(Parser::parse)
        .expect_err("expected a parse failure")
        .kind
}

fn param(ty: Type, name: &str) -> Param {
    Param {
        ty,
        name: Some(name.to_string()),
    }
}

#[test]
fn test_scalar_declaration() {
    let decls = parse("int a;");

    assert_eq!(decls.len(), 1);
    assert_eq!(decls["a"], Type::Int);
}

#[test]
fn test_pointer_declaration() {
    let decls = parse("int *p;");

    assert_eq!(decls["p"], Type::pointer_to(Type::Int));
}

#[test]
fn test_unspecified_array() {
    let decls = parse("int a[];");

    assert_eq!(
        decls["a"],
        Type::array_of(Type::Int, ArrayLen::Unspecified)
    );
}

#[test]
fn test_array_of_pointer() {
    // suffixes bind tighter than prefix pointers
    let decls = parse("int *a[];");

    assert_eq!(
        decls["a"],
        Type::array_of(Type::pointer_to(Type::Int), ArrayLen::Unspecified)
    );
}

#[test]
fn test_pointer_to_array() {
    // parenthesisation inverts the unparenthesised nesting order
    let decls = parse("int (*a)[];");

    assert_eq!(
        decls["a"],
        Type::pointer_to(Type::array_of(Type::Int, ArrayLen::Unspecified))
    );
}

#[test]
fn test_array_of_array() {
    let decls = parse("int a[][];");

    assert_eq!(
        decls["a"],
        Type::array_of(
            Type::array_of(Type::Int, ArrayLen::Unspecified),
            ArrayLen::Unspecified
        )
    );
}

#[test]
fn test_array_of_pointer_to_array() {
    let decls = parse("int (*a[])[];");

    assert_eq!(
        decls["a"],
        Type::array_of(
            Type::pointer_to(Type::array_of(
                Type::Int,
                ArrayLen::Unspecified
            )),
            ArrayLen::Unspecified
        )
    );
}

#[test]
fn test_function_with_void_parameter_list() {
    let decls = parse("int foo(void);");

    assert_eq!(decls["foo"], Type::function(Type::Int, Vec::new()));
}

#[test]
fn test_function_with_named_parameters() {
    let decls = parse("int foo(char c, long l);");

    assert_eq!(
        decls["foo"],
        Type::function(
            Type::Int,
            vec![param(Type::Char, "c"), param(Type::Long, "l")]
        )
    );
}

#[test]
fn test_pointer_to_function() {
    let decls = parse("int (*pf)(short s, uint64_t u);");

    assert_eq!(
        decls["pf"],
        Type::pointer_to(Type::function(
            Type::Int,
            vec![param(Type::Short, "s"), param(Type::U64, "u")]
        ))
    );
}

#[test]
fn test_pointer_to_function_returning_pointer_to_array() {
    let decls = parse("int (*(*pf)(double d))[3];");

    assert_eq!(
        decls["pf"],
        Type::pointer_to(Type::function(
            Type::pointer_to(Type::array_of(Type::Int, ArrayLen::Literal(3))),
            vec![param(Type::Double, "d")]
        ))
    );
}

#[test]
fn test_multi_declarator_statement() {
    let decls =
        parse("int a, *p, arr[], *arrp[], (*parr)[], aarr[][], (*arrparr[])[];");

    assert_eq!(decls.len(), 7);
    assert_eq!(decls["a"], Type::Int);
    assert_eq!(decls["p"], Type::pointer_to(Type::Int));
    assert_eq!(
        decls["arr"],
        Type::array_of(Type::Int, ArrayLen::Unspecified)
    );
    assert_eq!(
        decls["arrp"],
        Type::array_of(Type::pointer_to(Type::Int), ArrayLen::Unspecified)
    );
    assert_eq!(
        decls["parr"],
        Type::pointer_to(Type::array_of(Type::Int, ArrayLen::Unspecified))
    );
    assert_eq!(
        decls["aarr"],
        Type::array_of(
            Type::array_of(Type::Int, ArrayLen::Unspecified),
            ArrayLen::Unspecified
        )
    );
    assert_eq!(
        decls["arrparr"],
        Type::array_of(
            Type::pointer_to(Type::array_of(
                Type::Int,
                ArrayLen::Unspecified
            )),
            ArrayLen::Unspecified
        )
    );
}

#[test]
fn test_typedef_substitution() {
    let content = "
    typedef int (*func_t)(char c, long l);
    int foo(func_t pf, int i);
    ";
    let decls = parse(content);

    // the typedef itself is not a declaration
    assert_eq!(decls.len(), 1);

    let func_t = Type::pointer_to(Type::function(
        Type::Int,
        vec![param(Type::Char, "c"), param(Type::Long, "l")],
    ));
    assert_eq!(
        decls["foo"],
        Type::function(
            Type::Int,
            vec![param(func_t, "pf"), param(Type::Int, "i")]
        )
    );
}

#[test]
fn test_typedef_of_array() {
    let content = "
    typedef uint8_t buf_t[16];
    buf_t b;
    ";
    let decls = parse(content);

    assert_eq!(
        decls["b"],
        Type::array_of(Type::U8, ArrayLen::Literal(16))
    );
}

#[test]
fn test_qualifiers_are_ignored() {
    let decls = parse("const unsigned long *p;");

    assert_eq!(decls["p"], Type::pointer_to(Type::ULong));
}

#[test]
fn test_literal_array_lengths() {
    let decls = parse("int a[3];");
    assert_eq!(decls["a"], Type::array_of(Type::Int, ArrayLen::Literal(3)));

    let decls = parse("int a[3][4];");
    assert_eq!(
        decls["a"],
        Type::array_of(
            Type::array_of(Type::Int, ArrayLen::Literal(4)),
            ArrayLen::Literal(3)
        )
    );
}

#[test]
fn test_zero_length_array_is_not_unspecified() {
    let decls = parse("int a[0];");

    assert_eq!(decls["a"], Type::array_of(Type::Int, ArrayLen::Literal(0)));
}

#[test]
fn test_named_array_length_in_parameter_list() {
    let decls = parse("int foo(size_t sz, int data[sz]);");

    assert_eq!(
        decls["foo"],
        Type::function(
            Type::Int,
            vec![
                param(Type::Size, "sz"),
                param(
                    Type::array_of(
                        Type::Int,
                        ArrayLen::Named("sz".to_string())
                    ),
                    "data"
                ),
            ]
        )
    );
}

#[test]
fn test_lex_error_on_initializer() {
    let err = Parser::new("int a = 1;").expect_err("'=' must not lex");

    assert_eq!(err.kind, ParseErrorKind::Lex);
}

#[test]
fn test_invalid_type_combination() {
    let content = "
    int a;
    int *p;
    int arr[];
    unsigned short long int b;
    ";
    assert_eq!(parse_err(content), ParseErrorKind::InvalidTypeCombination);
}

#[test]
fn test_missing_comma_between_declarators() {
    let content = "
    int a;
    int *p;
    int arr[];
    int b c;
    ";
    assert_eq!(parse_err(content), ParseErrorKind::ExpectedToken);
}

#[test]
fn test_missing_identifier() {
    let content = "
    int a;
    int *p;
    int arr[];
    int (*)(char c);
    ";
    assert_eq!(parse_err(content), ParseErrorKind::MissingIdentifier);
}

#[test]
fn test_missing_typedef_name() {
    let content = "
    int a;
    int *p;
    int arr[];
    typedef int (*)(char c);
    ";
    assert_eq!(parse_err(content), ParseErrorKind::MissingIdentifier);
}

#[test]
fn test_unknown_typename() {
    let content = "
    int a;
    int *p;
    int arr[];
    my_special_t b;
    ";
    assert_eq!(parse_err(content), ParseErrorKind::UnrecognisedTypename);
}

#[test]
fn test_named_array_length_outside_parameter_list() {
    assert_eq!(
        parse_err("int a[ags];"),
        ParseErrorKind::NonLiteralArrayLength
    );
}

#[test]
fn test_named_array_length_without_matching_parameter() {
    assert_eq!(
        parse_err("int foo(size_t sz, int data[abc]);"),
        ParseErrorKind::UnresolvedArrayLengthParameter
    );
}

#[test]
fn test_named_array_length_must_precede() {
    // the referenced parameter has to come before the array parameter
    assert_eq!(
        parse_err("int foo(int data[sz], size_t sz);"),
        ParseErrorKind::UnresolvedArrayLengthParameter
    );
}

#[test]
fn test_batch_failure_does_not_poison_batch() {
    let inputs = vec![
        "int a;".to_string(),
        "unsigned short long int b;".to_string(),
        "char c;".to_string(),
    ];
    let decls = parse_decls(&inputs);

    assert_eq!(decls.len(), 2);
    assert_eq!(decls["a"], Type::Int);
    assert_eq!(decls["c"], Type::Char);
}

#[test]
fn test_batch_collision_overwrites() {
    let inputs = vec!["int x;".to_string(), "char x;".to_string()];
    let decls = parse_decls(&inputs);

    assert_eq!(decls.len(), 1);
    assert_eq!(decls["x"], Type::Char);
}

#[test]
fn test_typedefs_do_not_cross_inputs() {
    // each input is parsed independently; typedefs are local to one input
    let inputs = vec![
        "typedef int my_t;".to_string(),
        "my_t x;".to_string(),
    ];
    let decls = parse_decls(&inputs);

    assert!(decls.is_empty());
}

#[test]
fn test_macro_substitution_before_parsing() {
    let inputs =
        vec!["#define ARR_LEN 3\nint foo(int src[ARR_LEN]);".to_string()];
    let decls = parse_decls(&inputs);

    assert_eq!(
        decls["foo"],
        Type::function(
            Type::Int,
            vec![param(
                Type::array_of(Type::Int, ArrayLen::Literal(3)),
                "src"
            )]
        )
    );
}

#[test]
fn test_commented_array_length_annotation() {
    let inputs = vec![
        "int foo(size_t sz, int src[/*sz*/], int dst[ /* sz */ ]);"
            .to_string(),
    ];
    let decls = parse_decls(&inputs);

    let named_array =
        Type::array_of(Type::Int, ArrayLen::Named("sz".to_string()));
    assert_eq!(
        decls["foo"],
        Type::function(
            Type::Int,
            vec![
                param(Type::Size, "sz"),
                param(named_array.clone(), "src"),
                param(named_array, "dst"),
            ]
        )
    );
}

#[test]
fn test_typedef_enum_blocks_are_skipped() {
    let inputs = vec![
        "int foo(int i);\ntypedef enum {\n ONE = 1,\n TWO = 2,\n} my_enum_t;\nint bar(int i);"
            .to_string(),
    ];
    let decls = parse_decls(&inputs);

    assert_eq!(decls.len(), 2);
    assert_eq!(
        decls["foo"],
        Type::function(Type::Int, vec![param(Type::Int, "i")])
    );
    assert_eq!(
        decls["bar"],
        Type::function(Type::Int, vec![param(Type::Int, "i")])
    );
}
