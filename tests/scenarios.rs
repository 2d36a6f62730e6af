use john::template::{literal, union, Template, NUMBER};
use john::{parse, stringify, ErrorKind, Outcome, Path};
use rstest::rstest;

#[test]
fn object_keys_keep_their_order() {
    let element = parse(r#"{"a":1,"b":[true,null]}"#).unwrap();

    let keys: Vec<_> = element.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(element.property("a").unwrap().as_f64(), Some(1.0));
    assert_eq!(
        element.property("b").unwrap().subscript(0).unwrap().as_bool(),
        Some(true)
    );
    assert!(element.get("b[1]").unwrap().is_null());

    assert_eq!(stringify(&element, 0), r#"{"a":1,"b":[true,null]}"#);
}

#[test]
fn missing_value_points_past_the_colon() {
    let error = parse(r#"{"a": }"#).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.message(), "Encountered an unexpected lexeme '}'.");
    let span = error.span().unwrap();
    assert_eq!((span.line(), span.start(), span.end()), (1, 7, 7));
    assert_eq!(error.to_string(), "(1:7-7) Encountered an unexpected lexeme '}'.");
}

#[rstest]
#[case(r#"{"a":{"b":[10,20]}}"#, "a/b[0]", 10.0)]
#[case(r#"{"a":{"b":[10,20]}}"#, "a/b[1]", 20.0)]
#[case(r#"{"a":{"b":[10,20]}}"#, "./a/b[1]/", 20.0)]
#[case(r#"{"a.b":[[1,2],[3]]}"#, "'a.b'[1][0]", 3.0)]
#[case(r#"{"a.b":3}"#, r"a\.b", 3.0)]
fn paths_resolve(#[case] source: &str, #[case] path: &str, #[case] expected: f64) {
    let element = parse(source).unwrap();
    assert_eq!(element.get(path).unwrap().as_f64(), Some(expected));
}

#[test]
fn out_of_range_subscript_is_located_at_the_array() {
    let element = parse(r#"{"a":{"b":[]}}"#).unwrap();
    let error = Path::compile("a/b[0]").unwrap().traverse(&element).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IndexOutOfRange);
    assert_eq!(error.span().map(|span| span.start()), Some(11));
}

#[test]
fn union_prefers_the_first_matching_literal() {
    let method = union([literal("GET").boxed(), literal("POST").boxed()]);

    assert_eq!(
        method.parse(&parse(r#""POST""#).unwrap()),
        Outcome::Success("POST".to_owned())
    );

    let element = parse(r#"  "PUT""#).unwrap();
    assert!(method.parse(&element).is_mismatch());
    let outcome = method.parse_and_promote(&element);
    assert_eq!(
        outcome.message(),
        r#"Expected a value that would satisfy the template of type '"GET" | "POST"'."#
    );
    assert_eq!(outcome.span().map(|span| span.start()), Some(3));
}

#[test]
fn union_order_decides_overlapping_alternatives() {
    let doubled = NUMBER.map(|n| n * 2.0, |n| n / 2.0).boxed();
    let plain = NUMBER.boxed();
    let element = parse("3").unwrap();

    assert_eq!(
        union([doubled.clone(), plain.clone()]).parse(&element),
        Outcome::Success(6.0)
    );
    assert_eq!(union([plain, doubled]).parse(&element), Outcome::Success(3.0));
}
