use john::template::{lazy, range, record, NumericTemplate, Template, TemplateRef, STRING};
use john::{parse, parse_as, serialize, stringify};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: u32,
    friends: Vec<Person>,
}

static PERSON: Lazy<TemplateRef<Person>> = Lazy::new(|| {
    record(
        (
            STRING.property("name", |p: &Person| p.name.clone()),
            range(18.0, 65.0)
                .require_whole()
                .as_u32()
                .property("age", |p: &Person| p.age),
            lazy(|| PERSON.clone())
                .array()
                .property("friends", |p: &Person| p.friends.clone())
                .or_else_with(Vec::new),
        ),
        |(name, age, friends)| Person { name, age, friends },
    )
    .boxed()
});

fn marie() -> Person {
    Person {
        name: "Marie".to_owned(),
        age: 25,
        friends: Vec::new(),
    }
}

#[test]
fn absent_friends_default_to_empty() {
    let person = parse_as(r#"{"name":"Marie","age":25}"#, &*PERSON).unwrap();
    assert_eq!(person, marie());
}

#[test]
fn defaulted_friends_are_still_written() {
    let element = serialize(&marie(), &*PERSON).unwrap();
    assert_eq!(
        stringify(&element, 0),
        r#"{"name":"Marie","age":25,"friends":[]}"#
    );
}

#[test]
fn age_out_of_range_is_located() {
    let error = parse_as(r#"{"name":"Marie","age":17}"#, &*PERSON).unwrap_err();
    assert_eq!(
        error.message(),
        "Expected a value that would satisfy the template of type '18..65'."
    );
    let span = error.span().unwrap();
    assert_eq!((span.start(), span.end()), (23, 24));
}

#[test]
fn fractional_age_is_an_error() {
    let error = parse_as(r#"{"name":"Marie","age":25.5}"#, &*PERSON).unwrap_err();
    assert_eq!(
        error.message(),
        "Expected the number to not include a fractional part."
    );
}

#[test]
fn deeply_nested_friends_round_trip() {
    let mut person = marie();
    for depth in 0..5 {
        person = Person {
            name: format!("Friend {depth}"),
            age: 30 + depth,
            friends: vec![person, marie()],
        };
    }

    let element = serialize(&person, &*PERSON).unwrap();
    assert_eq!(
        element
            .get("friends[0]/friends[0]/friends[0]/friends[0]/friends[0]/name")
            .unwrap()
            .as_str(),
        Some("Marie")
    );

    let text = stringify(&element, 2);
    let parsed = parse_as(&text, &*PERSON).unwrap();
    assert_eq!(parsed, person);
    assert_eq!(parse(&text).unwrap(), element);
}

#[test]
fn nested_errors_point_into_the_nested_friend() {
    let source = r#"{"name":"A","age":30,"friends":[{"name":"B","age":30,"friends":[{"name":7,"age":30}]}]}"#;
    let error = parse_as(source, &*PERSON).unwrap_err();
    assert_eq!(
        error.message(),
        "Expected a value that would satisfy the template of type 'string'."
    );
    assert_eq!(error.span().map(|span| span.start()), Some(73));
}

#[test]
fn recursive_name_terminates() {
    assert_eq!(
        PERSON.name(),
        "{ name: string, age: 18..65, friends?: ...[] }"
    );
}
