use chatcommand::command::{bind, ArgKind, ArgValue, ParseError, Schema};

const STATS: [&str; 5] = ["str", "agi", "vit", "ene", "cmd"];

fn candidates() -> Vec<String> {
    let mut out: Vec<String> = STATS.iter().map(|s| s.to_string()).collect();
    out.extend(STATS.iter().map(|s| s.to_uppercase()));
    out.extend(STATS.iter().map(|s| format!("{}x", s)));
    out.extend(STATS.iter().map(|s| s[..2].to_string()));
    out.extend(["", "luck", "strength", "1", "-", "énergie", "\u{0441}tr"].iter().map(|s| s.to_string()));
    out
}

#[test]
fn choice_binding_never_escapes_the_allowed_set() {
    let schema = Schema::builder()
        .choice("stat", &STATS)
        .required("amount", ArgKind::Unsigned)
        .build()
        .unwrap();

    for token in candidates() {
        let input = format!("{} 5", token);
        match bind(&schema, &input) {
            Ok(args) => match args.get("stat") {
                Some(ArgValue::Choice(v)) => assert!(STATS.contains(&v.as_str()), "bound {} from {}", v, token),
                other => panic!("unexpected binding {:?} for {}", other, token),
            },
            Err(ParseError::ArgumentNotInAllowedSet { field, allowed }) => {
                assert_eq!(field, "stat");
                assert_eq!(allowed, STATS.to_vec());
            }
            // An empty token leaves "5" in the stat position.
            Err(other) => assert!(token.is_empty(), "unexpected error {:?} for '{}'", other, token),
        }
    }
}

#[test]
fn binding_is_deterministic() {
    let schema = Schema::builder()
        .required("character", ArgKind::Str)
        .required("map", ArgKind::Str)
        .required("position", ArgKind::Coordinate)
        .optional("silent", ArgKind::Boolean)
        .build()
        .unwrap();

    for input in ["Bob lorencia 130 125", "Bob lorencia 130 125 yes", "Bob lorencia 130", "Bob lorencia x y"] {
        assert_eq!(bind(&schema, input), bind(&schema, input));
    }
}

#[test]
fn unsigned_rejects_anything_but_ascii_digits() {
    let schema = Schema::builder().required("amount", ArgKind::Unsigned).build().unwrap();
    for bad in ["-1", "+1", "1.5", "1e3", "0x10", "٣", "4294967296"] {
        assert_eq!(
            bind(&schema, bad),
            Err(ParseError::ArgumentInvalidType {
                field: "amount".to_string(),
                raw: bad.to_string(),
            }),
            "{} should be rejected",
            bad
        );
    }
    assert_eq!(bind(&schema, "4294967295").unwrap().unsigned("amount").unwrap(), u32::MAX);
}
