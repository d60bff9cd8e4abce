use request_params::{
    extract_params, parse_rules, Extractor, Params, PassthroughSanitizer, RuleSpec, Value,
    DECIMAL_FALLBACK, INT_SENTINEL,
};

fn input(entries: &[(&str, Value)]) -> Params {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn zero_rules_is_identity() {
    let params = input(&[("a", Value::from("<b>x</b>")), ("n", Value::Int(3))]);

    assert_eq!(extract_params(&params, ""), params);
    assert_eq!(extract_params(&params, Vec::<String>::new()), params);
    assert_eq!(extract_params(&params, "#only, i:, @default:1"), params);
    assert_eq!(
        extract_params(&params, RuleSpec::from_value(&Value::Int(1))),
        params
    );
}

#[test]
fn missing_string_is_empty_string() {
    let output = extract_params(&Params::new(), "title");

    assert_eq!(output.get("title"), Some(&Value::from("")));
}

#[test]
fn int_default_value_and_sentinel() {
    let rule = "i:age@default:30";

    assert_eq!(
        extract_params(&Params::new(), rule).get("age"),
        Some(&Value::Int(30))
    );
    assert_eq!(
        extract_params(&input(&[("age", Value::from("41"))]), rule).get("age"),
        Some(&Value::Int(41))
    );
    assert_eq!(
        extract_params(&input(&[("age", Value::from("abc"))]), "i:age").get("age"),
        Some(&Value::Int(INT_SENTINEL))
    );
}

#[test]
fn decimal_prefixes_are_equivalent() {
    let priced = input(&[("price", Value::from("19.5"))]);

    for rule in ["d:price", "f:price"] {
        assert_eq!(
            extract_params(&priced, rule).get("price"),
            Some(&Value::from("19.50"))
        );
        assert_eq!(
            extract_params(&Params::new(), rule).get("price"),
            Some(&Value::from(DECIMAL_FALLBACK))
        );
    }
}

#[test]
fn array_decoding() {
    let tags = input(&[("tags", Value::from("[1,2,3]"))]);
    let junk = input(&[("tags", Value::from("not json"))]);

    assert_eq!(
        extract_params(&tags, "a:tags").get("tags"),
        Some(&Value::Sequence(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3)
        ]))
    );
    assert_eq!(
        extract_params(&junk, "a:tags").get("tags"),
        Some(&Value::Sequence(Vec::new()))
    );
}

#[test]
fn rename_with_and_without_sanitizing() {
    let named = input(&[("name", Value::from("<b>Al</b>"))]);

    let stripped = extract_params(&named, "name#fullName");
    assert_eq!(stripped.get("fullName"), Some(&Value::from("Al")));
    assert!(stripped.get("name").is_none());

    let verbatim = extract_params(&named, "name:0#fullName");
    assert_eq!(verbatim.get("fullName"), Some(&Value::from("<b>Al</b>")));
}

#[test]
fn later_rule_wins() {
    let params = input(&[("a", Value::from("first")), ("b", Value::from("second"))]);
    let output = extract_params(&params, vec!["a#out", "b#out"]);

    assert_eq!(output.get("out"), Some(&Value::from("second")));
    assert_eq!(output.len(), 1);
}

#[test]
fn rerunning_on_output_does_not_panic() {
    let params = input(&[
        ("name", Value::from("<b>Al</b>")),
        ("age", Value::from("41")),
        ("tags", Value::from("[1]")),
    ]);
    let rules = parse_rules("name#fullName, i:age, d:age#price, a:tags");
    let extractor = Extractor::new();

    let first = extractor.extract(&params, &rules);
    let second = extractor.extract(&first, &rules);

    // `name` is gone after the rename, so the second pass only sees defaults for it
    assert_eq!(second.get("fullName"), Some(&Value::from("")));
    assert_eq!(second.get("age"), Some(&Value::Int(41)));
    assert_eq!(second.get("price"), Some(&Value::from("41.00")));
    assert_eq!(second.get("tags"), Some(&Value::Sequence(vec![Value::Int(1)])));
}

#[test]
fn injected_sanitizer_is_used() {
    let params = input(&[("bio", Value::from("<script>x</script>"))]);
    let extractor = Extractor::with_sanitizer(PassthroughSanitizer);

    let output = extractor.extract_with(&params, "bio");
    assert_eq!(output.get("bio"), Some(&Value::from("<script>x</script>")));
}

#[test]
fn json_input_round_trip() {
    let body = serde_json::json!({"age": 41, "price": 2.5, "admin": true, "note": null});
    let params = request_params::params_from_json(body).expect("object body");

    let output = extract_params(&params, "s:age, d:price, admin, i:note@default:0");
    let json = serde_json::Value::from(Value::Mapping(output));

    assert_eq!(
        json,
        serde_json::json!({"age": "41", "price": "2.50", "admin": "true", "note": 0})
    );
}
