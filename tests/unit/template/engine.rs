use super::*;

fn params(pairs: &[(&str, &str)]) -> ParamSet {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

#[test]
fn template_without_placeholders_is_unchanged() {
    let text = "<svg><rect width=\"10\" height=\"10\"/></svg>";
    let out = fill(text, &GlobalParams::new(), &params(&[("a", "1")]));
    assert_eq!(out, text);
}

#[test]
fn adjacent_placeholders_are_filled() {
    let out = fill(
        "{{a}}{{b}}",
        &GlobalParams::new(),
        &params(&[("a", "1"), ("b", "2")]),
    );
    assert_eq!(out, "12");
}

#[test]
fn every_occurrence_is_replaced() {
    let out = fill(
        "{{team}} vs {{team}}",
        &GlobalParams::new(),
        &params(&[("team", "Owls")]),
    );
    assert_eq!(out, "Owls vs Owls");
}

#[test]
fn timestamp_is_never_substituted() {
    let mut globals = GlobalParams::new();
    globals.insert("timestamp", "99");
    let out = fill("t={{timestamp}}", &globals, &params(&[("timestamp", "1.5")]));
    assert_eq!(out, "t={{timestamp}}");
}

#[test]
fn unknown_placeholders_stay_literal() {
    let out = fill(
        "{{a}} {{missing}} {{ a }}",
        &GlobalParams::new(),
        &params(&[("a", "x")]),
    );
    assert_eq!(out, "x {{missing}} {{ a }}");
}

#[test]
fn event_values_win_over_globals() {
    let globals = GlobalParams::parse_assignments(["home=Globals", "venue=Arena"]).unwrap();
    let out = fill(
        "{{home}} @ {{venue}}",
        &globals,
        &params(&[("home", "Event")]),
    );
    assert_eq!(out, "Event @ Arena");
}

#[test]
fn substituted_values_are_not_rescanned() {
    let out = fill(
        "{{a}}|{{b}}",
        &GlobalParams::new(),
        &params(&[("a", "{{b}}"), ("b", "{{a}}")]),
    );
    assert_eq!(out, "{{b}}|{{a}}");
}

#[test]
fn unterminated_and_nested_openers() {
    let p = params(&[("b", "B")]);
    assert_eq!(fill("x {{b", &GlobalParams::new(), &p), "x {{b");
    assert_eq!(fill("{{a{{b}}", &GlobalParams::new(), &p), "{{aB");
}

#[test]
fn token_ends_at_first_closing_braces() {
    let p = params(&[("a}", "X"), ("a", "Y")]);
    assert_eq!(fill("{{a}}}", &GlobalParams::new(), &p), "Y}");
    let only_brace_key = params(&[("a}", "X")]);
    assert_eq!(fill("{{a}}}", &GlobalParams::new(), &only_brace_key), "{{a}}}");
}

#[test]
fn placeholders_are_listed_once_in_order() {
    let t = Template::new("{{b}} {{a}} {{b}} {{x{{c}} {{open");
    assert_eq!(t.placeholders(), vec!["b", "a", "c"]);
}

#[test]
fn parse_assignments_splits_on_first_equals() {
    let g = GlobalParams::parse_assignments(["title=a=b", "empty=", "title2=x"]).unwrap();
    assert_eq!(g.get("title"), Some("a=b"));
    assert_eq!(g.get("empty"), Some(""));
    assert_eq!(g.len(), 3);
}

#[test]
fn parse_assignments_rejects_bad_entries() {
    let err = GlobalParams::parse_assignments(["novalue"]).unwrap_err();
    assert!(matches!(err, ScorecastError::Config(_)));
    assert!(GlobalParams::parse_assignments(["=x"]).is_err());
}

#[test]
fn missing_template_is_a_read_error() {
    let err = Template::from_path(Path::new("no/such/template.svg")).unwrap_err();
    assert!(matches!(err, ScorecastError::TemplateRead(_)));
}
