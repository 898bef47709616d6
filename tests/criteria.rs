use rstest::rstest;
use versioncheck::{Criteria, Operator};

#[rstest]
#[case(Some("5.0.1"), ">5.0", true)]
#[case(None, ">5.0", true)]
#[case(Some("1.0"), ">=1.0", true)]
#[case(Some("1.0.1"), ">=1.0", true)]
#[case(Some("2.0.2.1"), "<2.0.3", true)]
#[case(Some("2.1.a"), "<2.0.3", false)]
#[case(Some("2.0.3"), "<=2.0.3", true)]
#[case(Some("2.1.a"), "<=2.0.3", false)]
#[case(Some("5.0"), "=5.0", true)]
#[case(Some("5.0"), "==5.0", true)]
#[case(Some("5.0.1"), "= 5.0", false)]
#[case(Some("5.0.1"), "!= 5.0", true)]
#[case(Some("5.0"), "!=5.0", false)]
#[case(Some("2.1.0.2"), "2.0.5<>4.0.3", true)]
#[case(Some("4.0.3.1"), "2.0.5<>4.0.3", false)]
#[case(Some("5.0.1"), "2.0.5<>4.0.3", false)]
fn criteria_test_matches_calibration(
    #[case] version: Option<&str>,
    #[case] criteria: &str,
    #[case] expected: bool,
) {
    let criteria = Criteria::parse(criteria).unwrap();
    assert_eq!(criteria.test(version), expected);
}

#[rstest]
#[case(Some("1.0.0"), "=1.0", true)] // padded with zeros
#[case(Some("2.0.5"), "2.0.5<>4.0.3", false)] // exclusive bounds
#[case(Some("4.0.3"), "2.0.5<>4.0.3", false)]
#[case(Some("1.a"), ">1.9", true)] // token sorts after any number
#[case(Some("1.a"), "<1.b", true)]
fn criteria_test_edge_cases(
    #[case] version: Option<&str>,
    #[case] criteria: &str,
    #[case] expected: bool,
) {
    let criteria = Criteria::parse(criteria).unwrap();
    assert_eq!(criteria.test(version), expected);
}

#[test]
fn between_expression_selects_between_operator() {
    let criteria = Criteria::parse("2.0.5<>4.0.3").unwrap();

    assert_eq!(criteria.operator(), Operator::Between);
    assert_eq!(criteria.sentry().as_str(), "2.0.5");
    assert_eq!(criteria.sentry2().map(|v| v.as_str()), Some("4.0.3"));
}

#[test]
fn parse_twice_yields_identical_criteria() {
    for expr in [">5.0", "!= 5.0", "2.0.5<>4.0.3", "<=2.0.3", "==5.0"] {
        assert_eq!(Criteria::parse(expr).unwrap(), Criteria::parse(expr).unwrap());
    }
}
