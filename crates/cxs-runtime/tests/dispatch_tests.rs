//! Integration tests for condition evaluation and query building
//!
//! Runs condition trees through both dispatchers with the standard handlers
//! registered.

mod common;

use chrono::{TimeZone, Utc};
use common::{boolean, context, not, property, Fixture};
use cxs_core::{Condition, ConditionType, Item, Value};
use cxs_runtime::{DispatchOptions, ParameterResolver, QueryFragment, RangeBounds, RuntimeError};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn profile_aged(age: i64) -> Item {
    Item::profile("p1").with_field("age", age)
}

// =============================================================================
// Dispatch Rules
// =============================================================================

#[test]
fn test_age_scenario() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let condition = property("age", "greaterThanOrEqualTo").with_parameter("propertyValueInteger", 18);

    assert!(!evaluator.eval(&condition, &profile_aged(17)).unwrap());
    assert!(evaluator.eval(&condition, &profile_aged(18)).unwrap());
}

#[test]
fn test_parent_delegation_matches_parent_with_extended_context() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let parent = property("properties.age", "greaterThanOrEqualTo")
        .with_parameter("propertyValueInteger", "parameter::minAge");
    let child = Condition::new("ageAtLeastCondition").with_parameter("minAge", 21);
    let ctx = context(&[("minAge", Value::Integer(21))]);

    for age in [20, 21, 40] {
        let item = Item::profile("p1").with_property("age", age);
        assert_eq!(
            evaluator.eval(&child, &item).unwrap(),
            evaluator.eval_with_context(&parent, &item, &ctx).unwrap(),
            "age {}",
            age
        );
    }
}

#[test]
fn test_event_type_condition() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let condition = Condition::new("eventTypeCondition").with_parameter("eventTypeId", "view");

    assert!(evaluator.eval(&condition, &Item::event("e1", "view")).unwrap());
    assert!(!evaluator.eval(&condition, &Item::event("e2", "click")).unwrap());

    let filter = fixture.query_builder().build_filter(&condition).unwrap();
    assert_eq!(filter, QueryFragment::term("eventType", "view"));
}

#[test]
fn test_parent_parameters_resolve_from_caller_context() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let condition = Condition::new("profileSegmentCondition")
        .with_parameter("matchType", "in")
        .with_parameter("segments", "parameter::wanted");
    let item = Item::profile("p1").with_field("segments", vec!["vip", "newsletter"]);

    let ctx = context(&[("wanted", Value::from(vec!["vip"]))]);
    assert!(evaluator.eval_with_context(&condition, &item, &ctx).unwrap());

    // the segment list cannot be resolved, so the parent cannot either
    assert!(!evaluator.eval(&condition, &item).unwrap());
}

#[test]
fn test_unknown_evaluator_key_does_not_match() {
    let fixture = Fixture::new();
    fixture
        .types
        .register(ConditionType::new("geoCondition").with_evaluator("geoConditionEvaluator"));
    let condition = Condition::new("geoCondition");

    assert!(!fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap());
}

#[test]
fn test_unknown_condition_type_does_not_match() {
    let fixture = Fixture::new();
    let condition = Condition::new("neverRegisteredCondition");
    assert!(!fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap());
}

#[test]
fn test_type_without_handler_or_parent_is_unsupported() {
    let fixture = Fixture::new();
    fixture.types.register(ConditionType::new("brokenCondition"));
    let condition = Condition::new("brokenCondition");

    let err = fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedOperation(_)));
    assert!(err.is_configuration_error());

    let err = fixture.query_builder().build_filter(&condition).unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedOperation(_)));
}

#[test]
fn test_attached_type_is_used_without_lookup() {
    let fixture = Fixture::new();
    let match_all = Arc::new(
        ConditionType::new("unregisteredMatchAll")
            .with_evaluator("matchAllConditionEvaluator")
            .with_query_builder("matchAllConditionQueryBuilder"),
    );
    let condition = Condition::of_type(match_all);

    assert!(fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap());
    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::MatchAll
    );
}

#[test]
fn test_plugin_removal_disables_its_handlers() {
    let fixture = Fixture::new();
    fixture.evaluators.add_for_plugin(
        "extra",
        "extraEvaluator",
        Arc::new(cxs_runtime::MatchAllConditionEvaluator),
    );
    fixture
        .types
        .register_for_plugin("extra", ConditionType::new("extraCondition").with_evaluator("extraEvaluator"));
    let condition = Condition::new("extraCondition");
    let evaluator = fixture.evaluator();

    assert!(evaluator.eval(&condition, &profile_aged(1)).unwrap());

    assert_eq!(fixture.evaluators.remove_plugin("extra"), vec!["extraEvaluator".to_string()]);
    assert!(!evaluator.eval(&condition, &profile_aged(1)).unwrap());
}

#[test]
fn test_max_depth() {
    let fixture = Fixture::new().with_options(DispatchOptions::default().with_max_depth(Some(3)));
    let mut condition = Condition::new("matchAllCondition");
    for _ in 0..5 {
        condition = not(condition);
    }

    let err = fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap_err();
    assert!(matches!(err, RuntimeError::MaxDepthExceeded { .. }));

    let unbounded = Fixture::new().with_options(DispatchOptions::default().with_max_depth(None));
    // five negations of match-all
    assert!(!unbounded.evaluator().eval(&condition, &profile_aged(1)).unwrap());
}

#[test]
fn test_metrics_are_recorded_per_handler() {
    let fixture = Fixture::new();
    let condition = boolean("and", vec![Condition::new("matchAllCondition")]);
    fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap();

    let snapshot = fixture.metrics.snapshot();
    assert_eq!(snapshot.counter("evaluator_booleanConditionEvaluator_calls"), 1);
    assert_eq!(snapshot.counter("evaluator_matchAllConditionEvaluator_calls"), 1);
    assert_eq!(snapshot.observations("evaluator_matchAllConditionEvaluator_duration"), 1);
}

#[test]
fn test_evaluator_errors_propagate_and_are_counted() {
    let fixture = Fixture::new();
    let condition = property("age", "equals");

    let err = fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap_err();
    assert!(matches!(err, RuntimeError::IllegalArgument(_)));
    assert_eq!(
        fixture.metrics.snapshot().counter("errors_evaluator_propertyConditionEvaluator"),
        1
    );
}

// =============================================================================
// Contextual Parameters
// =============================================================================

#[test]
fn test_map_and_list_resolution_asymmetry() {
    let resolver = ParameterResolver::new(Fixture::new().scripts);
    let ctx = context(&[("known", Value::from("x"))]);

    let mut map = HashMap::new();
    map.insert("a".to_string(), Value::from("parameter::known"));
    map.insert("b".to_string(), Value::from("parameter::unknown"));
    assert_eq!(resolver.resolve(&Value::Object(map), &ctx), None);

    let list = Value::from(vec!["parameter::known", "parameter::unknown"]);
    assert_eq!(resolver.resolve(&list, &ctx), Some(Value::from(vec!["x"])));
}

#[test]
fn test_list_parameter_keeps_resolvable_values() {
    let fixture = Fixture::new();
    let condition = property("properties.color", "in")
        .with_parameter("propertyValues", vec!["parameter::first", "parameter::second"]);
    let ctx = context(&[("first", Value::from("red"))]);

    let red = Item::profile("p1").with_property("color", "red");
    assert!(fixture.evaluator().eval_with_context(&condition, &red, &ctx).unwrap());

    let filter = fixture
        .query_builder()
        .build_filter_with_context(&condition, &ctx)
        .unwrap();
    assert_eq!(filter, QueryFragment::terms("properties.color", vec![Value::from("red")]));
}

#[test]
fn test_unresolvable_condition_fallbacks() {
    let fixture = Fixture::new();
    let condition = property("properties.age", "equals").with_parameter("propertyValueInteger", "parameter::age");

    assert!(!fixture.evaluator().eval(&condition, &profile_aged(1)).unwrap());
    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::MatchAll
    );
    assert!(matches!(
        fixture.query_builder().count(&condition),
        Err(RuntimeError::UnresolvedCondition(_))
    ));
}

#[test]
fn test_unresolvable_sub_filter_does_not_break_composite_query() {
    let fixture = Fixture::new();
    let condition = boolean(
        "and",
        vec![
            property("properties.gender", "equals").with_parameter("propertyValue", "female"),
            property("properties.age", "equals").with_parameter("propertyValueInteger", "parameter::age"),
        ],
    );

    let filter = fixture.query_builder().build_filter(&condition).unwrap();
    assert_eq!(
        filter,
        QueryFragment::must(vec![
            QueryFragment::term("properties.gender", "female"),
            QueryFragment::MatchAll,
        ])
    );
}

#[test]
fn test_script_parameter_is_stable_across_calls() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let condition = property("properties.visits", "greaterThan")
        .with_parameter("propertyValueInteger", "script::threshold + 1");
    let ctx = context(&[("threshold", Value::Integer(9))]);
    let item = Item::profile("p1").with_property("visits", 11);

    let first = evaluator.eval_with_context(&condition, &item, &ctx).unwrap();
    let second = evaluator.eval_with_context(&condition, &item, &ctx).unwrap();
    assert!(first);
    assert_eq!(first, second);
    assert_eq!(fixture.scripts.cache_size(), 1);

    let at_threshold = Item::profile("p2").with_property("visits", 10);
    assert!(!evaluator.eval_with_context(&condition, &at_threshold, &ctx).unwrap());
}

#[test]
fn test_failing_script_makes_condition_unresolvable() {
    let fixture = Fixture::new();
    let condition = property("properties.visits", "equals")
        .with_parameter("propertyValueInteger", "script::threshold / 0");
    let ctx = context(&[("threshold", Value::Integer(9))]);

    let item = Item::profile("p1").with_property("visits", 9);
    assert!(!fixture.evaluator().eval_with_context(&condition, &item, &ctx).unwrap());
}

#[test]
fn test_deeply_nested_script_is_unresolvable() {
    let fixture = Fixture::new();
    let script = format!("script::{}threshold{}", "(".repeat(20_000), ")".repeat(20_000));
    let condition = property("properties.visits", "equals").with_parameter("propertyValueInteger", script.as_str());
    let ctx = context(&[("threshold", Value::Integer(9))]);

    let item = Item::profile("p1").with_property("visits", 9);
    assert!(!fixture.evaluator().eval_with_context(&condition, &item, &ctx).unwrap());
    assert_eq!(
        fixture.query_builder().build_filter_with_context(&condition, &ctx).unwrap(),
        QueryFragment::MatchAll
    );
}

// =============================================================================
// Property Comparison
// =============================================================================

#[test]
fn test_ascii_folded_equality() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let stored = Item::profile("p1").with_property("drink", "Café");

    for expected in ["café", "CAFE"] {
        let condition = property("properties.drink", "equals").with_parameter("propertyValue", expected);
        assert!(evaluator.eval(&condition, &stored).unwrap(), "{}", expected);
        assert_eq!(
            fixture.query_builder().build_filter(&condition).unwrap(),
            QueryFragment::term("properties.drink", "cafe")
        );
    }
}

#[test]
fn test_between_preserves_literal_order() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let ascending = property("age", "between").with_parameter("propertyValuesInteger", vec![18, 30]);
    let descending = property("age", "between").with_parameter("propertyValuesInteger", vec![30, 18]);

    for (age, expected) in [(17, false), (18, true), (25, true), (30, true), (31, false)] {
        assert_eq!(evaluator.eval(&ascending, &profile_aged(age)).unwrap(), expected, "age {}", age);
        // lower bound 30, upper bound 18: nothing can match
        assert!(!evaluator.eval(&descending, &profile_aged(age)).unwrap(), "age {}", age);
    }

    let builder = fixture.query_builder();
    assert_eq!(
        builder.build_filter(&ascending).unwrap(),
        QueryFragment::range("age", RangeBounds::between(18, 30))
    );
    assert_eq!(
        builder.build_filter(&descending).unwrap(),
        QueryFragment::range("age", RangeBounds::between(30, 18))
    );
}

#[test]
fn test_between_requires_exactly_two_values() {
    let fixture = Fixture::new();
    let condition = property("age", "between").with_parameter("propertyValuesInteger", vec![18]);
    let err = fixture.query_builder().build_filter(&condition).unwrap_err();
    assert!(matches!(err, RuntimeError::IllegalArgument(_)));
}

#[test]
fn test_is_day_window() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let noon = Item::profile("p1").with_property("lastVisit", "2024-03-15T12:00:00Z");
    let next_midnight = Item::profile("p2").with_property("lastVisit", "2024-03-16T00:00:00Z");

    for day in ["2024-03-15T23:59:59Z", "2024-03-15T00:00:00Z"] {
        let condition = property("properties.lastVisit", "isDay").with_parameter("propertyValueDate", day);
        assert!(evaluator.eval(&condition, &noon).unwrap(), "{}", day);
        assert!(!evaluator.eval(&condition, &next_midnight).unwrap(), "{}", day);

        let negated = property("properties.lastVisit", "isNotDay").with_parameter("propertyValueDate", day);
        assert!(!evaluator.eval(&negated, &noon).unwrap(), "{}", day);
        assert!(evaluator.eval(&negated, &next_midnight).unwrap(), "{}", day);
    }
}

#[test]
fn test_is_day_filter() {
    let fixture = Fixture::new();
    let condition = property("properties.lastVisit", "isDay")
        .with_parameter("propertyValueDate", Value::Date(Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap()));

    let filter = fixture.query_builder().build_filter(&condition).unwrap();
    assert_eq!(
        filter.to_json(),
        json!({"range": {"properties.lastVisit": {
            "gte": "2024-03-15T00:00:00.000Z",
            "lt": "2024-03-16T00:00:00.000Z"
        }}})
    );
}

#[test]
fn test_is_day_rejects_unparseable_dates() {
    let fixture = Fixture::new();
    let condition = property("properties.lastVisit", "isDay").with_parameter("propertyValue", "someday");
    let item = Item::profile("p1").with_property("lastVisit", "2024-03-15T10:00:00Z");

    let err = fixture.evaluator().eval(&condition, &item).unwrap_err();
    assert!(matches!(err, RuntimeError::IllegalArgument(_)));
    assert!(err.to_string().contains("invalid string date value 'someday'"));

    let err = fixture.query_builder().build_filter(&condition).unwrap_err();
    assert!(err.to_string().contains("invalid string date value 'someday'"));
}

#[test]
fn test_has_none_of_is_a_conjunction_of_negations() {
    let fixture = Fixture::new();
    let condition = property("properties.tags", "hasNoneOf").with_parameter("propertyValues", vec!["a", "b"]);

    let tagged = Item::profile("p1").with_property("tags", vec!["a", "c"]);
    assert!(!fixture.evaluator().eval(&condition, &tagged).unwrap());

    let untouched = Item::profile("p2").with_property("tags", vec!["c", "d"]);
    assert!(fixture.evaluator().eval(&condition, &untouched).unwrap());

    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::must_not(vec![
            QueryFragment::term("properties.tags", "a"),
            QueryFragment::term("properties.tags", "b"),
        ])
    );
}

#[test]
fn test_collection_operators() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let item = Item::profile("p1").with_property("tags", vec!["Red", "green"]);
    let check = |operator: &str, values: Vec<&str>| {
        let condition = property("properties.tags", operator).with_parameter("propertyValues", values);
        evaluator.eval(&condition, &item).unwrap()
    };

    assert!(check("in", vec!["red", "blue"]));
    assert!(!check("notIn", vec!["red", "blue"]));
    assert!(check("notIn", vec!["blue"]));
    assert!(check("all", vec!["red", "green"]));
    assert!(!check("all", vec!["red", "blue"]));
    assert!(check("hasSomeOf", vec!["blue", "green"]));
    assert!(check("inContains", vec!["re", "gr"]));
    assert!(!check("inContains", vec!["re", "bl"]));
}

#[test]
fn test_collection_filters() {
    let fixture = Fixture::new();
    let builder = fixture.query_builder();
    let build = |operator: &str| {
        let condition = property("tags", operator).with_parameter("propertyValues", vec!["A", "b"]);
        builder.build_filter(&condition).unwrap()
    };

    assert_eq!(
        build("in"),
        QueryFragment::terms("tags", vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(
        build("notIn"),
        QueryFragment::not(QueryFragment::terms("tags", vec![Value::from("a"), Value::from("b")]))
    );
    assert_eq!(
        build("all"),
        QueryFragment::must(vec![QueryFragment::term("tags", "a"), QueryFragment::term("tags", "b")])
    );
    assert_eq!(
        build("inContains"),
        QueryFragment::must(vec![
            QueryFragment::regexp("tags", ".*a.*"),
            QueryFragment::regexp("tags", ".*b.*"),
        ])
    );
    assert_eq!(
        build("hasSomeOf"),
        QueryFragment::should(vec![QueryFragment::term("tags", "a"), QueryFragment::term("tags", "b")])
    );
}

#[test]
fn test_string_pattern_operators() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let item = Item::profile("p1").with_property("city", "Zürich");
    let check = |operator: &str, value: &str| {
        let condition = property("properties.city", operator).with_parameter("propertyValue", value);
        evaluator.eval(&condition, &item).unwrap()
    };

    assert!(check("contains", "URI"));
    assert!(!check("notContains", "uri"));
    assert!(check("startsWith", "zu"));
    assert!(check("endsWith", "ICH"));
    assert!(check("matchesRegex", "z.*h"));
    assert!(!check("matchesRegex", "uri"));

    let builder = fixture.query_builder();
    let build = |operator: &str, value: &str| {
        let condition = property("city", operator).with_parameter("propertyValue", value);
        builder.build_filter(&condition).unwrap()
    };
    assert_eq!(build("contains", "Zü"), QueryFragment::regexp("city", ".*zu.*"));
    assert_eq!(build("startsWith", "Zü"), QueryFragment::prefix("city", "zu"));
    assert_eq!(build("endsWith", "ich"), QueryFragment::regexp("city", ".*ich"));
    assert_eq!(build("matchesRegex", "z[a-z]+"), QueryFragment::regexp("city", "z[a-z]+"));
}

#[test]
fn test_exists_and_missing() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let with_email = Item::profile("p1").with_property("email", "a@b.c");
    let without_email = Item::profile("p2").with_property("tags", Value::Array(Vec::new()));

    assert!(evaluator.eval(&property("properties.email", "exists"), &with_email).unwrap());
    assert!(!evaluator.eval(&property("properties.email", "missing"), &with_email).unwrap());
    assert!(evaluator.eval(&property("properties.email", "missing"), &without_email).unwrap());
    // an empty list is present
    assert!(!evaluator.eval(&property("properties.tags", "missing"), &without_email).unwrap());
    assert!(evaluator.eval(&property("properties.tags", "exists"), &without_email).unwrap());
    // negated operators do not match absent properties
    let not_equals = property("properties.email", "notEquals").with_parameter("propertyValue", "x");
    assert!(!evaluator.eval(&not_equals, &without_email).unwrap());

    assert_eq!(
        fixture.query_builder().build_filter(&property("email", "missing")).unwrap(),
        QueryFragment::not(QueryFragment::exists("email"))
    );
}

#[test]
fn test_empty_list_satisfies_negative_operators() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let untagged = Item::profile("p1").with_property("tags", Vec::<Value>::new());
    let check = |operator: &str| {
        let condition = property("properties.tags", operator)
            .with_parameter("propertyValues", vec!["a", "b"])
            .with_parameter("propertyValue", "a");
        evaluator.eval(&condition, &untagged).unwrap()
    };

    assert!(check("hasNoneOf"));
    assert!(check("notIn"));
    assert!(check("notEquals"));
    assert!(check("notContains"));
    assert!(!check("in"));
    assert!(!check("hasSomeOf"));
    assert!(!check("all"));
    assert!(!check("equals"));
    assert!(!check("contains"));

    // the same negations compile to must_not clauses, which match an empty array
    let builder = fixture.query_builder();
    let not_in = property("properties.tags", "notIn").with_parameter("propertyValues", vec!["a", "b"]);
    assert_eq!(
        builder.build_filter(&not_in).unwrap(),
        QueryFragment::not(QueryFragment::terms(
            "properties.tags",
            vec![Value::from("a"), Value::from("b")]
        ))
    );
    let not_equals = property("properties.tags", "notEquals").with_parameter("propertyValue", "a");
    assert_eq!(
        builder.build_filter(&not_equals).unwrap(),
        QueryFragment::not(QueryFragment::term("properties.tags", "a"))
    );
}

#[test]
fn test_profile_segment_not_in_keeps_profiles_without_segments() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let condition = Condition::new("profileSegmentCondition")
        .with_parameter("matchType", "notIn")
        .with_parameter("segments", vec!["gold"]);

    let no_segments = Item::profile("p1").with_field("segments", Vec::<Value>::new());
    assert!(evaluator.eval(&condition, &no_segments).unwrap());

    let gold = Item::profile("p2").with_field("segments", vec!["gold"]);
    assert!(!evaluator.eval(&condition, &gold).unwrap());
}

#[test]
fn test_first_non_null_value_family_wins() {
    let fixture = Fixture::new();
    let condition = property("properties.code", "equals")
        .with_parameter("propertyValueInteger", 7)
        .with_parameter("propertyValue", "Seven");

    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::term("properties.code", "seven")
    );
}

#[test]
fn test_missing_value_is_illegal_argument() {
    let fixture = Fixture::new();
    let condition = property("properties.age", "greaterThan");
    let err = fixture.query_builder().build_filter(&condition).unwrap_err();

    match err {
        RuntimeError::IllegalArgument(message) => {
            assert!(message.contains("greaterThan"));
            assert!(message.contains("properties.age"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_date_range_values_are_iso() {
    let fixture = Fixture::new();
    let condition = property("lastVisit", "greaterThan").with_parameter("propertyValueDate", 1_710_504_000_000i64);

    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::range("lastVisit", RangeBounds::gt("2024-03-15T12:00:00.000Z"))
    );
}

#[test]
fn test_date_expression_comparison() {
    let fixture = Fixture::new();
    let condition = property("properties.lastVisit", "greaterThan")
        .with_parameter("propertyValueDateExpr", "now-7d");
    let recent = Item::profile("p1").with_property("lastVisit", Value::Date(Utc::now()));
    let old = Item::profile("p2").with_property("lastVisit", "2000-01-01T00:00:00Z");

    assert!(fixture.evaluator().eval(&condition, &recent).unwrap());
    assert!(!fixture.evaluator().eval(&condition, &old).unwrap());
    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::range("properties.lastVisit", RangeBounds::gt("now-7d"))
    );
}

#[test]
fn test_distance() {
    let fixture = Fixture::new();
    let condition = property("properties.location", "distance")
        .with_parameter("center", "40.7128,-74.0060")
        .with_parameter("distance", 10.0)
        .with_parameter("unit", "km");

    let brooklyn = Item::profile("p1").with_property("location", "40.6782,-73.9442");
    let boston = Item::profile("p2").with_property("location", "42.3601,-71.0589");
    assert!(fixture.evaluator().eval(&condition, &brooklyn).unwrap());
    assert!(!fixture.evaluator().eval(&condition, &boston).unwrap());

    let filter = fixture.query_builder().build_filter(&condition).unwrap();
    assert_eq!(filter.to_json()["geo_distance"]["distance"], json!("10000m"));
    assert_eq!(filter.to_json()["geo_distance"]["distance_type"], json!("plane"));
}

// =============================================================================
// Combinators
// =============================================================================

#[test]
fn test_boolean_and_not() {
    let fixture = Fixture::new();
    let evaluator = fixture.evaluator();
    let adult = property("age", "greaterThanOrEqualTo").with_parameter("propertyValueInteger", 18);
    let senior = property("age", "greaterThanOrEqualTo").with_parameter("propertyValueInteger", 65);
    let working_age = boolean("and", vec![adult.clone(), not(senior.clone())]);
    let edges = boolean("or", vec![not(adult), senior]);

    assert!(evaluator.eval(&working_age, &profile_aged(30)).unwrap());
    assert!(!evaluator.eval(&working_age, &profile_aged(70)).unwrap());
    assert!(evaluator.eval(&edges, &profile_aged(10)).unwrap());
    assert!(!evaluator.eval(&edges, &profile_aged(30)).unwrap());
    assert!(evaluator.eval(&boolean("and", Vec::new()), &profile_aged(30)).unwrap());

    let filter = fixture.query_builder().build_filter(&edges).unwrap();
    assert_eq!(
        filter,
        QueryFragment::should(vec![
            QueryFragment::not(QueryFragment::range("age", RangeBounds::gte(18))),
            QueryFragment::range("age", RangeBounds::gte(65)),
        ])
    );
}

#[test]
fn test_nested_condition() {
    let fixture = Fixture::new();
    let sub_condition = boolean(
        "and",
        vec![
            property("properties.interests.key", "equals").with_parameter("propertyValue", "football"),
            property("properties.interests.value", "greaterThan").with_parameter("propertyValueInteger", 10),
        ],
    );
    let condition = Condition::new("nestedCondition")
        .with_parameter("path", "properties.interests")
        .with_parameter("subCondition", sub_condition);

    let interest = |key: &str, value: i64| {
        let mut map = HashMap::new();
        map.insert("key".to_string(), Value::from(key));
        map.insert("value".to_string(), Value::Integer(value));
        Value::Object(map)
    };
    // each element is matched on its own: football 5 and tennis 20 must not combine
    let mixed = Item::profile("p1").with_property("interests", vec![interest("football", 5), interest("tennis", 20)]);
    let fan = Item::profile("p2").with_property("interests", vec![interest("tennis", 1), interest("football", 15)]);

    assert!(!fixture.evaluator().eval(&condition, &mixed).unwrap());
    assert!(fixture.evaluator().eval(&condition, &fan).unwrap());

    let filter = fixture.query_builder().build_filter(&condition).unwrap();
    assert!(matches!(filter, QueryFragment::Nested { ref path, .. } if path == "properties.interests"));
}

#[test]
fn test_ids_condition() {
    let fixture = Fixture::new();
    let condition = Condition::new("idsCondition").with_parameter("ids", vec!["p1", "p2"]);
    let excluded = condition.clone().with_parameter("match", false);

    assert!(fixture.evaluator().eval(&condition, &Item::profile("p1")).unwrap());
    assert!(!fixture.evaluator().eval(&condition, &Item::profile("p3")).unwrap());
    assert!(fixture.evaluator().eval(&excluded, &Item::profile("p3")).unwrap());

    assert_eq!(
        fixture.query_builder().build_filter(&excluded).unwrap(),
        QueryFragment::not(QueryFragment::Ids {
            values: vec!["p1".to_string(), "p2".to_string()]
        })
    );
}

// =============================================================================
// Queries and Counts
// =============================================================================

#[test]
fn test_get_query_wraps_filter() {
    let fixture = Fixture::new();
    let condition = property("properties.gender", "equals").with_parameter("propertyValue", "female");

    let query = fixture.query_builder().get_query(&condition).unwrap();
    assert_eq!(
        query,
        json!({"query": {"bool": {
            "must": [{"match_all": {}}],
            "filter": [{"term": {"properties.gender": "female"}}]
        }}})
    );
}

#[test]
fn test_count_goes_through_hit_counter() {
    let fixture = Fixture::new();
    let condition = Condition::new("eventTypeCondition").with_parameter("eventTypeId", "view");

    assert_eq!(fixture.query_builder().count(&condition).unwrap(), 42);
    let queries = fixture.hit_counter.queries.lock().unwrap();
    assert_eq!(queries.as_slice(), &[QueryFragment::term("eventType", "view")]);
}

#[test]
fn test_count_without_builder_is_unsupported() {
    let fixture = Fixture::new();
    fixture
        .types
        .register(ConditionType::new("orphanCondition").with_query_builder("orphanQueryBuilder"));
    let condition = Condition::new("orphanCondition");

    assert_eq!(
        fixture.query_builder().build_filter(&condition).unwrap(),
        QueryFragment::MatchAll
    );
    assert!(matches!(
        fixture.query_builder().count(&condition),
        Err(RuntimeError::UnsupportedOperation(_))
    ));
}

#[test]
fn test_missing_condition_type_is_illegal_for_queries() {
    let fixture = Fixture::new();
    let condition = Condition::new("neverRegisteredCondition");
    assert!(matches!(
        fixture.query_builder().build_filter(&condition),
        Err(RuntimeError::IllegalArgument(_))
    ));
}
