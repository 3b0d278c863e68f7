use narwhal::{CrossMinOptions, Error, HeuristicKind};

#[test]
fn defaults() {
    let options = CrossMinOptions::default();
    assert_eq!(options.heuristic, HeuristicKind::OneSidedGreedySwitch);
    assert_eq!(options.max_sweeps, 32);
    assert!(options.distribute_ports);
    assert!(options.hierarchical);
    assert!(!options.separate_components);
}

#[test]
fn empty_json_yields_defaults() {
    assert_eq!(
        CrossMinOptions::from_json("{}").unwrap(),
        CrossMinOptions::default()
    );
}

#[test]
fn json_fields_are_camel_case() {
    let options = CrossMinOptions::from_json(
        r#"{
            "heuristic": "TWO_SIDED_GREEDY_SWITCH",
            "maxSweeps": 4,
            "distributePorts": false,
            "separateComponents": true
        }"#,
    )
    .unwrap();
    assert_eq!(options.heuristic, HeuristicKind::TwoSidedGreedySwitch);
    assert_eq!(options.max_sweeps, 4);
    assert!(!options.distribute_ports);
    assert!(options.hierarchical);
    assert!(options.separate_components);

    let options = CrossMinOptions::from_json(r#"{"heuristic":"BARYCENTER"}"#).unwrap();
    assert_eq!(options.heuristic, HeuristicKind::Barycenter);
}

#[test]
fn options_serialize_back_to_the_same_json_shape() {
    let json = serde_json::to_value(CrossMinOptions::default()).unwrap();
    assert_eq!(json["heuristic"], "ONE_SIDED_GREEDY_SWITCH");
    assert_eq!(json["maxSweeps"], 32);
}

#[test]
fn unknown_heuristics_are_rejected() {
    let err = CrossMinOptions::from_json(r#"{"heuristic":"SIMULATED_ANNEALING"}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions(_)));
    assert!(
        err.to_string()
            .starts_with("invalid crossing minimization options:")
    );
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        CrossMinOptions::from_json("{"),
        Err(Error::InvalidOptions(_))
    ));
}
