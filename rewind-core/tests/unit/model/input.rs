use super::*;

#[test]
fn empty_object_uses_documented_defaults() {
    let input = RecapInput::from_json_str("{}").unwrap();
    assert_eq!(input.username(), "User");
    assert_eq!(input.days_active(), 0);
    assert_eq!(input.total_solved(), 0);
    assert_eq!(input.max_streak(), 0);
    assert_eq!(input.rank_percentile(), 100);
    assert_eq!(input.better_than_percent(), 0);
    assert_eq!(input.top_skill(), "General");
    assert_eq!(input.top_problem(), "N/A");
    assert_eq!(input.top_problem_attempts(), 0);
    assert!(input.achievements().is_empty());
}

#[test]
fn nulls_are_treated_as_missing() {
    let input = RecapInput::from_json_str(
        r#"{"username": null, "daysActive": null, "topProblem": null,
            "topTags": null, "achievements": null, "rankPercentile": null}"#,
    )
    .unwrap();
    assert_eq!(input.username(), "User");
    assert_eq!(input.days_active(), 0);
    assert_eq!(input.top_problem(), "N/A");
    assert_eq!(input.top_skill(), "General");
    assert_eq!(input.rank_percentile(), 100);
}

#[test]
fn full_document_round_trips_values() {
    let input = RecapInput::from_json_str(
        r#"{
            "username": "alice",
            "avatarUrl": "https://example.invalid/a.png",
            "daysActive": 42,
            "totalSolved": 310,
            "totalSubmissions": 999,
            "maxStreak": 17,
            "rankPercentile": 25,
            "topTags": [{"tag": "two pointers", "count": 4}, {"tag": "dp"}],
            "topProblem": "Watermelon",
            "topProblemAttempts": 9,
            "achievements": [{"image": "/images/a.png", "title": "First"}, {}]
        }"#,
    )
    .unwrap();

    assert_eq!(input.username(), "alice");
    assert_eq!(input.days_active(), 42);
    assert_eq!(input.total_solved(), 310);
    assert_eq!(input.max_streak(), 17);
    assert_eq!(input.better_than_percent(), 75);
    assert_eq!(input.top_skill(), "Two Pointers");
    assert_eq!(input.top_problem(), "Watermelon");
    assert_eq!(input.top_problem_attempts(), 9);
    assert_eq!(input.achievements().len(), 2);
    assert_eq!(
        input.achievements()[0].image.as_deref(),
        Some("/images/a.png")
    );
    assert_eq!(input.achievements()[1].image, None);
}

#[test]
fn counts_accept_floats_and_numeric_strings() {
    let input = RecapInput::from_json_str(
        r#"{"rankPercentile": "25.00", "daysActive": 3.6, "totalSolved": " 12 "}"#,
    )
    .unwrap();
    assert_eq!(input.rank_percentile(), 25);
    assert_eq!(input.days_active(), 4);
    assert_eq!(input.total_solved(), 12);
}

#[test]
fn non_numeric_count_is_an_input_error() {
    let err = RecapInput::from_json_str(r#"{"daysActive": "many"}"#).unwrap_err();
    assert!(matches!(err, RewindError::Input(_)));
}

#[test]
fn tag_without_name_falls_back_to_general() {
    let input = RecapInput::from_json_str(r#"{"topTags": [{"count": 3}]}"#).unwrap();
    assert_eq!(input.top_skill(), "General");
}

#[test]
fn invalid_json_and_non_objects_are_rejected() {
    assert!(matches!(
        RecapInput::from_json_str("{not json"),
        Err(RewindError::Input(_))
    ));
    assert!(matches!(
        RecapInput::from_json_str("[1, 2]"),
        Err(RewindError::Input(_))
    ));
}

#[test]
fn from_arg_prefers_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.json");
    std::fs::write(&path, r#"{"username": "from-file"}"#).unwrap();

    let input = RecapInput::from_arg(path.to_str().unwrap()).unwrap();
    assert_eq!(input.username(), "from-file");

    let inline = RecapInput::from_arg(r#"{"username": "inline"}"#).unwrap();
    assert_eq!(inline.username(), "inline");
}

#[test]
fn from_arg_missing_path_is_parsed_as_json_and_fails() {
    let err = RecapInput::from_arg("/nonexistent/rewind/input.json").unwrap_err();
    assert!(matches!(err, RewindError::Input(_)));
}

#[test]
fn title_case_matches_word_boundaries() {
    assert_eq!(title_case("two pointers"), "Two Pointers");
    assert_eq!(title_case("DP-on-trees"), "Dp-On-Trees");
    assert_eq!(title_case("greedy"), "Greedy");
    assert_eq!(title_case("2-sat"), "2-Sat");
    assert_eq!(title_case("بحث ثنائي"), "بحث ثنائي");
    assert_eq!(title_case(""), "");
}

#[test]
fn malformed_achievement_entries_parse_without_an_image() {
    let input = RecapInput::from_json_str(
        r#"{"achievements": ["/images/a.png", {"image": 5}, null, {"image": "/images/b.png"}]}"#,
    )
    .unwrap();
    let images: Vec<_> = input
        .achievements()
        .iter()
        .map(|a| a.image.as_deref())
        .collect();
    assert_eq!(images, vec![None, None, None, Some("/images/b.png")]);
}

#[test]
fn extreme_rank_percentile_saturates() {
    let low = RecapInput::from_json_str(r#"{"rankPercentile": -9223372036854775808}"#).unwrap();
    assert_eq!(low.better_than_percent(), i64::MAX);

    let float = RecapInput::from_json_str(r#"{"rankPercentile": -9.2e18}"#).unwrap();
    assert!(float.better_than_percent() > 0);

    let high = RecapInput::from_json_str(r#"{"rankPercentile": 9223372036854775807}"#).unwrap();
    assert_eq!(high.better_than_percent(), 100 - i64::MAX);
}
