#![forbid(unsafe_code)]
use chrono::NaiveDateTime;
use horaire::io::parse_rules_json;
use horaire::{load_config_from_file, load_rules_from_file, Context, Evaluator, RuleKind, Status};
use std::fs;
use tempfile::tempdir;

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

const RULES: &str = r#"[
  {
    "id": "semaine",
    "weekdays": [{ "start": "Mon", "end": "Fri" }],
    "times": [{ "start": { "fixed": 600 }, "end": { "fixed": 1080 } }]
  },
  { "id": "reste", "kind": "fallback", "status": "unknown", "comment": "sur rendez-vous" }
]"#;

#[test]
fn load_rules_and_evaluate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, RULES).unwrap();

    let rules = load_rules_from_file(&path).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id.as_str(), "semaine");
    assert_eq!(rules[1].kind, RuleKind::Fallback);

    let eval = Evaluator::new(rules);
    assert_eq!(eval.status(dt("2021-06-07 12:00")).unwrap().status, Status::Open);
    let evening = eval.status(dt("2021-06-07 20:00")).unwrap();
    assert_eq!(evening.status, Status::Unknown);
    assert_eq!(evening.comment.as_deref(), Some("sur rendez-vous"));
}

#[test]
fn rules_without_id_get_random_ids() {
    let rules = parse_rules_json(br#"[{}, {}]"#).unwrap();
    assert_ne!(rules[0].id, rules[1].id);
    assert_eq!(rules[0].status, Status::Open);
}

#[test]
fn empty_or_invalid_rules_are_rejected() {
    assert!(parse_rules_json(b"[]").is_err());
    assert!(parse_rules_json(b"not json").is_err());
    let err = parse_rules_json(br#"[{ "times": [{ "start": { "fixed": 9000 } }] }]"#).unwrap_err();
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn loaded_rule_with_huge_offset_fails_evaluation() {
    let json = br#"[{
  "dates": [{ "start": { "month": 6, "day": 1, "day_offset": 9223372036854775807 } }]
}]"#;
    let rules = parse_rules_json(json).unwrap();
    let err = Evaluator::new(rules).status(dt("2021-06-09 12:00")).unwrap_err();
    assert!(err.to_string().starts_with("illegal date range"));
}

#[test]
fn missing_rules_file_mentions_path() {
    let dir = tempdir().unwrap();
    let err = load_rules_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn load_config_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
  "country": "de",
  "subregion": "by",
  "coordinates": { "lat": 48.14, "lon": 11.58 },
  "holidays": [
    { "date": "2021-01-06", "kind": "public", "name": "Heilige Drei Könige",
      "regions": ["de-by"] },
    { "date": "2021-10-31", "kind": "public", "name": "Reformationstag",
      "regions": ["de-bb"] },
    { "date": "2021-10-03", "kind": "public", "name": "Tag der Deutschen Einheit",
      "regions": ["de"] }
  ]
}"#,
    )
    .unwrap();

    let config = load_config_from_file(&path).unwrap();
    assert_eq!(config.search_horizon_weeks, 100);
    assert_eq!(config.country.as_deref(), Some("de"));
    assert_eq!(config.holidays.len(), 3);

    let ctx = Context::from_config(&config);
    assert_eq!(ctx.search_horizon_weeks, 100);
    assert!(ctx.coordinates.is_some());
    let epiphany = chrono::NaiveDate::from_ymd_opt(2021, 1, 6).unwrap();
    let reformation = chrono::NaiveDate::from_ymd_opt(2021, 10, 31).unwrap();
    let unity = chrono::NaiveDate::from_ymd_opt(2021, 10, 3).unwrap();
    assert!(ctx.is_holiday(epiphany, horaire::HolidayKind::Public));
    assert!(!ctx.is_holiday(reformation, horaire::HolidayKind::Public));
    assert!(ctx.is_holiday(unity, horaire::HolidayKind::Public));
    assert!(!ctx.is_holiday(unity, horaire::HolidayKind::School));
}

#[test]
fn zero_horizon_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "search_horizon_weeks": 0 }"#).unwrap();
    assert!(load_config_from_file(&path).is_err());
}
