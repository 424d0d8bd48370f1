#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use horaire::{
    hm, DebugDump, Evaluator, Rule, RuleKind, Status, TextDump, TimeSpan, WeekdayRange,
};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, 7).unwrap()
}

#[test]
fn text_dump_of_week() {
    let eval = Evaluator::new(vec![
        Rule::new()
            .weekdays(vec![WeekdayRange::new(Weekday::Mon, Weekday::Fri)])
            .times(vec![
                TimeSpan::fixed(hm(10, 0), hm(12, 0)),
                TimeSpan::fixed(hm(14, 0), hm(18, 0)),
            ]),
        Rule::new()
            .weekdays(vec![WeekdayRange::single(Weekday::Sat)])
            .times(vec![TimeSpan::fixed(hm(10, 0), hm(12, 0))])
            .status(Status::Unknown)
            .comment("sur rendez-vous"),
    ]);

    let dump = eval.render(monday(), &TextDump).unwrap();
    insta::assert_snapshot!(dump, @r###"
    Mo 2021-06-07: 10:00-12:00 open, 14:00-18:00 open
    Tu 2021-06-08: 10:00-12:00 open, 14:00-18:00 open
    We 2021-06-09: 10:00-12:00 open, 14:00-18:00 open
    Th 2021-06-10: 10:00-12:00 open, 14:00-18:00 open
    Fr 2021-06-11: 10:00-12:00 open, 14:00-18:00 open
    Sa 2021-06-12: 10:00-12:00 unknown "sur rendez-vous"
    Su 2021-06-13: closed
    "###);
}

#[test]
fn debug_dump_shows_rules_spill_and_fallback() {
    let eval = Evaluator::new(vec![
        Rule::new()
            .with_id("late")
            .weekdays(vec![WeekdayRange::single(Weekday::Fri)])
            .times(vec![TimeSpan::fixed(hm(22, 0), hm(2, 0))]),
        Rule::new()
            .with_id("fb")
            .kind(RuleKind::Fallback)
            .weekdays(vec![WeekdayRange::single(Weekday::Sat)])
            .status(Status::Unknown),
    ]);

    let dump = eval.render(monday(), &DebugDump).unwrap();
    insta::assert_snapshot!(dump, @r###"
    Mo 2021-06-07: closed
    Tu 2021-06-08: closed
    We 2021-06-09: closed
    Th 2021-06-10: closed
    Fr 2021-06-11: 22:00-24:00 open [rule late]
    Sa 2021-06-12: 00:00-02:00 open [rule late], 02:00-24:00 unknown [rule fb] (fallback)
    Su 2021-06-13: closed
    "###);
}
