#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use horaire::calendar::{last_day_of_month, shift_to_weekday};
use horaire::model::{OffsetDirection, WeekdayOffset};
use horaire::{easter, CalendarScope, DatePoint, DateRange, DateSpan, EvalError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn span(start: NaiveDate, end: NaiveDate) -> DateSpan {
    DateSpan::new(start, end)
}

#[test]
fn easter_dates() {
    assert_eq!(easter(2021), Some(date(2021, 4, 4)));
    assert_eq!(easter(2019), Some(date(2019, 4, 21)));
    assert_eq!(easter(2024), Some(date(2024, 3, 31)));
    assert_eq!(easter(2038), Some(date(2038, 4, 25)));
}

#[test]
fn month_lengths() {
    assert_eq!(last_day_of_month(2024, 2), Some(29));
    assert_eq!(last_day_of_month(2023, 2), Some(28));
    assert_eq!(last_day_of_month(2021, 12), Some(31));
    assert_eq!(last_day_of_month(2021, 13), None);
}

#[test]
fn weekday_shift_is_strict() {
    let next_sunday = WeekdayOffset {
        weekday: Weekday::Sun,
        direction: OffsetDirection::Next,
    };
    // 2021-12-24 est un vendredi
    assert_eq!(shift_to_weekday(date(2021, 12, 24), next_sunday), Some(date(2021, 12, 26)));
    assert_eq!(shift_to_weekday(date(2021, 12, 26), next_sunday), Some(date(2022, 1, 2)));

    let previous_monday = WeekdayOffset {
        weekday: Weekday::Mon,
        direction: OffsetDirection::Previous,
    };
    assert_eq!(shift_to_weekday(date(2021, 12, 24), previous_monday), Some(date(2021, 12, 20)));
}

#[test]
fn explicit_range() {
    let scope = CalendarScope::new(2021, 6);
    let range = DateRange::new(DatePoint::ymd(2021, 3, 10), DatePoint::ymd(2021, 4, 2));
    assert_eq!(scope.resolve(&range).unwrap(), vec![span(date(2021, 3, 10), date(2021, 4, 2))]);
}

#[test]
fn undefined_days_cover_whole_months() {
    let scope = CalendarScope::new(2024, 6);
    let range = DateRange::new(DatePoint::month(1), DatePoint::month(3));
    assert_eq!(scope.resolve(&range).unwrap(), vec![span(date(2024, 1, 1), date(2024, 3, 31))]);

    let february = DateRange::single(DatePoint::month(2));
    assert_eq!(scope.resolve(&february).unwrap(), vec![span(date(2024, 2, 1), date(2024, 2, 29))]);
}

#[test]
fn end_without_month_inherits_start_month() {
    let scope = CalendarScope::new(2021, 6);
    let end = DatePoint {
        day: Some(10),
        ..DatePoint::default()
    };
    let range = DateRange::new(DatePoint::month_day(1, 5), end);
    assert_eq!(scope.resolve(&range).unwrap(), vec![span(date(2021, 1, 5), date(2021, 1, 10))]);
}

#[test]
fn single_day_and_clamped_day() {
    let scope = CalendarScope::new(2021, 1);
    let christmas = DateRange::single(DatePoint::month_day(12, 25));
    assert_eq!(
        scope.resolve(&christmas).unwrap(),
        vec![span(date(2021, 12, 25), date(2021, 12, 25))]
    );

    let feb_30 = DateRange::single(DatePoint::month_day(2, 30));
    assert_eq!(scope.resolve(&feb_30).unwrap(), vec![span(date(2021, 2, 28), date(2021, 2, 28))]);
}

#[test]
fn year_wrapping_range_yields_two_alternatives() {
    let scope = CalendarScope::new(2021, 12);
    let range = DateRange::new(DatePoint::month_day(12, 24), DatePoint::month_day(1, 2));
    assert_eq!(
        scope.resolve(&range).unwrap(),
        vec![
            span(date(2021, 12, 24), date(2022, 1, 2)),
            span(date(2020, 12, 24), date(2021, 1, 2)),
        ]
    );
}

#[test]
fn start_year_only_rolls_end_into_next_year() {
    let scope = CalendarScope::new(2021, 6);
    let range = DateRange::new(DatePoint::ymd(2021, 12, 1), DatePoint::month_day(1, 15));
    assert_eq!(scope.resolve(&range).unwrap(), vec![span(date(2021, 12, 1), date(2022, 1, 15))]);
}

#[test]
fn open_ended_ranges_use_fixed_table() {
    let scope = CalendarScope::new(2000, 1);
    let cases = [
        (DatePoint::ymd(2021, 3, 1), date(2021, 12, 31)),
        (DatePoint::ymd(2021, 6, 30), date(2021, 12, 31)),
        (DatePoint::ymd(2021, 7, 1), date(2022, 3, 31)),
        (DatePoint::ymd(2021, 8, 1), date(2022, 4, 30)),
        (DatePoint::ymd(2021, 11, 15), date(2022, 5, 31)),
        (DatePoint::ymd(2021, 12, 1), date(2022, 6, 30)),
    ];
    for (start, expected_end) in cases {
        let spans = scope.resolve(&DateRange::open_ended(start)).unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, expected_end, "open end for {start:?}");
    }
}

#[test]
fn easter_with_offsets() {
    let scope = CalendarScope::new(2021, 4);
    let good_friday = DateRange::single(DatePoint::easter().with_day_offset(-2));
    assert_eq!(
        scope.resolve(&good_friday).unwrap(),
        vec![span(date(2021, 4, 2), date(2021, 4, 2))]
    );

    let explicit = DateRange::single(DatePoint::easter().with_year(2024));
    assert_eq!(scope.resolve(&explicit).unwrap()[0].start, date(2024, 3, 31));

    let following_monday = DateRange::single(
        DatePoint::easter().with_weekday_offset(Weekday::Mon, OffsetDirection::Next),
    );
    assert_eq!(scope.resolve(&following_monday).unwrap()[0].start, date(2021, 4, 5));
}

#[test]
fn weekday_offset_then_day_offset() {
    let scope = CalendarScope::new(2021, 12);
    let point = DatePoint::month_day(12, 24)
        .with_weekday_offset(Weekday::Sun, OffsetDirection::Next)
        .with_day_offset(1);
    let spans = scope.resolve(&DateRange::single(point)).unwrap();
    assert_eq!(spans[0].start, date(2021, 12, 27));
}

#[test]
fn open_ended_without_year_is_rejected() {
    let scope = CalendarScope::new(2021, 6);
    let err = scope
        .resolve(&DateRange::open_ended(DatePoint::month_day(6, 1)))
        .unwrap_err();
    assert!(matches!(err, EvalError::IllegalDateRange { .. }));
    assert!(err.to_string().contains("explicit start year"));
}

#[test]
fn end_year_without_start_year_is_rejected() {
    let scope = CalendarScope::new(2021, 6);
    let range = DateRange::new(DatePoint::month_day(1, 1), DatePoint::ymd(2022, 2, 1));
    assert!(matches!(scope.resolve(&range), Err(EvalError::IllegalDateRange { .. })));
}

#[test]
fn reversed_explicit_range_is_rejected() {
    let scope = CalendarScope::new(2021, 6);
    let range = DateRange::new(DatePoint::ymd(2022, 1, 1), DatePoint::ymd(2021, 1, 1));
    let err = scope.resolve(&range).unwrap_err();
    assert!(err.to_string().contains("is after end"));
}

#[test]
fn out_of_range_offsets_and_years_are_rejected() {
    let scope = CalendarScope::new(2021, 6);
    for offset in [i64::MAX, i64::MIN] {
        let point = DatePoint::month_day(6, 1).with_day_offset(offset);
        let err = scope.resolve(&DateRange::single(point)).unwrap_err();
        assert!(matches!(err, EvalError::IllegalDateRange { .. }));
    }

    let last_year = DateRange::single(DatePoint::month(12).with_year(i32::MAX));
    assert!(scope.resolve(&last_year).is_err());

    let wrapping = DateRange::new(
        DatePoint::month_day(12, 24).with_year(i32::MAX),
        DatePoint::month_day(1, 2),
    );
    assert!(scope.resolve(&wrapping).is_err());

    let open = DateRange::open_ended(DatePoint::ymd(i32::MAX, 8, 1));
    assert!(scope.resolve(&open).is_err());
}

#[test]
fn invalid_month_is_rejected() {
    let scope = CalendarScope::new(2021, 6);
    let range = DateRange::single(DatePoint::month(13));
    assert!(scope.resolve(&range).is_err());
}

#[test]
fn date_span_intersection() {
    let week = span(date(2021, 12, 27), date(2022, 1, 2));
    let holidays = span(date(2021, 12, 24), date(2021, 12, 28));
    assert_eq!(week.intersect(&holidays), Some(span(date(2021, 12, 27), date(2021, 12, 28))));
    assert_eq!(week.intersect(&span(date(2022, 2, 1), date(2022, 2, 3))), None);
    assert!(week.contains(date(2022, 1, 2)));
}
