use crate::model::MINUTES_PER_DAY;
use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

pub(super) fn weekday_index(day: Weekday) -> usize {
    day.num_days_from_monday() as usize
}

/// Jour suivant dans l'anneau lundi..dimanche.
pub(super) fn next_day(index: usize) -> usize {
    (index + 1) % 7
}

/// Lundi de la semaine de `date`, `None` aux limites du calendrier.
pub(crate) fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

pub(crate) fn minute_of_day(at: NaiveDateTime) -> u32 {
    at.hour() * 60 + at.minute()
}

/// Instant `minute` du jour `date` ; 24:00 devient minuit le lendemain.
pub(super) fn at_minute(date: NaiveDate, minute: u32) -> NaiveDateTime {
    let base = date.and_time(chrono::NaiveTime::MIN);
    base + Duration::minutes(i64::from(minute.min(MINUTES_PER_DAY)))
}

pub(crate) fn fmt_minutes(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

pub(crate) fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}
