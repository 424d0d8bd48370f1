//! Résolution des plages de dates en intervalles de jours concrets.
//!
//! Les champs manquants d'une date prennent les valeurs du contexte (année et
//! mois de la semaine évaluée). Une plage sans année dont le début tombe après la
//! fin fait le tour de l'année et produit deux alternatives.

use crate::model::{DatePoint, DateRange, OffsetDirection, VariableDate, WeekdayOffset};
use crate::schedule::EvalError;
use chrono::{Datelike, Duration, NaiveDate};
use tracing::trace;

/// Intervalle de jours, bornes incluses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn intersect(&self, other: &DateSpan) -> Option<DateSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateSpan { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Start,
    End,
}

/// Contexte de résolution : année et mois par défaut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarScope {
    default_year: i32,
    default_month: u32,
}

impl CalendarScope {
    pub fn new(default_year: i32, default_month: u32) -> Self {
        Self {
            default_year,
            default_month,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.default_year
    }

    pub fn month(&self) -> u32 {
        self.default_month
    }

    /// Résout une plage en un ou deux intervalles ; deux quand la plage fait le
    /// tour de l'année, l'appelant les traite comme des alternatives.
    pub fn resolve(&self, range: &DateRange) -> Result<Vec<DateSpan>, EvalError> {
        let start = &range.start;

        let Some(end) = range.end.as_ref() else {
            return self.resolve_without_end(range).map(|span| vec![span]);
        };

        if start.year.is_none() && end.year.is_some() {
            return Err(EvalError::date_range(
                "start year is undefined while end year is defined",
            ));
        }

        let year = start.year.unwrap_or(self.default_year);
        let start_month = start.month.unwrap_or(self.default_month);
        let from = self.resolve_point(start, Endpoint::Start, year, self.default_month)?;
        let to = self.resolve_point(end, Endpoint::End, end.year.unwrap_or(year), start_month)?;

        if from <= to {
            trace!(%from, %to, "resolved date range");
            return Ok(vec![DateSpan::new(from, to)]);
        }

        match (start.year, end.year) {
            (None, _) => {
                let y = self.default_year;
                let current = DateSpan::new(
                    self.resolve_point(start, Endpoint::Start, y, self.default_month)?,
                    self.resolve_point(end, Endpoint::End, shift_year(y, 1)?, start_month)?,
                );
                let previous = DateSpan::new(
                    self.resolve_point(
                        start,
                        Endpoint::Start,
                        shift_year(y, -1)?,
                        self.default_month,
                    )?,
                    self.resolve_point(end, Endpoint::End, y, start_month)?,
                );
                trace!(?current, ?previous, "date range wraps around the year");
                Ok(vec![current, previous])
            }
            (Some(y), None) => {
                let to = self.resolve_point(end, Endpoint::End, shift_year(y, 1)?, start_month)?;
                if from > to {
                    return Err(EvalError::date_range(format!(
                        "start {from} is after end {to}"
                    )));
                }
                Ok(vec![DateSpan::new(from, to)])
            }
            (Some(_), Some(_)) => Err(EvalError::date_range(format!(
                "start {from} is after end {to}"
            ))),
        }
    }

    fn resolve_without_end(&self, range: &DateRange) -> Result<DateSpan, EvalError> {
        let start = &range.start;
        if range.open_ended {
            let Some(year) = start.year else {
                return Err(EvalError::date_range(
                    "open-ended date range requires an explicit start year",
                ));
            };
            let from = self.resolve_point(start, Endpoint::Start, year, self.default_month)?;
            return Ok(DateSpan::new(from, open_end(from)?));
        }

        let year = start.year.unwrap_or(self.default_year);
        let from = self.resolve_point(start, Endpoint::Start, year, self.default_month)?;
        let to = if start.day.is_none() && start.variable.is_none() {
            // mois entier
            self.resolve_point(start, Endpoint::End, year, self.default_month)?
        } else {
            from
        };
        Ok(DateSpan::new(from, to))
    }

    fn resolve_point(
        &self,
        point: &DatePoint,
        endpoint: Endpoint,
        year: i32,
        fallback_month: u32,
    ) -> Result<NaiveDate, EvalError> {
        let base = match point.variable {
            Some(VariableDate::Easter) => easter(year)
                .ok_or_else(|| EvalError::date_range(format!("no easter date for {year}")))?,
            None => {
                let month = point.month.unwrap_or(fallback_month);
                let last = last_day_of_month(year, month).ok_or_else(|| {
                    EvalError::date_range(format!("invalid month {month} in year {year}"))
                })?;
                let day = match (point.day, endpoint) {
                    (Some(day), _) => day.clamp(1, last),
                    (None, Endpoint::Start) => 1,
                    (None, Endpoint::End) => last,
                };
                NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                    EvalError::date_range(format!("invalid date {year}-{month}-{day}"))
                })?
            }
        };

        let shifted = match point.weekday_offset {
            Some(offset) => shift_to_weekday(base, offset),
            None => Some(base),
        };
        shifted
            .zip(Duration::try_days(point.day_offset))
            .and_then(|(date, offset)| date.checked_add_signed(offset))
            .ok_or_else(|| EvalError::date_range(format!("date offset out of range from {base}")))
    }
}

/// Fin implicite d'une plage ouverte (`2021 Jun 01+`).
fn open_end(start: NaiveDate) -> Result<NaiveDate, EvalError> {
    let month = start.month();
    let next = shift_year(start.year(), 1)?;
    let (year, month) = match month {
        1..=6 => (start.year(), 12),
        7..=9 => (next, month + 8 - 12),
        _ => (next, month + 6 - 12),
    };
    last_day_of_month(year, month)
        .and_then(|day| NaiveDate::from_ymd_opt(year, month, day))
        .ok_or_else(|| EvalError::date_range(format!("no open end for {start}")))
}

fn shift_year(year: i32, by: i32) -> Result<i32, EvalError> {
    year.checked_add(by)
        .ok_or_else(|| EvalError::date_range(format!("year {year} is out of range")))
}

/// Dimanche de Pâques (algorithme de Meeus/Jones/Butcher).
pub fn easter(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Dernier jour du mois, `None` pour un mois invalide.
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt().map(|d| d.day())
}

/// Prochain (ou précédent) jour de semaine donné, strictement après (avant) `date`.
pub fn shift_to_weekday(date: NaiveDate, offset: WeekdayOffset) -> Option<NaiveDate> {
    let step = match offset.direction {
        OffsetDirection::Next => Duration::days(1),
        OffsetDirection::Previous => Duration::days(-1),
    };
    let mut current = date;
    for _ in 0..7 {
        current = current.checked_add_signed(step)?;
        if current.weekday() == offset.weekday {
            return Some(current);
        }
    }
    None
}
