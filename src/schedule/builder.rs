use super::day::DaySchedule;
use super::types::{EvalError, StatusReport};
use super::util;
use super::week::WeekSchedule;
use crate::calendar::CalendarScope;
use crate::model::{Rule, Status};
use crate::services::Context;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use std::sync::Arc;
use tracing::debug;

/// Segment contigu de statut constant, en dates absolues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: Status,
    pub comment: Option<String>,
}

/// Semaine(s) construite(s) autour d'une date de requête.
///
/// Quand la semaine ISO chevauche deux mois et que des règles portent des plages
/// de dates, une seconde semaine est construite avec le contexte de l'autre mois ;
/// chaque jour est lu dans la semaine dont le mois de référence le contient.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    primary: WeekSchedule,
    overflow: Option<WeekSchedule>,
}

impl ScheduleBuilder {
    pub fn build(rules: Arc<[Rule]>, ctx: &Context, date: NaiveDate) -> Result<Self, EvalError> {
        let monday = util::week_start(date).ok_or_else(|| {
            EvalError::date_range(format!("week of {date} is out of the supported calendar"))
        })?;
        let scope = CalendarScope::for_date(date);
        let primary = WeekSchedule::build(Arc::clone(&rules), monday, scope, ctx)?;
        // les bornes de la semaine ont été vérifiées par `WeekSchedule::build`
        let sunday = monday + Duration::days(6);

        let straddles = (monday.year(), monday.month()) != (sunday.year(), sunday.month());
        let overflow = if straddles && rules.iter().any(|r| !r.dates.is_empty()) {
            let other = if scope == CalendarScope::for_date(monday) {
                sunday
            } else {
                monday
            };
            let other_scope = CalendarScope::for_date(other);
            debug!(
                %monday,
                year = other_scope.year(),
                month = other_scope.month(),
                "week straddles two months, building overflow week"
            );
            Some(WeekSchedule::build(rules, monday, other_scope, ctx)?)
        } else {
            None
        };

        Ok(Self { primary, overflow })
    }

    pub fn monday(&self) -> NaiveDate {
        self.primary.monday()
    }

    /// Jour de la semaine construite, lu dans la semaine principale ou de débordement.
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        match &self.overflow {
            Some(overflow) if !self.primary.covers(weekday) => overflow.day(weekday),
            _ => self.primary.day(weekday),
        }
    }

    /// Statut à l'instant `at` (qui doit appartenir à la semaine construite) ;
    /// fermé sans commentaire si aucun intervalle ne correspond.
    pub fn status(&self, at: NaiveDateTime) -> StatusReport {
        let day = self.day(at.weekday());
        day.interval_at(util::minute_of_day(at))
            .map_or_else(StatusReport::closed, |iv| StatusReport {
                status: iv.status,
                comment: iv.comment.clone(),
            })
    }

    /// Statut en vigueur à partir de `at`, borne de fin exclue.
    pub fn status_from(&self, at: NaiveDateTime) -> StatusReport {
        let day = self.day(at.weekday());
        day.interval_from(util::minute_of_day(at))
            .map_or_else(StatusReport::closed, |iv| StatusReport {
                status: iv.status,
                comment: iv.comment.clone(),
            })
    }

    pub fn week_data(&self) -> (&WeekSchedule, Option<&WeekSchedule>) {
        (&self.primary, self.overflow.as_ref())
    }

    /// Semaine principale où les jours hors de son mois sont pris dans la semaine
    /// de débordement.
    pub fn squashed_week_data(&self) -> WeekSchedule {
        let mut squashed = self.primary.clone();
        if let Some(overflow) = &self.overflow {
            for day in overflow.days() {
                if !self.primary.covers(day.weekday()) {
                    squashed.replace_day(day.clone());
                }
            }
        }
        squashed
    }

    /// Segments de lundi 00:00 au lundi suivant 00:00.
    pub fn segments(&self) -> Vec<Segment> {
        let mut out: Vec<Segment> = Vec::new();
        let monday = self.monday();
        for offset in 0..7 {
            let date = monday + Duration::days(offset);
            for seg in self.day(date.weekday()).segments() {
                let start = util::at_minute(date, seg.span.start);
                let end = util::at_minute(date, seg.span.end);
                match out.last_mut() {
                    Some(last)
                        if last.end == start
                            && last.status == seg.status
                            && last.comment == seg.comment =>
                    {
                        last.end = end;
                    }
                    _ => out.push(Segment {
                        start,
                        end,
                        status: seg.status,
                        comment: seg.comment,
                    }),
                }
            }
        }
        out
    }
}
