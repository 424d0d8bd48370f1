use super::day::DaySchedule;
use super::types::EvalError;
use super::util;
use crate::calendar::{CalendarScope, DateSpan};
use crate::model::{Rule, TimePoint, YearRange, MINUTES_PER_DAY};
use crate::services::Context;
use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

/// Sept jours liés (lundi..dimanche) d'une semaine calendaire, construits en
/// appliquant la liste ordonnée de règles.
#[derive(Debug, Clone)]
pub struct WeekSchedule {
    scope: CalendarScope,
    monday: NaiveDate,
    days: [DaySchedule; 7],
    rules: Arc<[Rule]>,
}

impl WeekSchedule {
    pub fn build(
        rules: Arc<[Rule]>,
        monday: NaiveDate,
        scope: CalendarScope,
        ctx: &Context,
    ) -> Result<Self, EvalError> {
        debug!(
            %monday,
            year = scope.year(),
            month = scope.month(),
            rules = rules.len(),
            "building week schedule"
        );
        // la veille et le lundi suivant doivent exister
        let bounds = monday.pred_opt().zip(monday.checked_add_days(Days::new(7)));
        let Some((eve_date, _)) = bounds else {
            return Err(EvalError::date_range(format!(
                "week of {monday} is out of the supported calendar"
            )));
        };
        let sunday = monday + Duration::days(6);
        let week = DateSpan::new(monday, sunday);
        let mut days: [DaySchedule; 7] =
            std::array::from_fn(|i| DaySchedule::new(monday + Duration::days(i as i64)));

        // La veille (dimanche précédent) est simulée pour amorcer le débordement du lundi.
        let mut eve = DaySchedule::new(eve_date);

        for rule in rules.iter() {
            let filter = RuleFilter::new(rule, &scope)?;
            if filter.matches(eve_date, ctx) {
                eve.apply_rule(rule, &resolve_spans(rule, eve_date, ctx));
            }

            if !filter.touches(&week) {
                trace!(rule = %rule.id, "rule dates outside of week, skipped");
                continue;
            }
            for day in days.iter_mut() {
                if filter.matches(day.date(), ctx) {
                    let spans = resolve_spans(rule, day.date(), ctx);
                    day.apply_rule(rule, &spans);
                }
            }
        }

        days[0].queue_spill(eve.outgoing().to_vec());
        // dimanche → lundi suivant : pris en charge par la veille de la semaine suivante
        for i in 0..6 {
            let outgoing = days[i].outgoing().to_vec();
            days[util::next_day(i)].queue_spill(outgoing);
        }
        for day in days.iter_mut() {
            day.flush_spill();
        }

        Ok(Self {
            scope,
            monday,
            days,
            rules,
        })
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn scope(&self) -> CalendarScope {
        self.scope
    }

    pub fn year(&self) -> i32 {
        self.scope.year()
    }

    pub fn month(&self) -> u32 {
        self.scope.month()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn days(&self) -> &[DaySchedule; 7] {
        &self.days
    }

    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[util::weekday_index(weekday)]
    }

    /// Le jour appartient-il au mois de référence de cette semaine ?
    pub fn covers(&self, weekday: Weekday) -> bool {
        let date = self.day(weekday).date();
        date.year() == self.scope.year() && date.month() == self.scope.month()
    }

    pub(super) fn replace_day(&mut self, day: DaySchedule) {
        let idx = util::weekday_index(day.weekday());
        self.days[idx] = day;
    }
}

/// Sélecteurs de dates d'une règle, résolus pour un contexte de semaine.
struct RuleFilter<'a> {
    rule: &'a Rule,
    spans: Vec<DateSpan>,
}

impl<'a> RuleFilter<'a> {
    fn new(rule: &'a Rule, scope: &CalendarScope) -> Result<Self, EvalError> {
        for years in &rule.years {
            validate_years(years).map_err(|e| e.for_rule(&rule.id))?;
        }
        let mut spans = Vec::new();
        for range in &rule.dates {
            let resolved = scope.resolve(range).map_err(|e| e.for_rule(&rule.id))?;
            spans.extend(resolved);
        }
        Ok(Self { rule, spans })
    }

    fn touches(&self, week: &DateSpan) -> bool {
        self.rule.dates.is_empty() || self.spans.iter().any(|s| s.intersect(week).is_some())
    }

    fn matches(&self, date: NaiveDate, ctx: &Context) -> bool {
        let rule = self.rule;
        let year_ok =
            rule.years.is_empty() || rule.years.iter().any(|y| year_matches(y, date.year()));
        let week_ok = rule.weeks.is_empty() || {
            let week = ctx.week_number(date);
            let year_weeks = ctx.previous_year_weeks(date);
            rule.weeks.iter().any(|w| w.contains(week, year_weeks))
        };
        let date_ok = rule.dates.is_empty() || self.spans.iter().any(|s| s.contains(date));
        year_ok && week_ok && date_ok && day_selected(rule, date, ctx)
    }
}

fn validate_years(years: &YearRange) -> Result<(), EvalError> {
    match years.end {
        Some(end) if end < years.start => Err(EvalError::IllegalYearRange {
            start: years.start,
            end,
            rule: None,
        }),
        _ => Ok(()),
    }
}

fn year_matches(years: &YearRange, year: i32) -> bool {
    if year < years.start {
        return false;
    }
    let upper_ok = years.open_ended || year <= years.end.unwrap_or(years.start);
    let step = i64::from(years.step.max(1));
    upper_ok && (i64::from(year) - i64::from(years.start)) % step == 0
}

/// Jours de semaine et jours fériés se combinent par union (`Su,PH`).
fn day_selected(rule: &Rule, date: NaiveDate, ctx: &Context) -> bool {
    if rule.weekdays.is_empty() && rule.holidays.is_empty() {
        return true;
    }
    let weekday = date.weekday();
    rule.weekdays.iter().any(|r| r.contains(weekday))
        || rule.holidays.iter().any(|h| {
            Duration::try_days(h.day_offset)
                .and_then(|offset| date.checked_sub_signed(offset))
                .is_some_and(|d| ctx.is_holiday(d, h.kind))
        })
}

/// Plages horaires de la règle pour `date`, en minutes étendues (fin > 1440 si
/// la plage passe minuit).
fn resolve_spans(rule: &Rule, date: NaiveDate, ctx: &Context) -> Vec<Range<u32>> {
    if rule.times.is_empty() {
        return vec![0..MINUTES_PER_DAY];
    }
    rule.times
        .iter()
        .map(|span| {
            let start = resolve_point(span.start, date, ctx);
            let end = match span.end {
                None => start + 1,
                Some(point) => {
                    let end = resolve_point(point, date, ctx);
                    if end <= start {
                        end + MINUTES_PER_DAY
                    } else {
                        end
                    }
                }
            };
            start..end.min(start + MINUTES_PER_DAY)
        })
        .collect()
}

fn resolve_point(point: TimePoint, date: NaiveDate, ctx: &Context) -> u32 {
    match point {
        TimePoint::Fixed(minute) => minute.min(2 * MINUTES_PER_DAY),
        TimePoint::Solar { event, offset } => {
            let minute = i64::from(ctx.solar_minutes(date, event)) + i64::from(offset);
            minute.clamp(0, i64::from(MINUTES_PER_DAY)) as u32
        }
    }
}
