mod builder;
mod day;
mod search;
mod types;
mod util;
mod week;

pub use builder::{ScheduleBuilder, Segment};
pub use day::{DaySchedule, DaySegment};
pub use search::EventSearch;
pub use types::{Direction, EvalError, Event, StatusReport};
pub use week::WeekSchedule;

pub(crate) use util::{fmt_minutes, weekday_abbrev};

use crate::model::Rule;
use crate::render::WeekRenderer;
use crate::services::Context;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Évaluateur : une liste de règles en lecture seule et les services injectés.
/// Chaque requête reconstruit les semaines dont elle a besoin.
#[derive(Debug, Clone)]
pub struct Evaluator {
    rules: Arc<[Rule]>,
    ctx: Context,
}

impl Evaluator {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: rules.into(),
            ctx: Context::default(),
        }
    }

    pub fn with_context(mut self, ctx: Context) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn schedule_at(&self, date: NaiveDate) -> Result<ScheduleBuilder, EvalError> {
        ScheduleBuilder::build(Arc::clone(&self.rules), &self.ctx, date)
    }

    pub fn status(&self, at: NaiveDateTime) -> Result<StatusReport, EvalError> {
        Ok(self.schedule_at(at.date())?.status(at))
    }

    pub fn is_open(&self, at: NaiveDateTime) -> Result<bool, EvalError> {
        self.status(at).map(|report| report.is_open())
    }

    pub fn next_event(&self, at: NaiveDateTime) -> Result<Event, EvalError> {
        EventSearch::new(Arc::clone(&self.rules), &self.ctx).run(at, Direction::Forward)
    }

    pub fn previous_event(&self, at: NaiveDateTime) -> Result<Event, EvalError> {
        EventSearch::new(Arc::clone(&self.rules), &self.ctx).run(at, Direction::Backward)
    }

    /// Rendu de la semaine contenant `date`, débordement de mois fusionné.
    pub fn render(
        &self,
        date: NaiveDate,
        renderer: &dyn WeekRenderer,
    ) -> Result<String, EvalError> {
        let week = self.schedule_at(date)?.squashed_week_data();
        Ok(renderer.render(&week))
    }
}
