use super::builder::{ScheduleBuilder, Segment};
use super::types::{Direction, EvalError, Event, StatusReport};
use crate::model::Rule;
use crate::services::Context;
use chrono::{Duration, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug)]
enum SearchState {
    Searching { weeks_tried: u32 },
    Found(Event),
    Exhausted(Event),
}

/// Recherche du premier instant dont le statut diffère, semaine par semaine,
/// dans la limite de `search_horizon_weeks` du contexte.
#[derive(Debug)]
pub struct EventSearch<'a> {
    rules: Arc<[Rule]>,
    ctx: &'a Context,
    horizon: u32,
}

impl<'a> EventSearch<'a> {
    pub fn new(rules: Arc<[Rule]>, ctx: &'a Context) -> Self {
        Self {
            rules,
            ctx,
            horizon: ctx.search_horizon_weeks,
        }
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn run(&self, from: NaiveDateTime, direction: Direction) -> Result<Event, EvalError> {
        let reference = ScheduleBuilder::build(Arc::clone(&self.rules), self.ctx, from.date())?
            .status_from(from);
        let mut state = SearchState::Searching { weeks_tried: 0 };

        loop {
            match state {
                SearchState::Searching { weeks_tried } => {
                    state = self.step(from, &reference, direction, weeks_tried)?;
                }
                SearchState::Found(event) => {
                    debug!(?direction, %from, at = ?event.at(), "status change found");
                    return Ok(event);
                }
                SearchState::Exhausted(event) => {
                    debug!(
                        ?direction,
                        %from,
                        horizon = self.horizon,
                        "no status change within horizon"
                    );
                    return Ok(event);
                }
            }
        }
    }

    fn step(
        &self,
        from: NaiveDateTime,
        reference: &StatusReport,
        direction: Direction,
        weeks_tried: u32,
    ) -> Result<SearchState, EvalError> {
        let always = || {
            SearchState::Exhausted(Event::Always {
                status: reference.status,
                comment: reference.comment.clone(),
            })
        };
        if weeks_tried > self.horizon {
            return Ok(always());
        }

        let days = Duration::days(7 * i64::from(weeks_tried));
        let anchor = match direction {
            Direction::Forward => from.date().checked_add_signed(days),
            Direction::Backward => from.date().checked_sub_signed(days),
        };
        let Some(anchor) = anchor else {
            return Ok(always());
        };

        trace!(%anchor, weeks_tried, "scanning week");
        let builder = ScheduleBuilder::build(Arc::clone(&self.rules), self.ctx, anchor)?;
        let segments = builder.segments();
        let found = match direction {
            Direction::Forward => scan_forward(&segments, from, reference),
            Direction::Backward => scan_backward(&segments, from, reference),
        };

        Ok(match found {
            Some(event) => SearchState::Found(event),
            None => SearchState::Searching {
                weeks_tried: weeks_tried + 1,
            },
        })
    }
}

fn scan_forward(
    segments: &[Segment],
    from: NaiveDateTime,
    reference: &StatusReport,
) -> Option<Event> {
    segments
        .iter()
        .find(|s| s.start > from && s.status != reference.status)
        .map(|s| Event::Change {
            at: s.start,
            status: s.status,
            comment: s.comment.clone(),
        })
}

/// Le segment trouvé précède `from` ; sa fin est l'instant où le statut courant a commencé.
fn scan_backward(
    segments: &[Segment],
    from: NaiveDateTime,
    reference: &StatusReport,
) -> Option<Event> {
    segments
        .iter()
        .rev()
        .find(|s| s.start < from && s.status != reference.status)
        .map(|s| Event::Change {
            at: s.end,
            status: s.status,
            comment: s.comment.clone(),
        })
}
