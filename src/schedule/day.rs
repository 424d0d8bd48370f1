use crate::interval::{insert_over, insert_under, TimeInterval};
use crate::model::{Rule, RuleKind, Status, MINUTES_PER_DAY};
use chrono::{Datelike, NaiveDate, Weekday};
use std::mem;
use std::ops::Range;

/// Portion d'une journée avec son statut effectif (les trous sont fermés).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySegment {
    pub span: Range<u32>,
    pub status: Status,
    pub comment: Option<String>,
}

/// Planning d'un jour : intervalles résolus, débordements reçus de la veille et
/// débordements à transmettre au lendemain.
#[derive(Debug, Clone)]
pub struct DaySchedule {
    date: NaiveDate,
    intervals: Vec<TimeInterval>,
    spill: Vec<TimeInterval>,
    outgoing: Vec<TimeInterval>,
}

impl DaySchedule {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            intervals: Vec::new(),
            spill: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    /// Débordements en attente, pas encore fusionnés.
    pub fn spill(&self) -> &[TimeInterval] {
        &self.spill
    }

    /// Ce que ce jour transmet au lendemain (plages passant minuit).
    pub fn outgoing(&self) -> &[TimeInterval] {
        &self.outgoing
    }

    /// Applique une règle ciblant ce jour. `spans` sont en minutes depuis minuit
    /// de ce jour et peuvent dépasser 1440.
    pub fn apply_rule(&mut self, rule: &Rule, spans: &[Range<u32>]) {
        let mut today = Vec::new();
        let mut tomorrow = Vec::new();
        for span in spans {
            let (same_day, next_day) = split_at_midnight(span);
            today.extend(same_day.map(|r| interval_for(rule, r)));
            tomorrow.extend(next_day.map(|r| interval_for(rule, r)));
        }

        match rule.kind {
            RuleKind::Override => {
                self.intervals.clear();
                self.outgoing.clear();
                for iv in today {
                    insert_over(&mut self.intervals, iv);
                }
                for iv in tomorrow {
                    insert_over(&mut self.outgoing, iv);
                }
            }
            RuleKind::Additional => {
                for iv in today {
                    insert_over(&mut self.intervals, iv);
                }
                for iv in tomorrow {
                    insert_over(&mut self.outgoing, iv);
                }
            }
            RuleKind::Fallback => {
                for iv in today {
                    insert_under(&mut self.intervals, iv);
                }
                for iv in tomorrow {
                    insert_under(&mut self.outgoing, iv);
                }
            }
        }
    }

    pub fn queue_spill<I: IntoIterator<Item = TimeInterval>>(&mut self, spill: I) {
        self.spill.extend(spill);
    }

    /// Fusionne les débordements de la veille ; ils priment sur les règles du jour.
    pub fn flush_spill(&mut self) {
        for iv in mem::take(&mut self.spill) {
            insert_over(&mut self.intervals, iv);
        }
    }

    /// Intervalle contenant `minute`, bornes incluses. À une frontière entre deux
    /// intervalles, celui qui commence l'emporte.
    pub fn interval_at(&self, minute: u32) -> Option<&TimeInterval> {
        self.interval_from(minute).or_else(|| {
            self.intervals
                .iter()
                .find(|iv| iv.contains_inclusive(minute))
        })
    }

    /// Intervalle en vigueur à partir de `minute` (`start <= minute < end`).
    pub fn interval_from(&self, minute: u32) -> Option<&TimeInterval> {
        self.intervals.iter().find(|iv| iv.contains(minute))
    }

    pub fn status(&self, minute: u32) -> Option<Status> {
        self.interval_at(minute).map(|iv| iv.status)
    }

    /// Découpe la journée entière en segments contigus, les trous étant fermés.
    pub fn segments(&self) -> Vec<DaySegment> {
        let mut out: Vec<DaySegment> = Vec::new();
        let mut cursor = 0;
        for iv in &self.intervals {
            if iv.start() > cursor {
                push_segment(&mut out, cursor..iv.start(), Status::Closed, None);
            }
            push_segment(&mut out, iv.span(), iv.status, iv.comment.clone());
            cursor = cursor.max(iv.end());
        }
        if cursor < MINUTES_PER_DAY {
            push_segment(&mut out, cursor..MINUTES_PER_DAY, Status::Closed, None);
        }
        out
    }
}

fn push_segment(
    out: &mut Vec<DaySegment>,
    span: Range<u32>,
    status: Status,
    comment: Option<String>,
) {
    if span.is_empty() {
        return;
    }
    if let Some(last) = out.last_mut() {
        if last.span.end == span.start && last.status == status && last.comment == comment {
            last.span.end = span.end;
            return;
        }
    }
    out.push(DaySegment {
        span,
        status,
        comment,
    });
}

/// Sépare une plage étendue en partie du jour et partie du lendemain.
fn split_at_midnight(span: &Range<u32>) -> (Option<Range<u32>>, Option<Range<u32>>) {
    let day = MINUTES_PER_DAY;
    let start = span.start.min(2 * day);
    let end = span.end.clamp(start, 2 * day);
    let (today, tomorrow) = if start >= day {
        (None, Some(start - day..end - day))
    } else if end > day {
        (Some(start..day), Some(0..end - day))
    } else {
        (Some(start..end), None)
    };
    (
        today.filter(|r| !r.is_empty()),
        tomorrow.filter(|r| !r.is_empty() && r.start < day),
    )
}

fn interval_for(rule: &Rule, span: Range<u32>) -> TimeInterval {
    let iv = TimeInterval::new(span.start, span.end, rule.status)
        .with_comment(rule.comment.clone())
        .with_rule(rule.id.clone());
    if rule.is_fallback() {
        iv.as_fallback()
    } else {
        iv
    }
}
