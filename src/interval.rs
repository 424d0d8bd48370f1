use crate::model::{RuleId, Status, MINUTES_PER_DAY};
use std::ops::Range;

/// Position relative de deux intervalles, bornes incluses des deux côtés.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    None,
    ThisInsideOther,
    ThisStartIn,
    ThisEndIn,
    OtherInsideThis,
}

/// Intervalle `[start, end)` en minutes du jour, avec statut et provenance.
///
/// # Invariants
/// `start <= end <= 1440` et `start < 1440`. Une plage qui passe minuit est
/// découpée avant construction ; le reste appartient au jour suivant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeInterval {
    start: u32,
    end: u32,
    pub status: Status,
    pub comment: Option<String>,
    pub fallback: bool,
    pub rule: Option<RuleId>,
}

impl TimeInterval {
    /// Panique si les bornes violent l'invariant.
    pub fn new(start: u32, end: u32, status: Status) -> Self {
        assert!(start <= end, "interval start {start} after end {end}");
        assert!(end <= MINUTES_PER_DAY, "interval end {end} exceeds one day");
        assert!(start < MINUTES_PER_DAY, "degenerate interval at end of day");
        Self {
            start,
            end,
            status,
            comment: None,
            fallback: false,
            rule: None,
        }
    }

    /// Instant unique `[t, t+1)`.
    pub fn point(minute: u32, status: Status) -> Self {
        Self::new(minute, minute + 1, status)
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_rule(mut self, rule: RuleId) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn as_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn span(&self) -> Range<u32> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Même géométrie, même provenance, nouvelles bornes.
    fn reshaped(&self, start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// `start <= minute <= end`
    pub fn contains_inclusive(&self, minute: u32) -> bool {
        self.start <= minute && minute <= self.end
    }

    /// `start <= minute < end`
    pub fn contains(&self, minute: u32) -> bool {
        self.start <= minute && minute < self.end
    }

    pub fn overlap_class(&self, other: &TimeInterval) -> Overlap {
        if self.start > other.end || self.end < other.start {
            return Overlap::None;
        }
        if other.contains_inclusive(self.start) && other.contains_inclusive(self.end) {
            Overlap::ThisInsideOther
        } else if self.contains_inclusive(other.start) && self.contains_inclusive(other.end) {
            Overlap::OtherInsideThis
        } else if other.contains_inclusive(self.start) {
            Overlap::ThisStartIn
        } else {
            Overlap::ThisEndIn
        }
    }

    /// Portion commune, sans statut ni commentaire.
    pub fn overlap_with(&self, other: &TimeInterval) -> Option<Range<u32>> {
        match self.overlap_class(other) {
            Overlap::None => None,
            Overlap::ThisInsideOther => Some(self.span()),
            Overlap::OtherInsideThis => Some(other.span()),
            Overlap::ThisStartIn => Some(self.start..other.end),
            Overlap::ThisEndIn => Some(other.start..self.end),
        }
    }

    /// Ce qui reste de `self` une fois `other` retiré (0, 1 ou 2 morceaux non vides).
    pub fn cut(&self, other: &TimeInterval) -> Vec<TimeInterval> {
        let pieces = match self.overlap_class(other) {
            Overlap::None => return vec![self.clone()],
            Overlap::ThisInsideOther => vec![],
            Overlap::OtherInsideThis => vec![
                self.reshaped(self.start, other.start),
                self.reshaped(other.end, self.end),
            ],
            Overlap::ThisStartIn => vec![self.reshaped(other.end, self.end)],
            Overlap::ThisEndIn => vec![self.reshaped(self.start, other.start)],
        };
        pieces.into_iter().filter(|p| !p.is_empty()).collect()
    }

    pub fn mergeable(&self, other: &TimeInterval) -> bool {
        self.status == other.status && self.comment == other.comment
    }

    pub fn merge(&self, other: &TimeInterval) -> Option<TimeInterval> {
        if !self.mergeable(other) {
            return None;
        }
        match self.overlap_class(other) {
            Overlap::None => None,
            Overlap::ThisInsideOther => Some(other.clone()),
            Overlap::OtherInsideThis => Some(self.clone()),
            Overlap::ThisStartIn => Some(self.reshaped(other.start, self.end)),
            Overlap::ThisEndIn => Some(self.reshaped(self.start, other.end)),
        }
    }

    /// Égalité d'intervalle : mêmes bornes, même statut (commentaire ignoré).
    pub fn same_interval(&self, other: &TimeInterval) -> bool {
        self.start == other.start && self.end == other.end && self.status == other.status
    }
}

/// Trie une liste d'intervalles par début puis fin.
pub fn sort_intervals(intervals: &mut [TimeInterval]) {
    intervals.sort_by_key(|iv| (iv.start, iv.end));
}

/// Insère `new` par-dessus `list` : ce qui chevauche est découpé, `new` gagne.
pub fn insert_over(list: &mut Vec<TimeInterval>, new: TimeInterval) {
    let mut kept: Vec<TimeInterval> = list.iter().flat_map(|iv| iv.cut(&new)).collect();
    if !new.is_empty() {
        kept.push(new);
    }
    sort_intervals(&mut kept);
    *list = kept;
}

/// Insère `new` seulement dans les trous de `list`.
pub fn insert_under(list: &mut Vec<TimeInterval>, new: TimeInterval) {
    let mut pieces = vec![new];
    for existing in list.iter() {
        pieces = pieces.iter().flat_map(|p| p.cut(existing)).collect();
    }
    list.extend(pieces.into_iter().filter(|p| !p.is_empty()));
    sort_intervals(list);
}
