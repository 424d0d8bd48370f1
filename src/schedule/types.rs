use crate::model::{RuleId, Status};
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("illegal date range: {message}")]
    IllegalDateRange {
        message: String,
        rule: Option<RuleId>,
    },
    #[error("illegal year range: {end} is before {start}")]
    IllegalYearRange {
        start: i32,
        end: i32,
        rule: Option<RuleId>,
    },
}

impl EvalError {
    pub(crate) fn date_range<S: Into<String>>(message: S) -> Self {
        Self::IllegalDateRange {
            message: message.into(),
            rule: None,
        }
    }

    /// Règle fautive, quand elle est connue.
    pub fn rule(&self) -> Option<&RuleId> {
        match self {
            Self::IllegalDateRange { rule, .. } | Self::IllegalYearRange { rule, .. } => {
                rule.as_ref()
            }
        }
    }

    pub(crate) fn for_rule(mut self, id: &RuleId) -> Self {
        match &mut self {
            Self::IllegalDateRange { rule, .. } | Self::IllegalYearRange { rule, .. } => {
                rule.get_or_insert_with(|| id.clone());
            }
        }
        self
    }
}

/// Résultat d'une requête ponctuelle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: Status,
    pub comment: Option<String>,
}

impl StatusReport {
    pub fn closed() -> Self {
        Self {
            status: Status::Closed,
            comment: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == Status::Open
    }
}

/// Résultat d'une recherche de changement de statut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Le statut change en `at`. `status` est le statut qui diffère du statut de départ :
    /// celui qui commence en `at` (recherche vers l'avant) ou celui qui s'achève en `at`
    /// (recherche vers l'arrière).
    Change {
        at: NaiveDateTime,
        status: Status,
        comment: Option<String>,
    },
    /// Aucun changement dans l'horizon de recherche.
    Always {
        status: Status,
        comment: Option<String>,
    },
}

impl Event {
    pub fn is_always(&self) -> bool {
        matches!(self, Event::Always { .. })
    }

    pub fn at(&self) -> Option<NaiveDateTime> {
        match self {
            Event::Change { at, .. } => Some(*at),
            Event::Always { .. } => None,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Event::Change { status, .. } | Event::Always { status, .. } => *status,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Event::Change { comment, .. } | Event::Always { comment, .. } => comment.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}
