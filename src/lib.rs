#![forbid(unsafe_code)]
//! Horaire : évaluation de règles d'horaires d'ouverture (grammaire OSM `opening_hours`).
//!
//! - Règles déjà analysées en entrée (le parseur est externe).
//! - Planning hebdomadaire par jour, débordements après minuit compris.
//! - Statut ouvert / fermé / inconnu à un instant, recherche du prochain changement.
//! - Jours fériés, heures solaires et numéros de semaine fournis par des services injectés.

pub mod calendar;
pub mod interval;
pub mod io;
#[cfg(feature = "logging")]
pub mod logging;
pub mod model;
pub mod render;
pub mod schedule;
pub mod services;

pub use calendar::{easter, CalendarScope, DateSpan};
pub use interval::{Overlap, TimeInterval};
pub use io::{load_config_from_file, load_rules_from_file, EvalConfig, HolidayEntry};
pub use model::{
    hm, DatePoint, DateRange, HolidayKind, HolidaySelector, Rule, RuleId, RuleKind, SolarEvent,
    Status, TimePoint, TimeSpan, WeekRange, WeekdayRange, YearRange,
};
pub use render::{DebugDump, TextDump, WeekRenderer};
pub use schedule::{
    DaySchedule, Direction, EvalError, Evaluator, Event, EventSearch, ScheduleBuilder,
    StatusReport, WeekSchedule,
};
pub use services::{Context, Coordinates, HolidayLookup, SolarTime, StaticHolidays, WeekNumbering};
