use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Nombre de minutes dans une journée.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Convertit une heure `hh:mm` en minutes depuis minuit (24:00 et au-delà acceptés).
pub const fn hm(hours: u32, minutes: u32) -> u32 {
    hours * 60 + minutes
}

/// Statut d'ouverture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Open,
    Closed,
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Open => "open",
            Status::Closed => "closed",
            Status::Unknown => "unknown",
        })
    }
}

/// Identifiant fort pour Rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Manière dont une règle se combine avec celles qui la précèdent pour un même jour.
///
/// - `Override` (`;`) : remplace tout ce qui a été défini pour le jour.
/// - `Additional` (`,`) : s'ajoute, et gagne là où elle chevauche.
/// - `Fallback` (`||`) : ne remplit que les trous laissés par les règles précédentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Override,
    Additional,
    Fallback,
}

/// Plage de jours de la semaine, bornes incluses (`Sa-Tu` fait le tour de la semaine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayRange {
    pub start: Weekday,
    pub end: Weekday,
}

impl WeekdayRange {
    pub fn new(start: Weekday, end: Weekday) -> Self {
        Self { start, end }
    }

    pub fn single(day: Weekday) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Indices (lundi = 0) couverts par la plage, dans l'ordre de parcours.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let start = self.start.num_days_from_monday() as usize;
        let mut end = self.end.num_days_from_monday() as usize;
        if end < start {
            end += 7;
        }
        (start..=end).map(|i| i % 7)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        let idx = day.num_days_from_monday() as usize;
        self.indices().any(|i| i == idx)
    }
}

/// Plage d'années (`2020-2030/2`, `2021+`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    #[serde(default)]
    pub end: Option<i32>,
    #[serde(default = "default_step")]
    pub step: u32,
    #[serde(default)]
    pub open_ended: bool,
}

impl YearRange {
    pub fn single(year: i32) -> Self {
        Self {
            start: year,
            end: None,
            step: 1,
            open_ended: false,
        }
    }

    pub fn between(start: i32, end: i32) -> Self {
        Self {
            start,
            end: Some(end),
            step: 1,
            open_ended: false,
        }
    }
}

/// Plage de numéros de semaine (`week 01-10/2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
    #[serde(default = "default_step")]
    pub step: u32,
}

impl WeekRange {
    /// `year_weeks` : nombre de semaines de l'année où la plage commence, utilisé
    /// seulement quand la plage chevauche la fin d'année (`50-04/2`).
    pub fn contains(&self, week: u32, year_weeks: u32) -> bool {
        let step = self.step.max(1);
        let distance = if self.start <= self.end {
            if !(self.start..=self.end).contains(&week) {
                return false;
            }
            week - self.start
        } else if week >= self.start {
            week - self.start
        } else if week <= self.end {
            year_weeks.saturating_sub(self.start) + week
        } else {
            return false;
        };
        distance % step == 0
    }
}

fn default_step() -> u32 {
    1
}

/// Dates variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableDate {
    Easter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetDirection {
    Next,
    Previous,
}

/// Décalage vers le prochain (ou précédent) jour de semaine donné : `Dec 24 +Su`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayOffset {
    pub weekday: Weekday,
    pub direction: OffsetDirection,
}

/// Extrémité d'une plage de dates. Les champs absents prennent les valeurs par
/// défaut du contexte (année/mois de la semaine évaluée).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatePoint {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default)]
    pub variable: Option<VariableDate>,
    #[serde(default)]
    pub weekday_offset: Option<WeekdayOffset>,
    #[serde(default)]
    pub day_offset: i64,
}

impl DatePoint {
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month: Some(month),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn month_day(month: u32, day: u32) -> Self {
        Self {
            month: Some(month),
            day: Some(day),
            ..Self::default()
        }
    }

    pub fn month(month: u32) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }

    pub fn easter() -> Self {
        Self {
            variable: Some(VariableDate::Easter),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_day_offset(mut self, days: i64) -> Self {
        self.day_offset = days;
        self
    }

    pub fn with_weekday_offset(mut self, weekday: Weekday, direction: OffsetDirection) -> Self {
        self.weekday_offset = Some(WeekdayOffset { weekday, direction });
        self
    }
}

/// Plage de dates (`Dec 24-Jan 02`, `2021 Jun 01+`, `easter -2 days`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DatePoint,
    #[serde(default)]
    pub end: Option<DatePoint>,
    #[serde(default)]
    pub open_ended: bool,
}

impl DateRange {
    pub fn new(start: DatePoint, end: DatePoint) -> Self {
        Self {
            start,
            end: Some(end),
            open_ended: false,
        }
    }

    pub fn single(point: DatePoint) -> Self {
        Self {
            start: point,
            end: None,
            open_ended: false,
        }
    }

    pub fn open_ended(start: DatePoint) -> Self {
        Self {
            start,
            end: None,
            open_ended: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolidayKind {
    Public,
    School,
}

/// `PH`, `SH`, `PH +1 day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidaySelector {
    pub kind: HolidayKind,
    #[serde(default)]
    pub day_offset: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolarEvent {
    Dawn,
    Sunrise,
    Sunset,
    Dusk,
}

/// Heure fixe (minutes depuis minuit, peut dépasser 1440) ou événement solaire décalé.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePoint {
    Fixed(u32),
    Solar {
        event: SolarEvent,
        #[serde(default)]
        offset: i32,
    },
}

/// Plage horaire. Sans fin, il s'agit d'un instant `[t, t+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: TimePoint,
    #[serde(default)]
    pub end: Option<TimePoint>,
}

impl TimeSpan {
    /// Plage fixe en minutes depuis minuit.
    pub fn fixed(start: u32, end: u32) -> Self {
        Self {
            start: TimePoint::Fixed(start),
            end: Some(TimePoint::Fixed(end)),
        }
    }

    pub fn at(minute: u32) -> Self {
        Self {
            start: TimePoint::Fixed(minute),
            end: None,
        }
    }

    pub fn new(start: TimePoint, end: TimePoint) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// Règle déjà analysée, telle que fournie par le parseur externe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default = "RuleId::random")]
    pub id: RuleId,
    #[serde(default)]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<YearRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weeks: Vec<WeekRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<WeekdayRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<HolidaySelector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<TimeSpan>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule {
    /// Règle `24/7 open` sans restriction.
    pub fn new() -> Self {
        Self {
            id: RuleId::random(),
            kind: RuleKind::Override,
            years: Vec::new(),
            weeks: Vec::new(),
            dates: Vec::new(),
            weekdays: Vec::new(),
            holidays: Vec::new(),
            times: Vec::new(),
            status: Status::Open,
            comment: None,
        }
    }

    pub fn with_id<S: AsRef<str>>(mut self, id: S) -> Self {
        self.id = RuleId::new(id);
        self
    }
    pub fn kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }
    pub fn years(mut self, years: Vec<YearRange>) -> Self {
        self.years = years;
        self
    }
    pub fn weeks(mut self, weeks: Vec<WeekRange>) -> Self {
        self.weeks = weeks;
        self
    }
    pub fn dates(mut self, dates: Vec<DateRange>) -> Self {
        self.dates = dates;
        self
    }
    pub fn weekdays(mut self, weekdays: Vec<WeekdayRange>) -> Self {
        self.weekdays = weekdays;
        self
    }
    pub fn holidays(mut self, holidays: Vec<HolidaySelector>) -> Self {
        self.holidays = holidays;
        self
    }
    pub fn times(mut self, times: Vec<TimeSpan>) -> Self {
        self.times = times;
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.kind == RuleKind::Fallback
    }
}
