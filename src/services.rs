//! Services externes consommés en lecture seule : jours fériés, heures solaires,
//! numérotation des semaines. Construits une fois et injectés via [`Context`].

use crate::io::{EvalConfig, HolidayEntry};
use crate::model::{hm, HolidayKind, SolarEvent};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Borne par défaut de la recherche d'événements, en semaines dans chaque direction.
pub const DEFAULT_SEARCH_HORIZON_WEEKS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

pub trait HolidayLookup: Debug + Send + Sync {
    /// Nom du jour férié (ou des vacances scolaires) couvrant `date`.
    fn lookup(&self, date: NaiveDate, kind: HolidayKind) -> Option<String>;
}

pub trait SolarTime: Debug + Send + Sync {
    /// Heure locale de l'événement, `None` s'il n'a pas lieu ce jour-là (latitudes polaires).
    fn solar_event(
        &self,
        date: NaiveDate,
        coordinates: Option<Coordinates>,
        event: SolarEvent,
    ) -> Option<NaiveTime>;
}

pub trait WeekNumbering: Debug + Send + Sync {
    fn week_number(&self, date: NaiveDate, locale: Option<&str>) -> u32;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHolidays;

impl HolidayLookup for NoHolidays {
    fn lookup(&self, _date: NaiveDate, _kind: HolidayKind) -> Option<String> {
        None
    }
}

/// Table de jours fériés en mémoire, restreinte à un pays / une subdivision.
#[derive(Debug, Default, Clone)]
pub struct StaticHolidays {
    entries: BTreeMap<(NaiveDate, HolidayKind), String>,
}

impl StaticHolidays {
    /// Garde les entrées sans région, ou dont une région vaut `country` ou
    /// `country-subregion` (comparaison insensible à la casse).
    pub fn new(
        entries: &[HolidayEntry],
        country: Option<&str>,
        subregion: Option<&str>,
    ) -> Self {
        let wanted: Vec<String> = match (country, subregion) {
            (Some(c), Some(s)) => vec![
                c.to_ascii_lowercase(),
                format!("{c}-{s}").to_ascii_lowercase(),
            ],
            (Some(c), None) => vec![c.to_ascii_lowercase()],
            _ => Vec::new(),
        };
        let entries = entries
            .iter()
            .filter(|e| {
                e.regions.is_empty()
                    || e.regions
                        .iter()
                        .any(|r| wanted.contains(&r.to_ascii_lowercase()))
            })
            .map(|e| ((e.date, e.kind), e.name.clone()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HolidayLookup for StaticHolidays {
    fn lookup(&self, date: NaiveDate, kind: HolidayKind) -> Option<String> {
        self.entries.get(&(date, kind)).cloned()
    }
}

/// Heures solaires fixes, utilisées aussi quand un service ne sait pas répondre.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedSolarTime;

impl FixedSolarTime {
    pub fn minutes(event: SolarEvent) -> u32 {
        match event {
            SolarEvent::Dawn => hm(5, 30),
            SolarEvent::Sunrise => hm(6, 0),
            SolarEvent::Sunset => hm(18, 0),
            SolarEvent::Dusk => hm(18, 30),
        }
    }
}

impl SolarTime for FixedSolarTime {
    fn solar_event(
        &self,
        _date: NaiveDate,
        _coordinates: Option<Coordinates>,
        event: SolarEvent,
    ) -> Option<NaiveTime> {
        let minutes = Self::minutes(event);
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
    }
}

/// Numérotation ISO-8601, quelle que soit la locale.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoWeekNumbering;

impl WeekNumbering for IsoWeekNumbering {
    fn week_number(&self, date: NaiveDate, _locale: Option<&str>) -> u32 {
        date.iso_week().week()
    }
}

/// Services et réglages partagés par toutes les évaluations.
#[derive(Debug, Clone)]
pub struct Context {
    pub holidays: Arc<dyn HolidayLookup>,
    pub solar: Arc<dyn SolarTime>,
    pub weeks: Arc<dyn WeekNumbering>,
    pub coordinates: Option<Coordinates>,
    pub locale: Option<String>,
    pub search_horizon_weeks: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            holidays: Arc::new(NoHolidays),
            solar: Arc::new(FixedSolarTime),
            weeks: Arc::new(IsoWeekNumbering),
            coordinates: None,
            locale: None,
            search_horizon_weeks: DEFAULT_SEARCH_HORIZON_WEEKS,
        }
    }
}

impl Context {
    pub fn from_config(config: &EvalConfig) -> Self {
        let holidays = StaticHolidays::new(
            &config.holidays,
            config.country.as_deref(),
            config.subregion.as_deref(),
        );
        Self {
            holidays: Arc::new(holidays),
            coordinates: config.coordinates,
            locale: config.locale.clone(),
            search_horizon_weeks: config.search_horizon_weeks,
            ..Self::default()
        }
    }

    pub fn with_holidays(mut self, holidays: Arc<dyn HolidayLookup>) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_solar(mut self, solar: Arc<dyn SolarTime>) -> Self {
        self.solar = solar;
        self
    }

    pub fn with_weeks(mut self, weeks: Arc<dyn WeekNumbering>) -> Self {
        self.weeks = weeks;
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_search_horizon(mut self, weeks: u32) -> Self {
        self.search_horizon_weeks = weeks;
        self
    }

    /// Minute du jour d'un événement solaire, avec repli sur les heures fixes.
    pub fn solar_minutes(&self, date: NaiveDate, event: SolarEvent) -> u32 {
        match self.solar.solar_event(date, self.coordinates, event) {
            Some(time) => time.hour() * 60 + time.minute(),
            None => FixedSolarTime::minutes(event),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate, kind: HolidayKind) -> bool {
        self.holidays.lookup(date, kind).is_some()
    }

    pub fn week_number(&self, date: NaiveDate) -> u32 {
        self.weeks.week_number(date, self.locale.as_deref())
    }

    /// Nombre de semaines de l'année de numérotation précédant celle de `date`,
    /// lu sur la dernière semaine de cette année-là.
    pub fn previous_year_weeks(&self, date: NaiveDate) -> u32 {
        let week = self.week_number(date);
        date.checked_sub_days(Days::new(7 * u64::from(week)))
            .map_or(52, |last_week| self.week_number(last_week))
    }
}
