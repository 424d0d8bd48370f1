use crate::model::{HolidayKind, Rule, TimePoint, MINUTES_PER_DAY};
use crate::services::{Coordinates, DEFAULT_SEARCH_HORIZON_WEEKS};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration de l'évaluateur (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default = "default_horizon")]
    pub search_horizon_weeks: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holidays: Vec<HolidayEntry>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            country: None,
            subregion: None,
            locale: None,
            coordinates: None,
            search_horizon_weeks: DEFAULT_SEARCH_HORIZON_WEEKS,
            holidays: Vec::new(),
        }
    }
}

fn default_horizon() -> u32 {
    DEFAULT_SEARCH_HORIZON_WEEKS
}

/// Jour férié ou période de vacances scolaires (un jour par entrée).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub kind: HolidayKind,
    pub name: String,
    /// `fr`, `de-by`… ; vide = toutes régions.
    #[serde(default)]
    pub regions: Vec<String>,
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<EvalConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EvalConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    if config.search_horizon_weeks == 0 {
        bail!("search_horizon_weeks must be > 0");
    }
    Ok(config)
}

/// Liste ordonnée de règles déjà analysées, sérialisée en tableau JSON.
pub fn load_rules_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Rule>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    parse_rules_json(&data).with_context(|| format!("parsing rules {}", path.display()))
}

pub fn parse_rules_json(data: &[u8]) -> anyhow::Result<Vec<Rule>> {
    let rules: Vec<Rule> = serde_json::from_slice(data)?;
    if rules.is_empty() {
        bail!("rule list cannot be empty");
    }
    for rule in &rules {
        let points = rule
            .times
            .iter()
            .flat_map(|span| std::iter::once(span.start).chain(span.end));
        for point in points {
            if let TimePoint::Fixed(minute) = point {
                if minute > 2 * MINUTES_PER_DAY {
                    bail!("time {minute} of rule {} is out of range", rule.id);
                }
            }
        }
    }
    Ok(rules)
}
