use crate::interval::TimeInterval;
use crate::schedule::{fmt_minutes, weekday_abbrev, DaySchedule, WeekSchedule};

/// Permet de customiser le rendu d'une semaine (texte, débogage, etc.).
pub trait WeekRenderer {
    fn render(&self, week: &WeekSchedule) -> String;
}

/// Une ligne par jour : `Mo 2021-06-07: 12:00-14:00 open, 17:00-24:00 open`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDump;

/// Comme [`TextDump`], avec la règle d'origine de chaque intervalle.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugDump;

impl WeekRenderer for TextDump {
    fn render(&self, week: &WeekSchedule) -> String {
        render_days(week, describe)
    }
}

impl WeekRenderer for DebugDump {
    fn render(&self, week: &WeekSchedule) -> String {
        render_days(week, |iv| {
            let mut out = describe(iv);
            if let Some(rule) = &iv.rule {
                out.push_str(&format!(" [rule {rule}]"));
            }
            if iv.fallback {
                out.push_str(" (fallback)");
            }
            out
        })
    }
}

fn render_days<F: Fn(&TimeInterval) -> String>(week: &WeekSchedule, item: F) -> String {
    week.days()
        .iter()
        .map(|day| render_day(day, &item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_day<F: Fn(&TimeInterval) -> String>(day: &DaySchedule, item: &F) -> String {
    let body = if day.intervals().is_empty() {
        "closed".to_string()
    } else {
        day.intervals().iter().map(item).collect::<Vec<_>>().join(", ")
    };
    format!("{} {}: {}", weekday_abbrev(day.weekday()), day.date(), body)
}

fn describe(iv: &TimeInterval) -> String {
    let mut out = format!(
        "{}-{} {}",
        fmt_minutes(iv.start()),
        fmt_minutes(iv.end()),
        iv.status
    );
    if let Some(comment) = &iv.comment {
        out.push_str(&format!(" \"{comment}\""));
    }
    out
}
