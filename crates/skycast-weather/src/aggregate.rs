//! Forecast aggregation.
//!
//! Pure derivations over forecast sample collections, one per display
//! horizon. Grouping never relies on input order; only the representative
//! midday tie-break does.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::types::{DailyRecord, ForecastSample};

/// Default hourly window, hours from now.
pub const HOURLY_WINDOW_HOURS: u32 = 12;

/// Entries shown when the hourly window matches nothing (stale provider
/// data).
pub const HOURLY_FALLBACK_LEN: usize = 8;

/// Days shown in the 5-day view.
pub const DAILY_MAX_DAYS: usize = 5;

/// Days shown in the weekly view.
pub const WEEKLY_MAX_DAYS: usize = 7;

/// Summary card data for one day, in either the 5-day or the weekly view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Short weekday name ("Mon")
    pub label: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub min_temp: f64,
    pub max_temp: f64,
    /// Precipitation probability as a whole percentage
    pub precipitation_pct: Option<u8>,
}

/// Samples falling in `[now, now + window_hours * 3600]`, inclusive, in
/// original order. An empty window falls back to the first
/// [`HOURLY_FALLBACK_LEN`] samples of the full list.
pub fn hourly_view(
    samples: &[ForecastSample],
    now: i64,
    window_hours: u32,
) -> Vec<ForecastSample> {
    let end = now + i64::from(window_hours) * 3600;
    let windowed: Vec<ForecastSample> = samples
        .iter()
        .filter(|s| s.dt >= now && s.dt <= end)
        .cloned()
        .collect();

    if windowed.is_empty() {
        return samples.iter().take(HOURLY_FALLBACK_LEN).cloned().collect();
    }
    windowed
}

/// Group samples by UTC calendar date, ascending. Every sample lands in
/// exactly one group regardless of input order.
pub fn group_by_day(samples: &[ForecastSample]) -> BTreeMap<NaiveDate, Vec<&ForecastSample>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.utc_date()).or_default().push(sample);
    }
    groups
}

/// Derive up to `max_days` day summaries from raw 3-hourly samples.
pub fn daily_summaries(samples: &[ForecastSample], max_days: usize) -> Vec<DaySummary> {
    group_by_day(samples)
        .into_iter()
        .take(max_days)
        .filter_map(|(date, entries)| summarize_day(date, &entries))
        .collect()
}

fn summarize_day(date: NaiveDate, entries: &[&ForecastSample]) -> Option<DaySummary> {
    if entries.is_empty() {
        return None;
    }

    // Midday sample carries the card's icon/description; median position
    // otherwise
    let representative = entries
        .iter()
        .find(|s| s.utc_hour() == 12)
        .copied()
        .unwrap_or(entries[entries.len() / 2]);

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for sample in entries {
        min = min.min(sample.min_or_temp());
        max = max.max(sample.max_or_temp());
    }
    // Non-finite bounds collapse to the representative's plain temperature
    if !min.is_finite() {
        min = representative.main.temp;
    }
    if !max.is_finite() {
        max = representative.main.temp;
    }

    Some(DaySummary {
        date,
        label: date.format("%a").to_string(),
        icon: representative.icon().map(str::to_string),
        description: representative.description().map(str::to_string),
        min_temp: min,
        max_temp: max,
        precipitation_pct: representative.pop.map(pop_to_pct),
    })
}

/// Bounded projection of provider pre-aggregated daily records: at most
/// `max_days` in provider order, temperatures rounded for display,
/// probability as a whole percentage.
pub fn weekly_summaries(daily: &[DailyRecord], max_days: usize) -> Vec<DaySummary> {
    daily
        .iter()
        .take(max_days)
        .map(|day| {
            let date = DateTime::<Utc>::from_timestamp(day.dt, 0)
                .unwrap_or_default()
                .date_naive();
            DaySummary {
                date,
                label: date.format("%a").to_string(),
                icon: day.icon().map(str::to_string),
                description: day.description().map(str::to_string),
                min_temp: day.temp.min.round(),
                max_temp: day.temp.max.round(),
                precipitation_pct: day.pop.map(pop_to_pct),
            }
        })
        .collect()
}

fn pop_to_pct(pop: f64) -> u8 {
    (pop * 100.0).round().clamp(0.0, 255.0) as u8
}
