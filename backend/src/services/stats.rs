use chrono::{Days, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::db::entries::DateRange;
use crate::models::entry::Entry;
use crate::services::day_window::DayWindow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    #[default]
    Week,
    Month,
    Year,
}

impl StatsPeriod {
    pub fn title(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "Last 7 Days",
            StatsPeriod::Month => "Last 30 Days",
            StatsPeriod::Year => "Last 365 Days",
        }
    }

    /// Earliest calendar day inside the period ending on `today`. A year
    /// reaches back to the day after the same date last year.
    pub fn first_day(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            StatsPeriod::Week => today.checked_sub_days(Days::new(6)),
            StatsPeriod::Month => today.checked_sub_days(Days::new(29)),
            StatsPeriod::Year => today.checked_sub_months(Months::new(12))?.succ_opt(),
        }
    }

    /// Every day from `first_day` up to and including `today`.
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        let first = self.first_day(today)?;
        Some(DateRange {
            start: Some(first.and_time(NaiveTime::MIN)),
            end: Some(DayWindow::for_day(today)?.end),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatsOverview {
    pub period: StatsPeriod,
    pub title: &'static str,
    pub entry_count: usize,
    pub summary: Option<StatsSummary>,
    pub series: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub mood_rating: f64,
    pub anxiety_level: f64,
    pub sleep_hours: f64,
    pub sleep_quality: f64,
    pub stress_level: f64,
    pub social_interaction: f64,
    /// Whole minutes.
    pub activity_duration: f64,
    pub active_percentage: u32,
    pub depression_percentage: u32,
    pub depression_severity: f64,
    pub anxiety_percentage: u32,
    pub anxiety_severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub mood: i32,
    pub anxiety: i32,
    pub sleep: f64,
    pub sleep_quality: i32,
    pub stress: i32,
    pub social: i32,
}

pub fn build_overview(period: StatsPeriod, entries: &[Entry]) -> StatsOverview {
    let mut chronological: Vec<&Entry> = entries.iter().collect();
    chronological.sort_by_key(|e| e.entry_date);

    StatsOverview {
        period,
        title: period.title(),
        entry_count: entries.len(),
        summary: summarize(entries),
        series: chronological
            .into_iter()
            .map(|e| ChartPoint {
                date: e.day(),
                mood: e.mood_rating,
                anxiety: e.anxiety_level,
                sleep: e.sleep_hours,
                sleep_quality: e.sleep_quality,
                stress: e.stress_level,
                social: e.social_interaction,
            })
            .collect(),
    }
}

/// Averages over the given entries; `None` when there are none.
pub fn summarize(entries: &[Entry]) -> Option<StatsSummary> {
    if entries.is_empty() {
        return None;
    }
    let count = entries.len() as f64;
    let mean = |f: fn(&Entry) -> f64| round1(entries.iter().map(f).sum::<f64>() / count);

    let depressed: Vec<&Entry> = entries.iter().filter(|e| e.depression_symptoms).collect();
    let anxious: Vec<&Entry> = entries.iter().filter(|e| e.anxiety_symptoms).collect();
    let active = entries.iter().filter(|e| e.activity_duration > 0).count();

    Some(StatsSummary {
        mood_rating: mean(|e| e.mood_rating as f64),
        anxiety_level: mean(|e| e.anxiety_level as f64),
        sleep_hours: mean(|e| e.sleep_hours),
        sleep_quality: mean(|e| e.sleep_quality as f64),
        stress_level: mean(|e| e.stress_level as f64),
        social_interaction: mean(|e| e.social_interaction as f64),
        activity_duration: (entries.iter().map(|e| e.activity_duration as f64).sum::<f64>() / count)
            .round(),
        active_percentage: percentage(active, entries.len()),
        depression_percentage: percentage(depressed.len(), entries.len()),
        depression_severity: mean_severity(&depressed, |e| e.depression_symptom_severity),
        anxiety_percentage: percentage(anxious.len(), entries.len()),
        anxiety_severity: mean_severity(&anxious, |e| e.anxiety_symptom_severity),
    })
}

fn mean_severity(flagged: &[&Entry], severity: fn(&Entry) -> i32) -> f64 {
    if flagged.is_empty() {
        return 0.0;
    }
    let total: i32 = flagged.iter().map(|e| severity(e)).sum();
    round1(total as f64 / flagged.len() as f64)
}

fn percentage(part: usize, whole: usize) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
