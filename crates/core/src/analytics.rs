//! Streak and summary statistics over the mood history.
//!
//! Everything here is recomputed from scratch after each change to the
//! history; histories are personal-scale so nothing is cached incrementally.

use crate::history::MoodEntry;
use crate::mood::{appearance, Mood};
use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};

const WEEK_DAYS: i64 = 7;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    #[serde(deserialize_with = "mood_or_emoji")]
    pub dominant: Mood,
    #[serde(deserialize_with = "number_or_text")]
    pub weekly_avg: f64,
}

/// Exports from the browser widget store the dominant mood as its emoji and
/// the weekly average as a string such as `"4.3"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Typed(T),
    Text(String),
}

fn mood_or_emoji<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Mood, D::Error> {
    match Loose::<Mood>::deserialize(deserializer)? {
        Loose::Typed(mood) => Ok(mood),
        Loose::Text(s) => Ok(Mood::ALL
            .into_iter()
            .find(|&m| appearance::emoji(m) == s.trim())
            .unwrap_or(Mood::FALLBACK)),
    }
}

fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Loose::<f64>::deserialize(deserializer)? {
        Loose::Typed(value) => Ok(value),
        Loose::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            dominant: Mood::FALLBACK,
            weekly_avg: 0.0,
        }
    }
}

/// Number of consecutive days, ending with `today`, that have at least one
/// entry. A day without an entry today yields 0 even if yesterday had one.
pub fn compute_streak(entries: &[MoodEntry], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = entries.iter().map(MoodEntry::local_date).collect();

    let mut streak = 0;
    for (offset, day) in days.iter().rev().enumerate() {
        let expected = u64::try_from(offset)
            .ok()
            .and_then(|n| today.checked_sub_days(Days::new(n)));
        if expected != Some(*day) {
            break;
        }
        streak += 1;
    }
    streak
}

pub fn compute_stats(entries: &[MoodEntry], now: DateTime<Utc>) -> Stats {
    if entries.is_empty() {
        return Stats::default();
    }

    let mut counts: HashMap<Mood, usize> = HashMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_default() += 1;
    }

    // Declared order decides ties: the first mood reaching the max count wins.
    let mut dominant = Mood::FALLBACK;
    let mut best = 0;
    for mood in Mood::ALL {
        let count = counts.get(&mood).copied().unwrap_or(0);
        if count > best {
            best = count;
            dominant = mood;
        }
    }

    let week_start = now - TimeDelta::days(WEEK_DAYS);
    let weekly: Vec<u8> = entries
        .iter()
        .filter(|e| e.timestamp > week_start)
        .map(|e| e.intensity().get())
        .collect();

    Stats {
        total: entries.len(),
        dominant,
        weekly_avg: round_to_tenth(mean(&weekly)),
    }
}

fn mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    f64::from(sum) / values.len() as f64
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
