use crate::mood::Mood;
use chrono::{DateTime, Local, NaiveDate, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 5;
pub const DEFAULT_INTENSITY: u8 = 3;
/// Notes longer than this are flagged to the user but still saved.
pub const NOTE_SOFT_LIMIT: usize = 280;
/// How many entries a history listing shows.
pub const DISPLAY_LIMIT: usize = 20;

/// Mood strength on a 1–5 scale. Out-of-range input is clamped, including
/// when read back from storage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_INTENSITY, MAX_INTENSITY))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(DEFAULT_INTENSITY)
    }
}

impl From<i64> for Intensity {
    fn from(value: i64) -> Self {
        let clamped = value.clamp(i64::from(MIN_INTENSITY), i64::from(MAX_INTENSITY));
        Self(u8::try_from(clamped).unwrap_or(DEFAULT_INTENSITY))
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: i64,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default)]
    pub note: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub date: Option<NaiveDate>,
}

/// Reads `2026-01-05` or the `Mon Jan 05 2026` form written by the browser
/// widget. Anything else is dropped; [`MoodEntry::local_date`] does not need it.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%a %b %d %Y"))
            .ok()
    }))
}

impl MoodEntry {
    /// Timestamps are kept at millisecond precision so an entry survives a
    /// trip through its JSON form unchanged.
    pub fn new(mood: Mood, intensity: Intensity, note: &str, at: DateTime<Utc>) -> Self {
        let timestamp = at.trunc_subsecs(3);
        Self {
            id: timestamp.timestamp_millis(),
            mood,
            intensity: Some(intensity),
            note: note.trim().to_owned(),
            timestamp,
            date: Some(timestamp.with_timezone(&Local).date_naive()),
        }
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity.unwrap_or_default()
    }

    /// Calendar day of the entry in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// Day-count filter offered by the history listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryWindow {
    #[default]
    All,
    Days(u32),
}

impl HistoryWindow {
    pub const CHOICES: [HistoryWindow; 4] = [
        HistoryWindow::All,
        HistoryWindow::Days(7),
        HistoryWindow::Days(30),
        HistoryWindow::Days(90),
    ];

    pub fn contains(self, entry: &MoodEntry, now: DateTime<Utc>) -> bool {
        match self {
            HistoryWindow::All => true,
            HistoryWindow::Days(days) => entry.timestamp > now - TimeDelta::days(i64::from(days)),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("history window must be one of all, 7, 30, 90 (got {0:?})")]
pub struct ParseWindowError(pub String);

impl FromStr for HistoryWindow {
    type Err = ParseWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(HistoryWindow::All);
        }
        let days: u32 = s.parse().map_err(|_| ParseWindowError(s.to_owned()))?;
        let window = HistoryWindow::Days(days);
        if Self::CHOICES.contains(&window) {
            Ok(window)
        } else {
            Err(ParseWindowError(s.to_owned()))
        }
    }
}

/// Saved entries, most recent first.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MoodHistory {
    entries: Vec<MoodEntry>,
}

impl MoodHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<MoodEntry>) -> Self {
        Self { entries }
    }

    /// Adds `entry` at the front. Ids stay unique even when two entries are
    /// created within the same millisecond, short of `i64::MAX`.
    pub fn record(&mut self, mut entry: MoodEntry) -> &MoodEntry {
        if let Some(latest) = self.entries.first() {
            if entry.id <= latest.id {
                entry.id = latest.id.saturating_add(1);
            }
        }
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries inside `window`, capped at [`DISPLAY_LIMIT`].
    pub fn listing(&self, window: HistoryWindow, now: DateTime<Utc>) -> Vec<&MoodEntry> {
        self.entries
            .iter()
            .filter(|e| window.contains(e, now))
            .take(DISPLAY_LIMIT)
            .collect()
    }
}
