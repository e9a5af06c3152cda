use crate::analytics::Stats;
use crate::history::{MoodEntry, MoodHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time snapshot of the history and what was derived from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub mood_history: Vec<MoodEntry>,
    pub stats: Stats,
    pub streak: u32,
    pub export_date: DateTime<Utc>,
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("export json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportDocument {
    pub fn new(history: &MoodHistory, stats: Stats, streak: u32, at: DateTime<Utc>) -> Self {
        Self {
            mood_history: history.entries().to_vec(),
            stats,
            streak,
            export_date: at,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_history(self) -> MoodHistory {
        MoodHistory::from_entries(self.mood_history)
    }

    pub fn default_file_name(at: DateTime<Utc>) -> String {
        format!("mood-mirror-export-{}.json", at.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::compute_stats;
    use crate::history::Intensity;
    use crate::mood::Mood;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn exported_history_reloads_unchanged() {
        let now = Utc.with_ymd_and_hms(2026, 2, 9, 8, 30, 0).unwrap();
        let mut history = MoodHistory::new();
        history.record(MoodEntry::new(
            Mood::Tired,
            Intensity::new(2),
            "long night",
            now - TimeDelta::hours(26),
        ));
        history.record(MoodEntry::new(Mood::Excited, Intensity::new(5), "", now));

        let doc = ExportDocument::new(&history, compute_stats(history.entries(), now), 2, now);
        let json = doc.to_json_pretty().unwrap();
        let reloaded = ExportDocument::from_json(&json).unwrap();

        assert_eq!(reloaded, doc);
        assert_eq!(reloaded.into_history(), history);
    }

    #[test]
    fn uses_camel_case_field_names() {
        let now = Utc.with_ymd_and_hms(2026, 2, 9, 8, 30, 0).unwrap();
        let doc = ExportDocument::new(&MoodHistory::new(), Stats::default(), 0, now);
        let value: serde_json::Value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("moodHistory").is_some());
        assert!(value.get("exportDate").is_some());
        assert_eq!(value["stats"]["weeklyAvg"], 0.0);
        assert_eq!(value["stats"]["dominant"], "Happy");
    }

    #[test]
    fn browser_widget_export_imports() {
        let raw = r#"{
          "moodHistory": [
            {"id": 1767268800000, "mood": "Calm", "emoji": "😌", "intensity": 4,
             "note": "tea", "timestamp": 1767268800000, "date": "Thu Jan 01 2026"}
          ],
          "stats": {"total": 1, "dominant": "😌", "weeklyAvg": "4.0"},
          "streak": 1,
          "exportDate": "2026-01-01T12:05:00.000Z",
          "note": "Beautiful moments saved with love"
        }"#;
        let doc = ExportDocument::from_json(raw).unwrap();
        assert_eq!(doc.stats.dominant, Mood::Calm);
        assert_eq!(doc.stats.weekly_avg, 4.0);

        let history = doc.into_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries()[0].note, "tea");
        assert_eq!(history.entries()[0].intensity().get(), 4);
    }

    #[test]
    fn file_name_carries_the_date() {
        let now = Utc.with_ymd_and_hms(2026, 2, 9, 8, 30, 0).unwrap();
        assert_eq!(
            ExportDocument::default_file_name(now),
            "mood-mirror-export-2026-02-09.json"
        );
    }
}
