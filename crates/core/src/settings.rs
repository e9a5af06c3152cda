use crate::history::Intensity;
use crate::mood::Mood;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Sessions older than this are not restored.
const SESSION_MAX_AGE_HOURS: i64 = 24;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub persist_session: bool,
    pub reminders: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            persist_session: true,
            reminders: false,
        }
    }
}

/// What the user had picked but not yet saved.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub intensity: Intensity,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    #[serde(flatten)]
    pub selection: Selection,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Session {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.timestamp > now - TimeDelta::hours(SESSION_MAX_AGE_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_settings_fields_take_defaults() {
        let s: Settings = serde_json::from_str(r#"{"reminders": true}"#).unwrap();
        assert_eq!(
            s,
            Settings {
                persist_session: true,
                reminders: true
            }
        );
    }

    #[test]
    fn sessions_expire_after_a_day() {
        let now = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let session = Session {
            selection: Selection::default(),
            timestamp: now - TimeDelta::hours(23),
        };
        assert!(session.is_fresh(now));
        assert!(!session.is_fresh(now + TimeDelta::hours(2)));
    }
}
