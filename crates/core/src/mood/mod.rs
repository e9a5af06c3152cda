pub mod affirmations;
pub mod appearance;
pub mod lexicon;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The fixed mood taxonomy. Declaration order matters: it drives keyword scan
/// order, dominant-mood tie breaks and the 1–8 shortcut indices.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Tired,
    Calm,
    Excited,
    Anxious,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Tired,
        Mood::Calm,
        Mood::Excited,
        Mood::Anxious,
        Mood::Neutral,
    ];

    /// Used when there is no history to pick a dominant mood from.
    pub const FALLBACK: Mood = Mood::Happy;

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Tired => "Tired",
            Mood::Calm => "Calm",
            Mood::Excited => "Excited",
            Mood::Anxious => "Anxious",
            Mood::Neutral => "Neutral",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based shortcut as shown in the mood picker.
    pub fn from_shortcut(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mood: {0:?} (expected a name like \"happy\" or a number 1-8)")]
pub struct ParseMoodError(pub String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<usize>() {
            return Self::from_shortcut(n).ok_or_else(|| ParseMoodError(s.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseMoodError(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("happy".parse::<Mood>(), Ok(Mood::Happy));
        assert_eq!(" ANXIOUS ".parse::<Mood>(), Ok(Mood::Anxious));
        assert!("grumpy".parse::<Mood>().is_err());
    }

    #[test]
    fn shortcuts_follow_declared_order() {
        assert_eq!("1".parse::<Mood>(), Ok(Mood::Happy));
        assert_eq!("8".parse::<Mood>(), Ok(Mood::Neutral));
        assert!("0".parse::<Mood>().is_err());
        assert!("9".parse::<Mood>().is_err());
        for (i, mood) in Mood::ALL.iter().enumerate() {
            assert_eq!(mood.index(), i);
        }
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Mood::Excited).expect("serialize");
        assert_eq!(json, "\"Excited\"");
    }
}
