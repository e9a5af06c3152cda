//! Synonym keywords used to recognise a mood in a spoken sentence.

use super::Mood;

pub fn keywords(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "happy",
            "good",
            "great",
            "wonderful",
            "joyful",
            "cheerful",
            "glad",
            "pleased",
            "delighted",
            "content",
        ],
        Mood::Sad => &[
            "sad",
            "down",
            "blue",
            "depressed",
            "unhappy",
            "melancholy",
            "sorrowful",
            "gloomy",
            "dejected",
        ],
        Mood::Angry => &[
            "angry",
            "mad",
            "furious",
            "irritated",
            "annoyed",
            "upset",
            "frustrated",
            "enraged",
            "livid",
        ],
        Mood::Tired => &[
            "tired",
            "exhausted",
            "weary",
            "fatigued",
            "drained",
            "sleepy",
            "worn out",
            "beat",
        ],
        Mood::Calm => &[
            "calm",
            "peaceful",
            "relaxed",
            "serene",
            "tranquil",
            "composed",
            "zen",
            "centered",
        ],
        Mood::Excited => &[
            "excited",
            "thrilled",
            "pumped",
            "energetic",
            "enthusiastic",
            "hyped",
            "elated",
        ],
        Mood::Anxious => &[
            "anxious",
            "nervous",
            "worried",
            "stressed",
            "tense",
            "uneasy",
            "concerned",
            "panicked",
        ],
        Mood::Neutral => &[
            "neutral", "okay", "fine", "alright", "normal", "meh", "average", "so-so",
        ],
    }
}

/// The mood owning `word` as an exact keyword, in declared order.
pub fn owner_of(word: &str) -> Option<Mood> {
    Mood::ALL
        .into_iter()
        .find(|&mood| keywords(mood).contains(&word))
}

/// Every keyword of every mood, in scan order.
pub fn all_keywords() -> impl Iterator<Item = (Mood, &'static str)> {
    Mood::ALL
        .into_iter()
        .flat_map(|mood| keywords(mood).iter().map(move |&kw| (mood, kw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_names_itself() {
        for mood in Mood::ALL {
            let own = mood.label().to_lowercase();
            assert_eq!(owner_of(&own), Some(mood));
        }
    }

    #[test]
    fn keywords_are_unique_across_moods() {
        let mut seen = std::collections::HashSet::new();
        for (_, kw) in all_keywords() {
            assert!(seen.insert(kw), "duplicate keyword {kw}");
        }
    }
}
