//! Maps a spoken sentence to one of the fixed moods.
//!
//! Two passes run over the transcript. A keyword scan scores every synonym
//! found as a substring by how much of the sentence it covers. A phrase scan
//! then looks for "i feel X"-style sentences; only the first pattern that
//! matches is consulted, and when its X is itself a synonym the phrase decides
//! the mood outright.

use crate::mood::{lexicon, Mood};
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Confidence assigned to a mood named through a structured phrase.
pub const PHRASE_CONFIDENCE: f32 = 0.9;
/// Leftover text must be longer than this to be offered as a note.
pub const MIN_NOTE_CHARS: usize = 10;

/// Tried in order; the first one that matches at all is the only one used.
const FEELING_PHRASES: [&str; 5] = [
    r"i feel ([a-z0-9_]+)",
    r"i'm feeling ([a-z0-9_]+)",
    r"i am ([a-z0-9_]+)",
    r"feeling ([a-z0-9_]+)",
    r"i'm ([a-z0-9_]+)",
];

const SUGGESTED_WORDS: [&str; 5] = ["happy", "sad", "excited", "calm", "tired"];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MatchSource {
    Keyword,
    Phrase,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub mood: Mood,
    /// The synonym that decided the match.
    pub matched: String,
    pub confidence: f32,
    pub source: MatchSource,
    /// Whatever the speaker said beyond the mood words, if substantial.
    pub note: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("invalid phrase pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Clone, Debug)]
pub struct MoodClassifier {
    phrases: Vec<Regex>,
    mood_words: Regex,
}

impl MoodClassifier {
    pub fn new() -> Result<Self, ClassifyError> {
        let phrases = FEELING_PHRASES
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let alternation = lexicon::all_keywords()
            .map(|(_, kw)| regex::escape(kw))
            .collect::<Vec<_>>()
            .join("|");
        let mood_words = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            phrases,
            mood_words,
        })
    }

    /// Classifies an already normalized transcript (see [`normalize`]).
    pub fn classify(&self, transcript: &str) -> Option<Classification> {
        if transcript.is_empty() {
            return None;
        }

        let best = self.phrase_match(transcript).or_else(|| keyword_match(transcript));
        let (mood, matched, confidence, source) = best?;

        debug!(
            mood = %mood,
            matched,
            confidence,
            ?source,
            "transcript classified"
        );

        Some(Classification {
            mood,
            matched: matched.to_owned(),
            confidence,
            source,
            note: self.residual_note(transcript),
        })
    }

    fn phrase_match<'t>(&self, transcript: &'t str) -> Option<(Mood, &'t str, f32, MatchSource)> {
        let captures = self.phrases.iter().find_map(|re| re.captures(transcript))?;
        let word = captures.get(1)?.as_str();
        let mood = lexicon::owner_of(word)?;
        Some((mood, word, PHRASE_CONFIDENCE, MatchSource::Phrase))
    }

    fn residual_note(&self, transcript: &str) -> Option<String> {
        let stripped = self.mood_words.replace_all(transcript, "");
        let rest = stripped.trim();
        if rest.chars().count() > MIN_NOTE_CHARS {
            Some(capitalize_first(rest))
        } else {
            None
        }
    }
}

fn keyword_match(transcript: &str) -> Option<(Mood, &'static str, f32, MatchSource)> {
    let len = transcript.chars().count() as f32;
    let mut best: Option<(Mood, &'static str, f32)> = None;

    for (mood, keyword) in lexicon::all_keywords() {
        if !transcript.contains(keyword) {
            continue;
        }
        let confidence = keyword.chars().count() as f32 / len;
        match best {
            Some((_, _, top)) if confidence <= top => {}
            _ => best = Some((mood, keyword, confidence)),
        }
    }

    best.map(|(mood, kw, c)| (mood, kw, c, MatchSource::Keyword))
}

/// Lowercases and trims a raw recognizer transcript.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A hint shown when nothing in the transcript named a mood.
pub fn retry_suggestion(rng: &mut impl Rng) -> String {
    let word = SUGGESTED_WORDS.choose(rng).copied().unwrap_or("happy");
    format!("I didn't catch that. Try saying \"I feel {word}\" or similar.")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
