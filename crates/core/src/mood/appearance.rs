use super::Mood;
use rand::seq::IndexedRandom;
use rand::Rng;

const MIN_PARTICLES: usize = 6;
const MAX_PARTICLES: usize = 9;

pub fn emoji(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "😊",
        Mood::Sad => "😔",
        Mood::Angry => "😠",
        Mood::Tired => "😴",
        Mood::Calm => "😌",
        Mood::Excited => "🤩",
        Mood::Anxious => "😰",
        Mood::Neutral => "😐",
    }
}

pub fn particles(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &["✨", "🌟", "💫", "🎉", "🌈", "☀️"],
        Mood::Sad => &["💧", "🌧️", "☁️", "💙", "🌫️"],
        Mood::Angry => &["⚡", "🔥", "💥", "🌪️", "💢"],
        Mood::Tired => &["💤", "🌙", "⭐", "🌌", "🛏️"],
        Mood::Calm => &["🍃", "🌊", "🕊️", "🌸", "💙"],
        Mood::Excited => &["🎊", "🎉", "⚡", "🌟", "🎈", "✨"],
        Mood::Anxious => &["🌀", "💭", "🤗", "💜", "🌟"],
        Mood::Neutral => &["⚪", "🔘", "🔹", "◯", "💛"],
    }
}

/// A random run of 6–9 particles for the selected mood.
pub fn burst(mood: Mood, rng: &mut impl Rng) -> Vec<&'static str> {
    let count = rng.random_range(MIN_PARTICLES..=MAX_PARTICLES);
    let set = particles(mood);
    (0..count)
        .filter_map(|_| set.choose(rng).copied())
        .collect()
}
