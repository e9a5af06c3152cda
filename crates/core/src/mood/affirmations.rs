use super::Mood;
use crate::history::Intensity;
use rand::seq::IndexedRandom;
use rand::Rng;

const HIGH_INTENSITY_CODA: &str = "That energy is worth holding on to.";
const LOW_INTENSITY_CODA: &str = "Go gently with yourself right now.";

pub fn quotes(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "Your smile makes the whole day brighter.",
            "Joy looks good on you. Let it stay a while.",
            "Moments like this are worth remembering.",
            "Your happiness is contagious in the best way.",
            "Soak it in. You earned this feeling.",
        ],
        Mood::Sad => &[
            "Even the darkest skies clear eventually.",
            "It's okay to not be okay today.",
            "Every feeling passes, and this one will too.",
            "You don't have to carry this alone.",
            "Being gentle with yourself is a kind of strength.",
        ],
        Mood::Angry => &[
            "Your feelings are valid, even the fierce ones.",
            "Anger points at something that matters to you.",
            "Storms pass. You will still be standing.",
            "Give the heat somewhere safe to go.",
            "You can feel this without acting on all of it.",
        ],
        Mood::Tired => &[
            "Rest is part of the work, not a break from it.",
            "You've done enough for now.",
            "Even the stars take turns shining.",
            "A tired body is asking to be looked after.",
            "Tomorrow will still be there after some sleep.",
        ],
        Mood::Calm => &[
            "This stillness is yours to keep.",
            "A quiet mind hears the important things.",
            "Let this calm settle all the way in.",
            "Peace suits you.",
            "Breathe slowly and enjoy the quiet.",
        ],
        Mood::Excited => &[
            "Your energy could light up a city.",
            "Ride this wave. It's a good one.",
            "Excitement is the future saying hello.",
            "Let that spark carry you forward.",
            "Big feelings for big things ahead.",
        ],
        Mood::Anxious => &[
            "One breath at a time is enough.",
            "You have made it through every hard day so far.",
            "Worry is loud, but it is not always right.",
            "You are safe in this moment.",
            "Slow down. Nothing needs solving this second.",
        ],
        Mood::Neutral => &[
            "Every feeling is a fine feeling to have.",
            "Balance is its own quiet kind of good.",
            "Ordinary days hold more than they seem to.",
            "Steady is a perfectly good place to be.",
            "Simply being here is enough.",
        ],
    }
}

pub fn tips(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Happy => &[
            "Share the good news with someone",
            "Write down what made today great",
            "Put on a song and dance",
        ],
        Mood::Sad => &[
            "Reach out to someone you trust",
            "Write down what's on your mind",
            "Take a short walk outside",
        ],
        Mood::Angry => &[
            "Take ten slow, deep breaths",
            "Step away for a few minutes",
            "Name exactly what is bothering you",
        ],
        Mood::Tired => &[
            "Have a glass of water",
            "Make some warm tea",
            "Close your eyes for ten minutes",
        ],
        Mood::Calm => &[
            "Enjoy a quiet moment",
            "Try a short meditation",
            "Notice five things around you",
        ],
        Mood::Excited => &[
            "Channel it into something creative",
            "Tell a friend what's coming",
            "Plan your next step",
        ],
        Mood::Anxious => &[
            "Breathe in for four, out for six",
            "Ground yourself: feet on the floor",
            "Write the worry down and set it aside",
        ],
        Mood::Neutral => &[
            "Check in with yourself later",
            "Do one small thing you enjoy",
            "Stretch for a minute",
        ],
    }
}

/// Picks a quote for `mood`, extended with a coda for strong or weak intensity.
pub fn affirmation(mood: Mood, intensity: Intensity, rng: &mut impl Rng) -> String {
    let base = quotes(mood).choose(rng).copied().unwrap_or_default();
    let level = intensity.get();
    if level >= 4 {
        format!("{base} {HIGH_INTENSITY_CODA}")
    } else if level <= 2 {
        format!("{base} {LOW_INTENSITY_CODA}")
    } else {
        base.to_owned()
    }
}

pub fn tip(mood: Mood, rng: &mut impl Rng) -> &'static str {
    tips(mood).choose(rng).copied().unwrap_or_default()
}
