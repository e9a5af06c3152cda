//! Application state and the intents that change it.
//!
//! [`MoodMirror`] owns the history, the user's settings and the in-progress
//! selection. A front end turns user actions into [`Intent`]s and renders the
//! [`Feedback`] it gets back; classification and analytics stay plain
//! functions that this layer calls.

use crate::analytics::{compute_stats, compute_streak, Stats};
use crate::classify::{normalize, retry_suggestion, Classification, MoodClassifier};
use crate::clock::Clock;
use crate::export::ExportDocument;
use crate::history::{HistoryWindow, Intensity, MoodEntry, MoodHistory, NOTE_SOFT_LIMIT};
use crate::mood::{affirmations, appearance, Mood};
use crate::settings::{Selection, Session, Settings};
use crate::storage::{load_typed, save_typed, Store, HISTORY_KEY, SESSION_KEY, SETTINGS_KEY};
use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Select(Mood),
    Randomize,
    ClearSelection,
    SetIntensity(u8),
    SetNote(String),
    Save,
    ClearHistory,
}

/// Everything needed to show a selected mood.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoodCard {
    pub mood: Mood,
    pub emoji: &'static str,
    pub intensity: Intensity,
    pub affirmation: String,
    pub tip: &'static str,
    pub particles: Vec<&'static str>,
}

impl MoodCard {
    pub fn draw(mood: Mood, intensity: Intensity, rng: &mut impl Rng) -> Self {
        Self {
            mood,
            emoji: appearance::emoji(mood),
            intensity,
            affirmation: affirmations::affirmation(mood, intensity, rng),
            tip: affirmations::tip(mood, rng),
            particles: appearance::burst(mood, rng),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Feedback {
    Shown(MoodCard),
    SelectionCleared,
    IntensitySet(Intensity),
    NoteSet { chars: usize, over_limit: bool },
    /// `persisted` is false when the entry could not be written to storage;
    /// it still counts for this session.
    Saved { entry: MoodEntry, persisted: bool },
    NothingSelected,
    HistoryCleared { persisted: bool },
    Heard { classification: Classification, card: MoodCard },
    NotHeard { suggestion: String },
}

pub struct MoodMirror<S, C> {
    store: S,
    clock: C,
    history: MoodHistory,
    settings: Settings,
    selection: Selection,
    stats: Stats,
    streak: u32,
}

impl<S: Store, C: Clock> MoodMirror<S, C> {
    /// Loads history and settings from `store`. Anything missing or
    /// unreadable starts out empty or default.
    pub fn open(store: S, clock: C) -> Self {
        let history: MoodHistory = load_typed(&store, HISTORY_KEY).unwrap_or_default();
        let settings: Settings = load_typed(&store, SETTINGS_KEY).unwrap_or_default();
        debug!(entries = history.len(), ?settings, "state loaded");

        let mut app = Self {
            store,
            clock,
            history,
            settings,
            selection: Selection::default(),
            stats: Stats::default(),
            streak: 0,
        };
        app.refresh();
        if app.settings.persist_session {
            app.restore_session();
        }
        app
    }

    pub fn handle(&mut self, intent: Intent, rng: &mut impl Rng) -> Feedback {
        match intent {
            Intent::Select(mood) => self.select(mood, rng),
            Intent::Randomize => {
                let mood = Mood::ALL.choose(rng).copied().unwrap_or(Mood::FALLBACK);
                self.select(mood, rng)
            }
            Intent::ClearSelection => {
                self.selection.mood = None;
                Feedback::SelectionCleared
            }
            Intent::SetIntensity(level) => {
                self.selection.intensity = Intensity::new(level);
                Feedback::IntensitySet(self.selection.intensity)
            }
            Intent::SetNote(note) => {
                let chars = note.chars().count();
                self.selection.note = note;
                Feedback::NoteSet {
                    chars,
                    over_limit: chars > NOTE_SOFT_LIMIT,
                }
            }
            Intent::Save => self.save_entry(),
            Intent::ClearHistory => {
                self.history.clear();
                let persisted = save_typed(&self.store, HISTORY_KEY, &self.history);
                self.refresh();
                info!("history cleared");
                Feedback::HistoryCleared { persisted }
            }
        }
    }

    /// Classifies a raw transcript and, on a match, selects the mood. Extra
    /// words the speaker used become the pending note.
    pub fn hear(
        &mut self,
        classifier: &MoodClassifier,
        raw_transcript: &str,
        rng: &mut impl Rng,
    ) -> Feedback {
        let transcript = normalize(raw_transcript);
        let Some(classification) = classifier.classify(&transcript) else {
            debug!(%transcript, "no mood recognised");
            return Feedback::NotHeard {
                suggestion: retry_suggestion(rng),
            };
        };

        if let Some(note) = &classification.note {
            self.selection.note = note.clone();
        }
        self.selection.mood = Some(classification.mood);
        let card = MoodCard::draw(classification.mood, self.selection.intensity, rng);
        Feedback::Heard {
            classification,
            card,
        }
    }

    fn select(&mut self, mood: Mood, rng: &mut impl Rng) -> Feedback {
        self.selection.mood = Some(mood);
        Feedback::Shown(MoodCard::draw(mood, self.selection.intensity, rng))
    }

    fn save_entry(&mut self) -> Feedback {
        let Some(mood) = self.selection.mood else {
            return Feedback::NothingSelected;
        };

        let now = self.clock.now().with_timezone(&Utc);
        let entry = MoodEntry::new(mood, self.selection.intensity, &self.selection.note, now);
        let entry = self.history.record(entry).clone();
        let persisted = save_typed(&self.store, HISTORY_KEY, &self.history);
        self.refresh();
        self.selection.note.clear();

        info!(
            id = entry.id,
            mood = %entry.mood,
            intensity = entry.intensity().get(),
            persisted,
            "mood entry saved"
        );
        Feedback::Saved { entry, persisted }
    }

    /// Recomputes streak and stats from the full history.
    fn refresh(&mut self) {
        let now = self.clock.now();
        self.stats = compute_stats(self.history.entries(), now.with_timezone(&Utc));
        self.streak = compute_streak(self.history.entries(), now.date_naive());
    }

    /// A fresh card for the current selection, if any.
    pub fn card(&self, rng: &mut impl Rng) -> Option<MoodCard> {
        self.selection
            .mood
            .map(|mood| MoodCard::draw(mood, self.selection.intensity, rng))
    }

    pub fn listing(&self, window: HistoryWindow) -> Vec<&MoodEntry> {
        self.history
            .listing(window, self.clock.now().with_timezone(&Utc))
    }

    pub fn export(&self) -> ExportDocument {
        ExportDocument::new(
            &self.history,
            self.stats,
            self.streak,
            self.clock.now().with_timezone(&Utc),
        )
    }

    /// Replaces the history with the entries of an export. Returns whether the
    /// new history was persisted.
    pub fn import(&mut self, doc: ExportDocument) -> bool {
        self.history = doc.into_history();
        let persisted = save_typed(&self.store, HISTORY_KEY, &self.history);
        self.refresh();
        info!(entries = self.history.len(), persisted, "history imported");
        persisted
    }

    pub fn share_text(&self) -> Option<String> {
        self.selection.mood.map(|mood| {
            format!(
                "I'm feeling {} {} today.",
                mood.label(),
                appearance::emoji(mood)
            )
        })
    }

    pub fn update_settings(&mut self, change: impl FnOnce(&mut Settings)) -> bool {
        change(&mut self.settings);
        save_typed(&self.store, SETTINGS_KEY, &self.settings)
    }

    /// Remembers the pending selection for the next start, when enabled.
    pub fn save_session(&self) {
        if !self.settings.persist_session {
            return;
        }
        let session = Session {
            selection: self.selection.clone(),
            timestamp: self.clock.now().with_timezone(&Utc),
        };
        save_typed(&self.store, SESSION_KEY, &session);
    }

    fn restore_session(&mut self) {
        let Some(session) = load_typed::<Session>(&self.store, SESSION_KEY) else {
            return;
        };
        if session.is_fresh(self.clock.now().with_timezone(&Utc)) {
            debug!(mood = ?session.selection.mood, "restoring last session");
            self.selection = session.selection;
        }
    }

    pub fn history(&self) -> &MoodHistory {
        &self.history
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Local, TimeDelta, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
    }

    fn app_with(store: MemoryStore) -> MoodMirror<MemoryStore, FixedClock> {
        MoodMirror::open(store, FixedClock(noon()))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn save_needs_a_mood() {
        let mut app = app_with(MemoryStore::default());
        assert_eq!(app.handle(Intent::Save, &mut rng()), Feedback::NothingSelected);
        assert!(app.history().is_empty());
    }

    #[test]
    fn saving_updates_history_stats_and_streak() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();

        let shown = app.handle(Intent::Select(Mood::Excited), &mut rng);
        assert!(matches!(shown, Feedback::Shown(ref card) if card.mood == Mood::Excited));
        app.handle(Intent::SetIntensity(9), &mut rng);
        app.handle(Intent::SetNote("big day".to_owned()), &mut rng);

        let Feedback::Saved { entry, persisted } = app.handle(Intent::Save, &mut rng) else {
            panic!("expected a saved entry");
        };
        assert!(persisted);
        assert_eq!(entry.mood, Mood::Excited);
        assert_eq!(entry.intensity().get(), 5);
        assert_eq!(entry.note, "big day");

        assert_eq!(app.history().len(), 1);
        assert_eq!(app.stats().total, 1);
        assert_eq!(app.stats().dominant, Mood::Excited);
        assert_eq!(app.stats().weekly_avg, 5.0);
        assert_eq!(app.streak(), 1);
        // The mood stays selected; the note is consumed.
        assert_eq!(app.selection().mood, Some(Mood::Excited));
        assert!(app.selection().note.is_empty());
    }

    #[test]
    fn history_survives_reopening() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();
        app.handle(Intent::Select(Mood::Calm), &mut rng);
        app.handle(Intent::Save, &mut rng);

        let reopened = app_with(app.store);
        assert_eq!(reopened.history().len(), 1);
        assert_eq!(reopened.history().entries()[0].mood, Mood::Calm);
        assert_eq!(reopened.streak(), 1);
    }

    #[test]
    fn malformed_history_starts_empty() {
        let store = MemoryStore::default().with_value(HISTORY_KEY, json!({"oops": true}));
        let app = app_with(store);
        assert!(app.history().is_empty());
        assert_eq!(*app.stats(), Stats::default());
    }

    #[test]
    fn unavailable_storage_is_not_fatal() {
        let mut app = app_with(MemoryStore::unavailable());
        let mut rng = rng();
        app.handle(Intent::Select(Mood::Sad), &mut rng);
        let feedback = app.handle(Intent::Save, &mut rng);
        assert!(matches!(feedback, Feedback::Saved { persisted: false, .. }));
        assert_eq!(app.history().len(), 1);
    }

    #[test]
    fn clearing_history_resets_derived_values() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();
        app.handle(Intent::Select(Mood::Angry), &mut rng);
        app.handle(Intent::Save, &mut rng);
        assert_eq!(
            app.handle(Intent::ClearHistory, &mut rng),
            Feedback::HistoryCleared { persisted: true }
        );
        assert!(app.history().is_empty());
        assert_eq!(app.streak(), 0);
        assert_eq!(*app.stats(), Stats::default());
    }

    #[test]
    fn long_notes_are_flagged_but_kept() {
        let mut app = app_with(MemoryStore::default());
        let note = "x".repeat(NOTE_SOFT_LIMIT + 1);
        let feedback = app.handle(Intent::SetNote(note.clone()), &mut rng());
        assert_eq!(
            feedback,
            Feedback::NoteSet {
                chars: NOTE_SOFT_LIMIT + 1,
                over_limit: true
            }
        );
        assert_eq!(app.selection().note, note);
    }

    #[test]
    fn hearing_selects_mood_and_fills_note() {
        let classifier = MoodClassifier::new().unwrap();
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();

        let feedback = app.hear(&classifier, "  I'm feeling TIRED after the long drive  ", &mut rng);
        let Feedback::Heard { classification, card } = feedback else {
            panic!("expected a match");
        };
        assert_eq!(classification.mood, Mood::Tired);
        assert_eq!(card.mood, Mood::Tired);
        assert_eq!(app.selection().mood, Some(Mood::Tired));
        assert_eq!(app.selection().note, "I'm feeling  after the long drive");

        let miss = app.hear(&classifier, "purple elephants", &mut rng);
        assert!(matches!(miss, Feedback::NotHeard { ref suggestion } if suggestion.contains("I feel")));
        assert_eq!(app.selection().mood, Some(Mood::Tired));
    }

    #[test]
    fn session_restored_only_when_fresh() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();
        app.handle(Intent::Select(Mood::Anxious), &mut rng);
        app.handle(Intent::SetIntensity(2), &mut rng);
        app.save_session();
        let store = app.store;

        let later = MoodMirror::open(store, FixedClock(noon() + TimeDelta::hours(3)));
        assert_eq!(later.selection().mood, Some(Mood::Anxious));
        assert_eq!(later.selection().intensity.get(), 2);

        let stale = MoodMirror::open(later.store, FixedClock(noon() + TimeDelta::hours(30)));
        assert_eq!(stale.selection(), &Selection::default());
    }

    #[test]
    fn session_ignored_when_disabled() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();
        app.handle(Intent::Select(Mood::Happy), &mut rng);
        app.save_session();
        assert!(app.update_settings(|s| s.persist_session = false));

        let reopened = app_with(app.store);
        assert!(!reopened.settings().persist_session);
        assert_eq!(reopened.selection().mood, None);
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut app = app_with(MemoryStore::default());
        let mut rng = rng();
        for mood in [Mood::Sad, Mood::Happy, Mood::Happy] {
            app.handle(Intent::Select(mood), &mut rng);
            app.handle(Intent::Save, &mut rng);
        }
        let doc = app.export();
        assert_eq!(doc.streak, 1);
        assert_eq!(doc.stats.dominant, Mood::Happy);

        let json = doc.to_json_pretty().unwrap();
        let mut other = app_with(MemoryStore::default());
        assert!(other.import(ExportDocument::from_json(&json).unwrap()));
        assert_eq!(other.history(), app.history());
        assert_eq!(other.stats(), app.stats());
    }

    #[test]
    fn share_text_names_the_mood() {
        let mut app = app_with(MemoryStore::default());
        assert_eq!(app.share_text(), None);
        app.handle(Intent::Select(Mood::Calm), &mut rng());
        assert_eq!(app.share_text().as_deref(), Some("I'm feeling Calm 😌 today."));
    }

    #[test]
    fn randomize_picks_some_mood() {
        let mut app = app_with(MemoryStore::default());
        let feedback = app.handle(Intent::Randomize, &mut rng());
        assert!(matches!(feedback, Feedback::Shown(_)));
        assert!(app.selection().mood.is_some());
        assert_eq!(app.handle(Intent::ClearSelection, &mut rng()), Feedback::SelectionCleared);
        assert_eq!(app.selection().mood, None);
    }
}
