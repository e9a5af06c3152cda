#![deny(warnings)]

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use futures::future::BoxFuture;
use futures::FutureExt;
use mood_mirror_core::app::{Feedback, Intent, MoodCard, MoodMirror};
use mood_mirror_core::classify::MoodClassifier;
use mood_mirror_core::clock::SystemClock;
use mood_mirror_core::config::{
    resolve_data_dir, resolve_reminder_time, AppConfig, Env, StdEnv, DEFAULT_REMINDER_AT,
};
use mood_mirror_core::export::ExportDocument;
use mood_mirror_core::history::{HistoryWindow, MoodEntry, NOTE_SOFT_LIMIT};
use mood_mirror_core::mood::{appearance, Mood};
use mood_mirror_core::reminder::{self, Notifier, Reminder, ReminderError};
use mood_mirror_core::speech::{spawn_listener, LineRecognizer, ListenOptions, SpeechError};
use mood_mirror_core::storage::JsonFileStore;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

type App = MoodMirror<JsonFileStore, SystemClock>;

#[derive(Parser, Debug)]
#[command(name = "mood-mirror")]
#[command(about = "Check in with how you feel: pick or say a mood, keep a streak")]
struct Args {
    /// Where history and settings are kept [env: MOOD_MIRROR_DATA_DIR]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Daily reminder time, HH:MM [env: MOOD_MIRROR_REMINDER_AT]
    #[arg(long, global = true)]
    reminder_at: Option<String>,

    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the moods and their shortcut numbers
    Moods,
    /// Select a mood by name or number (1-8)
    Select { mood: Mood },
    /// Select a random mood
    Random,
    /// Describe how you feel in a sentence
    Say {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Read sentences from stdin, one per line, as if spoken
    Listen {
        /// Keep listening until end of input
        #[arg(long)]
        continuous: bool,
        /// Save an entry for every recognised mood
        #[arg(long)]
        save: bool,
    },
    /// Set the intensity (1-5) of the current mood
    Intensity { level: u8 },
    /// Attach a note to the current mood
    Note {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the current selection again
    Show,
    /// Forget the current selection
    Unselect,
    /// Record the current mood
    Save {
        #[arg(long)]
        mood: Option<Mood>,
        #[arg(long)]
        intensity: Option<u8>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Show recent entries
    History {
        /// all, 7, 30 or 90 days
        #[arg(long, default_value = "all")]
        window: HistoryWindow,
    },
    /// Show streak and statistics
    Stats,
    /// Write history and statistics to a JSON file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Replace history with the entries of an export file
    Import { path: PathBuf },
    /// Delete every entry
    ClearHistory {
        #[arg(long)]
        yes: bool,
    },
    /// Print a line to share the current mood
    Share,
    /// Show or change settings
    Settings {
        #[arg(long)]
        persist_session: Option<bool>,
        #[arg(long)]
        reminders: Option<bool>,
    },
    /// Wait for the daily reminder
    Remind {
        /// Exit after the first reminder
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(&args, &env)?;
    tracing::debug!(
        data_dir = %cfg.data_dir.as_path().display(),
        reminder_at = %cfg.reminder_at.time(),
        "config loaded"
    );

    let store = JsonFileStore::new(cfg.data_dir.as_path());
    let mut app = MoodMirror::open(store, SystemClock);

    run(args.command, &mut app, &cfg).await?;

    app.save_session();
    Ok(())
}

async fn run(command: Command, app: &mut App, cfg: &AppConfig) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    match command {
        Command::Moods => {
            for mood in Mood::ALL {
                println!("{}. {} {}", mood.index() + 1, appearance::emoji(mood), mood);
            }
        }
        Command::Select { mood } => render(&app.handle(Intent::Select(mood), &mut rng)),
        Command::Random => render(&app.handle(Intent::Randomize, &mut rng)),
        Command::Say { words } => {
            let classifier = MoodClassifier::new()?;
            render(&app.hear(&classifier, &words.join(" "), &mut rng));
        }
        Command::Listen { continuous, save } => listen(app, continuous, save).await?,
        Command::Intensity { level } => {
            render(&app.handle(Intent::SetIntensity(level), &mut rng));
            if let Some(card) = app.card(&mut rng) {
                print_card(&card);
            }
        }
        Command::Note { text } => render(&app.handle(Intent::SetNote(text.join(" ")), &mut rng)),
        Command::Show => match app.card(&mut rng) {
            Some(card) => print_card(&card),
            None => println!("No mood selected. Try `mood-mirror select happy`."),
        },
        Command::Unselect => render(&app.handle(Intent::ClearSelection, &mut rng)),
        Command::Save {
            mood,
            intensity,
            note,
        } => {
            if let Some(mood) = mood {
                app.handle(Intent::Select(mood), &mut rng);
            }
            if let Some(level) = intensity {
                app.handle(Intent::SetIntensity(level), &mut rng);
            }
            if let Some(note) = note {
                render(&app.handle(Intent::SetNote(note), &mut rng));
            }
            render(&app.handle(Intent::Save, &mut rng));
            print_stats(app);
        }
        Command::History { window } => print_history(&app.listing(window)),
        Command::Stats => print_stats(app),
        Command::Export { out, stdout } => {
            let doc = app.export();
            let json = doc.to_json_pretty()?;
            if stdout {
                println!("{json}");
            } else {
                let path = out.unwrap_or_else(|| {
                    PathBuf::from(ExportDocument::default_file_name(doc.export_date))
                });
                std::fs::write(&path, json)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!(
                    "Exported {} entries to {}",
                    doc.mood_history.len(),
                    path.display()
                );
            }
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let doc = ExportDocument::from_json(&raw)
                .with_context(|| format!("{} is not a mood mirror export", path.display()))?;
            let persisted = app.import(doc);
            println!("Imported {} entries.", app.history().len());
            if !persisted {
                println!("Warning: could not write to the data directory; changes are not saved.");
            }
            print_stats(app);
        }
        Command::ClearHistory { yes } => {
            if yes || confirm("Clear all saved entries? This cannot be undone.")? {
                render(&app.handle(Intent::ClearHistory, &mut rng));
            } else {
                println!("Kept your history.");
            }
        }
        Command::Share => match app.share_text() {
            Some(text) => println!("{text}"),
            None => println!("Select a mood first."),
        },
        Command::Settings {
            persist_session,
            reminders,
        } => {
            if persist_session.is_some() || reminders.is_some() {
                let saved = app.update_settings(|s| {
                    if let Some(v) = persist_session {
                        s.persist_session = v;
                    }
                    if let Some(v) = reminders {
                        s.reminders = v;
                    }
                });
                if !saved {
                    println!("Warning: settings could not be saved.");
                }
            }
            let s = app.settings();
            println!("persist-session: {}", s.persist_session);
            println!("reminders:       {}", s.reminders);
        }
        Command::Remind { once } => remind(app, cfg, once).await?,
    }

    Ok(())
}

async fn listen(app: &mut App, continuous: bool, save: bool) -> anyhow::Result<()> {
    let classifier = MoodClassifier::new()?;
    let mut rng = rand::rng();
    let options = ListenOptions {
        continuous,
        restart_delay: Duration::ZERO,
        ..ListenOptions::default()
    };

    println!("Listening... tell me how you feel (Ctrl-D to stop).");
    let mut results = spawn_listener(LineRecognizer::stdin(), options);
    while let Some(result) = results.recv().await {
        match result {
            Ok(transcript) => {
                let feedback = app.hear(&classifier, &transcript.text, &mut rng);
                render(&feedback);
                if save && matches!(feedback, Feedback::Heard { .. }) {
                    render(&app.handle(Intent::Save, &mut rng));
                }
            }
            Err(SpeechError::Aborted) => break,
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

async fn remind(app: &App, cfg: &AppConfig, once: bool) -> anyhow::Result<()> {
    if !app.settings().reminders {
        return Err(ReminderError::Disabled)
            .context("turn them on with `mood-mirror settings --reminders true`");
    }

    let at = cfg.reminder_at;
    let next = reminder::next_occurrence(&Local::now(), at.time());
    println!("Next reminder: {}", next.format("%Y-%m-%d %H:%M"));

    let (tx, mut rx) = mpsc::channel(1);
    let timer = reminder::spawn_daily(at, tx);
    let delivered = reminder::deliver(&ConsoleNotifier, &mut rx, once.then_some(1)).await;
    timer.abort();
    delivered?;
    Ok(())
}

/// Prints reminders to the terminal, with a bell.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, reminder: Reminder) -> BoxFuture<'_, Result<(), ReminderError>> {
        async move {
            tracing::info!(due = %reminder.due, "reminder delivered");
            writeln!(io::stdout(), "\x07{}\n{}", reminder.title, reminder.body)
                .map_err(|e| ReminderError::Delivery(e.to_string()))
        }
        .boxed()
    }
}

fn render(feedback: &Feedback) {
    match feedback {
        Feedback::Shown(card) => print_card(card),
        Feedback::Heard {
            classification,
            card,
        } => {
            println!("I heard \"{}\".", classification.matched);
            print_card(card);
            if let Some(note) = &classification.note {
                println!("Note: {note}");
            }
        }
        Feedback::NotHeard { suggestion } => println!("{suggestion}"),
        Feedback::SelectionCleared => println!("Selection cleared."),
        Feedback::IntensitySet(level) => println!("Intensity: {}/5", level.get()),
        Feedback::NoteSet { chars, over_limit } => {
            if *over_limit {
                println!("Note is {chars} characters; keeping it under {NOTE_SOFT_LIMIT} is easier to read back.");
            } else {
                println!("Note saved ({chars} characters).");
            }
        }
        Feedback::Saved { entry, persisted } => {
            println!(
                "Saved {} {} ({}/5).",
                appearance::emoji(entry.mood),
                entry.mood,
                entry.intensity().get()
            );
            if !persisted {
                println!("Warning: could not write to the data directory; this entry is not kept.");
            }
        }
        Feedback::NothingSelected => {
            println!("Please select a mood first, e.g. `mood-mirror save --mood calm`.")
        }
        Feedback::HistoryCleared { persisted } => {
            println!("History cleared.");
            if !persisted {
                println!("Warning: the stored history could not be overwritten.");
            }
        }
    }
}

fn print_card(card: &MoodCard) {
    println!("{} {}  {}", card.emoji, card.mood, card.particles.concat());
    println!("{}", card.affirmation);
    println!("Intensity: {}/5  ·  Tip: {}", card.intensity.get(), card.tip);
}

fn print_stats(app: &App) {
    let stats = app.stats();
    println!("Streak: {} day(s)", app.streak());
    println!("Entries: {}", stats.total);
    println!(
        "Mostly: {} {}",
        appearance::emoji(stats.dominant),
        stats.dominant
    );
    println!("7-day average intensity: {:.1}", stats.weekly_avg);
}

fn print_history(entries: &[&MoodEntry]) {
    if entries.is_empty() {
        println!("No mood entries yet.");
        return;
    }
    for entry in entries {
        let when = entry.timestamp.with_timezone(&Local);
        let mut line = format!(
            "[{}] {} {} ({}/5)",
            when.format("%Y-%m-%d %H:%M"),
            appearance::emoji(entry.mood),
            entry.mood,
            entry.intensity().get()
        );
        if !entry.note.is_empty() {
            line.push_str(&format!(" \"{}\"", entry.note));
        }
        println!("{line}");
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args, env: &impl Env) -> anyhow::Result<AppConfig> {
    let data_dir = resolve_data_dir(args.data_dir.clone(), env)?;
    let reminder_at = resolve_reminder_time(args.reminder_at.clone(), env)
        .with_context(|| format!("expected a time like {DEFAULT_REMINDER_AT}"))?;

    Ok(AppConfig {
        data_dir,
        reminder_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mood_mirror_core::config::{MapEnv, ENV_DATA_DIR, ENV_REMINDER_AT};
    use std::path::Path;

    #[test]
    fn parses_subcommands() {
        let args = Args::try_parse_from(["mood-mirror", "save", "--mood", "3", "--intensity", "4"])
            .expect("valid args");
        match args.command {
            Command::Save {
                mood, intensity, ..
            } => {
                assert_eq!(mood, Some(Mood::Angry));
                assert_eq!(intensity, Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let args = Args::try_parse_from(["mood-mirror", "history", "--window", "30"])
            .expect("valid args");
        assert!(matches!(
            args.command,
            Command::History {
                window: HistoryWindow::Days(30)
            }
        ));

        assert!(Args::try_parse_from(["mood-mirror", "select", "grumpy"]).is_err());
        assert!(Args::try_parse_from(["mood-mirror", "history", "--window", "14"]).is_err());
    }

    #[test]
    fn config_prefers_flags_over_env() {
        let env = MapEnv::default()
            .with_var(ENV_DATA_DIR, "/env/data")
            .with_var(ENV_REMINDER_AT, "08:00");
        let args = Args::try_parse_from([
            "mood-mirror",
            "--data-dir",
            "/flag/data",
            "stats",
        ])
        .expect("valid args");
        let cfg = build_config(&args, &env).expect("valid config");
        assert_eq!(cfg.data_dir.as_path(), Path::new("/flag/data"));
        assert_eq!(cfg.reminder_at.time().to_string(), "08:00:00");
    }

    #[test]
    fn bad_reminder_time_is_an_error() {
        let args = Args::try_parse_from(["mood-mirror", "--reminder-at", "late", "stats"])
            .expect("valid args");
        assert!(build_config(&args, &MapEnv::default()).is_err());
    }
}
