use crate::config::ReminderTime;
use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const REMINDER_TITLE: &str = "Mood Mirror reminder";
pub const REMINDER_BODY: &str = "How are you feeling today? Take a moment to check in.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub due: DateTime<Local>,
}

impl Reminder {
    pub fn due_at(due: DateTime<Local>) -> Self {
        Self {
            title: REMINDER_TITLE.to_owned(),
            body: REMINDER_BODY.to_owned(),
            due,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ReminderError {
    #[error("reminders are turned off in settings")]
    Disabled,

    #[error("reminder delivery failed: {0}")]
    Delivery(String),
}

pub trait Notifier: Send + Sync {
    fn notify(&self, reminder: Reminder) -> BoxFuture<'_, Result<(), ReminderError>>;
}

/// Writes reminders to the log.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, reminder: Reminder) -> BoxFuture<'_, Result<(), ReminderError>> {
        async move {
            tracing::info!(due = %reminder.due, title = %reminder.title, "{}", reminder.body);
            Ok(())
        }
        .boxed()
    }
}

/// The first moment strictly after `now` whose wall-clock time is `at`:
/// later today if that is still ahead, otherwise tomorrow.
pub fn next_occurrence<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut day = now.date_naive();
    for _ in 0..3 {
        let candidate = day.and_time(at).and_local_timezone(tz.clone()).earliest();
        if let Some(candidate) = candidate.filter(|c| c > now) {
            return candidate;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    // Only reachable around a DST gap swallowing `at` or at the end of time.
    now.clone() + TimeDelta::days(1)
}

fn until(due: &DateTime<Local>, now: &DateTime<Local>) -> Duration {
    (due.clone() - now.clone()).to_std().unwrap_or(Duration::ZERO)
}

/// Sends a [`Reminder`] every day at `at` local time until the receiver is
/// dropped.
pub fn spawn_daily(at: ReminderTime, tx: mpsc::Sender<Reminder>) -> JoinHandle<()> {
    spawn_with(
        move || {
            let now = Local::now();
            let due = next_occurrence(&now, at.time());
            (due, until(&due, &now))
        },
        tx,
    )
}

/// Timer loop behind [`spawn_daily`]; `next` yields the next due time and how
/// long to wait for it.
pub fn spawn_with<F>(mut next: F, tx: mpsc::Sender<Reminder>) -> JoinHandle<()>
where
    F: FnMut() -> (DateTime<Local>, Duration) + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let (due, wait) = next();
            tracing::debug!(%due, ?wait, "next reminder scheduled");
            tokio::time::sleep(wait).await;
            if tx.send(Reminder::due_at(due)).await.is_err() {
                break;
            }
        }
    })
}

/// Hands received reminders to `notifier`, stopping after `limit` deliveries
/// when one is given. Returns how many were delivered.
pub async fn deliver<N: Notifier>(
    notifier: &N,
    rx: &mut mpsc::Receiver<Reminder>,
    limit: Option<usize>,
) -> Result<usize, ReminderError> {
    let mut delivered = 0;
    while limit.map_or(true, |max| delivered < max) {
        let Some(reminder) = rx.recv().await else {
            break;
        };
        notifier.notify(reminder).await?;
        delivered += 1;
    }
    Ok(delivered)
}
