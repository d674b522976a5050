use std::sync::Arc;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::notification::{DAILY_TITLE, MANUAL_TITLE, NotificationPermission, NotificationSink};
use crate::reminder::ReminderTime;
use crate::weather::{WeatherSnapshot, umbrella_message};

use super::clock::Clock;

const CANCEL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
const COUNTDOWN_TICK: std::time::Duration = std::time::Duration::from_secs(1);
const REPEAT_PERIOD: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// A spawned timer activity paired with its cancellation token. Dropping the
/// handle cancels the token, so an abandoned task never keeps ticking.
pub struct ScheduledTask {
    task_handle: JoinHandle<()>,
    cancellation_token: CancellationToken,
}

impl ScheduledTask {
    pub fn new(task_handle: JoinHandle<()>, cancellation_token: CancellationToken) -> Self {
        Self {
            task_handle,
            cancellation_token,
        }
    }

    pub async fn cancel(mut self, timeout: std::time::Duration) {
        self.cancellation_token.cancel();
        let cancel_with_timeout = time::timeout(timeout, &mut self.task_handle);
        let _ = cancel_with_timeout.await;
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

/// Human-readable remaining time until the next fire, published at 1 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining { hours: i64, minutes: i64, seconds: i64 },
    Soon,
}

impl Countdown {
    fn from_delta(remaining: TimeDelta) -> Self {
        if remaining <= TimeDelta::zero() {
            return Countdown::Soon;
        }
        let total = remaining.num_seconds();
        Countdown::Remaining {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Countdown::Remaining {
                hours,
                minutes,
                seconds,
            } => write!(f, "{hours}h {minutes}m {seconds}s"),
            Countdown::Soon => write!(f, "Soon!"),
        }
    }
}

/// Next instant at which the given time of day occurs. A target equal to
/// `now` counts as already passed, so it never fires in the same tick it was
/// computed in.
pub(crate) fn next_fire_at(fire_at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date();
    let candidate = today.and_time(fire_at);
    if candidate <= now {
        today
            .checked_add_signed(TimeDelta::days(1))
            .expect("Not realistic to overflow")
            .and_time(fire_at)
    } else {
        candidate
    }
}

pub(crate) fn target_delay(fire_at: NaiveTime, now: NaiveDateTime) -> TimeDelta {
    next_fire_at(fire_at, now) - now
}

struct ActiveSchedule {
    target: ReminderTime,
    next_fire: NaiveDateTime,
    fire_task: ScheduledTask,
    countdown_task: ScheduledTask,
}

/// Owns one reminder configuration at a time: a one-shot fire timer, a 1 Hz
/// countdown ticker and, after the first fire, a 24-hour repeat loop. Every
/// reconfiguration cancels the previous timer pair before arming a new one,
/// so at most one live pair exists per scheduler.
pub struct ReminderScheduler {
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    latest_snapshot: Arc<RwLock<Option<WeatherSnapshot>>>,
    countdown_tx: watch::Sender<Option<Countdown>>,
    active: Option<ActiveSchedule>,
}

impl ReminderScheduler {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_clock(sink, Arc::new(super::clock::SystemClock))
    }

    pub fn with_clock(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        let (countdown_tx, _) = watch::channel(None);
        Self {
            clock,
            sink,
            latest_snapshot: Arc::new(RwLock::new(None)),
            countdown_tx,
            active: None,
        }
    }

    /// Remaining-time updates for display. Publishes `None` while idle.
    pub fn countdown(&self) -> watch::Receiver<Option<Countdown>> {
        self.countdown_tx.subscribe()
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    pub fn next_fire(&self) -> Option<NaiveDateTime> {
        self.active.as_ref().map(|active| active.next_fire)
    }

    pub fn target(&self) -> Option<ReminderTime> {
        self.active.as_ref().map(|active| active.target)
    }

    /// (Re)arms the daily reminder. The previous timer pair, if any, is
    /// cancelled and awaited before the new one is spawned. Without any
    /// weather snapshot this is a no-op; the caller retries once weather
    /// has loaded.
    pub async fn set_target(&mut self, target: ReminderTime, snapshot: Option<WeatherSnapshot>) {
        if let Some(snapshot) = snapshot {
            *self.latest_snapshot.write().await = Some(snapshot);
        }
        if self.latest_snapshot.read().await.is_none() {
            log::debug!("No weather snapshot yet, reminder stays unarmed. [target = {target}]");
            return;
        }

        self.disarm().await;

        let now = self.clock.now();
        let next_fire = next_fire_at(target.time(), now);
        let delay = (next_fire - now)
            .to_std()
            .expect("The target delay is always in the future.");

        let fire_task = self.spawn_fire_task(delay);
        let countdown_task = self.spawn_countdown_task(next_fire);

        self.active = Some(ActiveSchedule {
            target,
            next_fire,
            fire_task,
            countdown_task,
        });

        log::info!("Reminder armed. [target = {target}, next_fire = {next_fire}]");
    }

    /// Clears the fire timer, the countdown ticker and the repeat loop.
    /// Safe to call while idle.
    pub async fn cancel(&mut self) {
        if self.disarm().await {
            log::info!("Reminder cancelled.");
        }
        self.countdown_tx.send_replace(None);
    }

    /// Sends the reminder immediately, bypassing the schedule. Armed timers
    /// and the next fire instant are left untouched.
    pub async fn trigger_now(&self, snapshot: Option<&WeatherSnapshot>) {
        let snapshot = match snapshot {
            Some(snapshot) => Some(snapshot.clone()),
            None => self.latest_snapshot.read().await.clone(),
        };
        let Some(snapshot) = snapshot else {
            log::debug!("No weather snapshot yet, nothing to send.");
            return;
        };

        deliver_if_permitted(self.sink.as_ref(), &snapshot, MANUAL_TITLE).await;
    }

    async fn disarm(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.fire_task.cancel(CANCEL_TIMEOUT).await;
                active.countdown_task.cancel(CANCEL_TIMEOUT).await;
                true
            }
            None => false,
        }
    }

    fn spawn_fire_task(&self, delay: std::time::Duration) -> ScheduledTask {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let sink = Arc::clone(&self.sink);
        let latest_snapshot = Arc::clone(&self.latest_snapshot);

        let task_handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_cancellation_token.cancelled() => {
                    log::debug!("Fire task cancelled before first delivery.");
                    return;
                }
                _ = time::sleep(delay) => {
                    fire(sink.as_ref(), &latest_snapshot).await;
                }
            }

            // Recurring daily path: repeat exactly 24 hours after each fire.
            loop {
                tokio::select! {
                    _ = task_cancellation_token.cancelled() => {
                        log::debug!("Daily repeat cancelled.");
                        return;
                    }
                    _ = time::sleep(REPEAT_PERIOD) => {
                        fire(sink.as_ref(), &latest_snapshot).await;
                    }
                }
            }
        });

        ScheduledTask::new(task_handle, cancellation_token)
    }

    fn spawn_countdown_task(&self, next_fire: NaiveDateTime) -> ScheduledTask {
        let cancellation_token = CancellationToken::new();
        let task_cancellation_token = cancellation_token.child_token();
        let clock = Arc::clone(&self.clock);
        let countdown_tx = self.countdown_tx.clone();

        let task_handle = tokio::spawn(async move {
            let mut tick = time::interval(COUNTDOWN_TICK);
            tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = task_cancellation_token.cancelled() => return,
                    _ = tick.tick() => {
                        let countdown = Countdown::from_delta(next_fire - clock.now());
                        let _ = countdown_tx.send(Some(countdown));
                        if countdown == Countdown::Soon {
                            // The fire timer is racing toward the same
                            // instant; the ticker's job ends here.
                            return;
                        }
                    }
                }
            }
        });

        ScheduledTask::new(task_handle, cancellation_token)
    }
}

async fn fire(sink: &dyn NotificationSink, latest_snapshot: &RwLock<Option<WeatherSnapshot>>) {
    // The snapshot is re-read at fire time so a weather refresh between
    // arming and firing shows up in the message.
    let Some(snapshot) = latest_snapshot.read().await.clone() else {
        return;
    };
    deliver_if_permitted(sink, &snapshot, DAILY_TITLE).await;
}

async fn deliver_if_permitted(
    sink: &dyn NotificationSink,
    snapshot: &WeatherSnapshot,
    title: &str,
) {
    // Content is always built; permission gates only the delivery.
    let body = umbrella_message(snapshot);
    if sink.permission() != NotificationPermission::Granted {
        log::debug!("Notification permission not granted. Dropping message. [title = {title}]");
        return;
    }
    sink.deliver(title, &body).await;
}
