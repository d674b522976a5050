use chrono::NaiveDateTime;

/// Source of "now" for the scheduler. Everything time-dependent goes through
/// this seam so timer behavior can be tested against tokio's virtual clock.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

/// The local wall clock. The whole system assumes a single timezone, so the
/// naive local time is all we ever need.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock pinned to a base instant plus whatever time tokio has advanced.
/// Under `start_paused` runtimes this tracks virtual time exactly, keeping
/// the wall clock and tokio timers in lockstep.
#[cfg(test)]
pub struct VirtualClock {
    base: NaiveDateTime,
    started: tokio::time::Instant,
}

#[cfg(test)]
impl VirtualClock {
    pub fn starting_at(base: NaiveDateTime) -> Self {
        Self {
            base,
            started: tokio::time::Instant::now(),
        }
    }
}

#[cfg(test)]
impl Clock for VirtualClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = self.started.elapsed();
        self.base + chrono::TimeDelta::from_std(elapsed).expect("elapsed time fits a TimeDelta")
    }
}
