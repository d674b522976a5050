mod clock;
mod scheduler;

pub use clock::{Clock, SystemClock};
pub use scheduler::{Countdown, ReminderScheduler, ScheduledTask};
