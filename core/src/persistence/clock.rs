use chrono::{DateTime, Local};

/// Source of the current time, for snapshot ids, dates and export names.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Copy, Clone)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
