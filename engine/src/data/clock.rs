use chrono::{Duration, Local, NaiveDate};
use std::sync::RwLock;

/// Source of "today" for freshness checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today: RwLock::new(today) }
    }

    pub fn set(&self, today: NaiveDate) {
        match self.today.write() {
            Ok(mut guard) => *guard = today,
            Err(poisoned) => *poisoned.into_inner() = today,
        }
    }

    pub fn advance_days(&self, days: i64) {
        let today = self.today();
        self.set(today + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.today.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
