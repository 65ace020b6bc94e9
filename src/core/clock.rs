//! Source of "today" for lifecycle dates
//!
//! Intake, repair and pickup dates are calendar dates in the shop's local
//! time. The service asks a [`Clock`] instead of reading the system time so
//! tests can pin the date.

use chrono::{FixedOffset, Local, NaiveDate, Utc};
use std::sync::{Arc, RwLock};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, optionally pinned to a fixed UTC offset
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Use the host's local time zone
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Use a fixed offset east of UTC, e.g. `-180` for the shop's UTC-3
    ///
    /// Returns `None` when the offset is out of range.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self {
            offset: Some(offset),
        })
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
            None => Local::now().date_naive(),
        }
    }
}

/// Clock frozen on a given date, movable by hand
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: Arc<RwLock<NaiveDate>>,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Arc::new(RwLock::new(date)),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        if let Ok(mut current) = self.date.write() {
            *current = date;
        }
    }

    /// Move the clock forward by `days`
    pub fn advance_days(&self, days: u64) {
        if let Ok(mut current) = self.date.write()
            && let Some(next) = current.checked_add_days(chrono::Days::new(days))
        {
            *current = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        match self.date.read() {
            Ok(date) => *date,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
