//! Source of "now" for commands.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pinned: Option<DateTime<Utc>>,
}

impl Clock {
    pub fn new(pinned: Option<DateTime<Utc>>) -> Self {
        Self { pinned }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.pinned.unwrap_or_else(Utc::now)
    }

    /// Current calendar day on the device.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }

    /// A pinned clock moves only when advanced explicitly.
    pub fn advance(&mut self, by: Duration) {
        if let Some(pinned) = self.pinned.as_mut() {
            *pinned += by;
        }
    }
}

pub fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{s}': {e}"))
}
