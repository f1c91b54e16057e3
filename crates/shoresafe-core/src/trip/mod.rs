//! Trip and port model.
//!
//! A trip is an ordered list of port days. Port times are often unknown when
//! the trip is set up; a port without an all-aboard time is in a "needs
//! input" state rather than an error.

mod persona;
mod setup;

pub use persona::BufferPersona;
pub use setup::{StepCursor, TripSetup, SETUP_STEPS};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::timer::{PortMode, TimerDraft};

/// Relationship between ship time and the phone's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShipTimeConfig {
    /// Ship time matches phone time.
    #[default]
    Local,
    /// Ship is N hours ahead (positive) or behind (negative).
    Offset { hours: i32 },
}

impl ShipTimeConfig {
    pub fn from_offset_hours(hours: i32) -> Self {
        if hours == 0 {
            ShipTimeConfig::Local
        } else {
            ShipTimeConfig::Offset { hours }
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ShipTimeConfig::Local)
    }

    pub fn offset_hours(&self) -> i32 {
        match self {
            ShipTimeConfig::Local => 0,
            ShipTimeConfig::Offset { hours } => *hours,
        }
    }

    pub fn display_label(&self) -> String {
        match self.offset_hours() {
            h if h > 0 => format!("Ship is +{h}h ahead"),
            h if h < 0 => format!("Ship is {h}h behind"),
            _ => "Same as local".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Unknown until the user fills it in.
    #[serde(default)]
    pub all_aboard_time: Option<DateTime<Utc>>,
    /// Not applicable, or unknown.
    #[serde(default)]
    pub last_tender_time: Option<DateTime<Utc>>,
    pub mode: PortMode,
    /// Overrides the trip persona's buffer.
    #[serde(default)]
    pub custom_buffer_minutes: Option<u32>,
}

impl Port {
    pub fn placeholder(name: impl Into<String>, date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            all_aboard_time: None,
            last_tender_time: None,
            mode: PortMode::Dock,
            custom_buffer_minutes: None,
        }
    }

    pub fn has_required_times(&self) -> bool {
        self.all_aboard_time.is_some()
    }

    pub fn display_date(&self) -> String {
        match self.date {
            Some(date) => date.format("%a, %b %-d").to_string(),
            None => "Date TBD".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub cruise_line: Option<String>,
    #[serde(default)]
    pub sail_date: Option<NaiveDate>,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub ship_time_config: ShipTimeConfig,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub buffer_persona: BufferPersona,
    pub warning_intervals: BTreeSet<u32>,
    #[serde(default)]
    pub notifications_granted: bool,
}

impl Trip {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            cruise_line: None,
            sail_date: None,
            return_date: None,
            ship_time_config: ShipTimeConfig::Local,
            ports: Vec::new(),
            buffer_persona: BufferPersona::Balanced,
            warning_intervals: BTreeSet::from([60, 30, 15, 5]),
            notifications_granted: false,
        }
    }

    pub fn port(&self, id: Uuid) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == id)
    }

    /// Replace the port with the same id. Returns false if there is none.
    pub fn replace_port(&mut self, port: Port) -> bool {
        match self.ports.iter_mut().find(|p| p.id == port.id) {
            Some(slot) => {
                *slot = port;
                true
            }
            None => false,
        }
    }

    /// First port dated `today`.
    pub fn today_port(&self, today: NaiveDate) -> Option<&Port> {
        self.ports.iter().find(|p| p.date == Some(today))
    }

    /// Earliest port dated today or later.
    pub fn next_port(&self, today: NaiveDate) -> Option<&Port> {
        self.ports
            .iter()
            .filter(|p| p.date.is_some_and(|d| d >= today))
            .min_by_key(|p| p.date)
    }

    pub fn ports_needing_times(&self) -> Vec<&Port> {
        self.ports.iter().filter(|p| !p.has_required_times()).collect()
    }

    /// Buffer for a port: its own override, else the persona's buffer for
    /// the port's mode.
    pub fn buffer_for(&self, port: &Port) -> u32 {
        port.custom_buffer_minutes
            .unwrap_or_else(|| self.buffer_persona.buffer_for(port.mode))
    }

    pub fn ship_time_adjusted(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        time + Duration::hours(i64::from(self.ship_time_config.offset_hours()))
    }

    /// Seconds from `now` until the port's be-back-by time. Negative once it
    /// has passed; `None` while the all-aboard time is unknown.
    pub fn countdown_to_all_aboard(&self, port: &Port, now: DateTime<Utc>) -> Option<i64> {
        let all_aboard = port.all_aboard_time?;
        let be_back_by = all_aboard - Duration::minutes(i64::from(self.buffer_for(port)));
        Some((be_back_by - now).num_seconds())
    }

    /// Timer draft for a port day, if its all-aboard time is known.
    pub fn timer_draft(&self, port: &Port) -> Option<TimerDraft> {
        self.timer_draft_as(port, port.mode)
    }

    /// Timer draft with the port's mode overridden. The buffer follows the
    /// new mode unless the port has its own.
    pub fn timer_draft_as(&self, port: &Port, mode: PortMode) -> Option<TimerDraft> {
        let all_aboard = port.all_aboard_time?;
        let buffer = port
            .custom_buffer_minutes
            .unwrap_or_else(|| self.buffer_persona.buffer_for(mode));
        Some(
            TimerDraft::new(port.name.clone(), all_aboard, mode)
                .with_buffer(buffer)
                .with_last_tender(port.last_tender_time),
        )
    }
}

impl Default for Trip {
    fn default() -> Self {
        Self::empty()
    }
}
