use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{AlertTiming, CountdownPhase, PortMode};

/// Every timer state change produces an Event.
/// The CLI prints them as JSON; a UI would render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        timer_id: Uuid,
        port_name: String,
        mode: PortMode,
        be_back_by: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    TimerEnded {
        timer_id: Uuid,
        port_name: String,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    /// Countdown crossed into a new urgency phase.
    CountdownPhaseChanged {
        from: CountdownPhase,
        to: CountdownPhase,
        remaining_secs: i64,
        at: DateTime<Utc>,
    },
    /// An advance warning came due during a live countdown.
    AlertDue {
        minutes_before: u32,
        label: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        active: bool,
        port_name: Option<String>,
        hard_deadline: Option<DateTime<Utc>>,
        be_back_by: Option<DateTime<Utc>>,
        remaining_secs: i64,
        countdown: String,
        phase: CountdownPhase,
        alerts: Vec<AlertTiming>,
        at: DateTime<Utc>,
    },
}
