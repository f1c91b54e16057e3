//! Live countdown to the "be back by" time.
//!
//! Like the rest of the crate this is wall-clock driven with no internal
//! thread: the caller invokes `tick(now)` once per second while a timer is
//! active and stops when the timer ends.
//!
//! ```text
//! Normal -> Urgent (< 30 min) -> Critical (< 15 min) -> Expired (0)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alerts::AlertTiming;
use crate::events::Event;

/// Remaining-time thresholds, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    pub urgent_secs: i64,
    pub critical_secs: i64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            urgent_secs: 1800,
            critical_secs: 900,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownPhase {
    Normal,
    Urgent,
    Critical,
    Expired,
}

impl CountdownPhase {
    pub fn classify(remaining_secs: i64, thresholds: UrgencyThresholds) -> Self {
        if remaining_secs <= 0 {
            CountdownPhase::Expired
        } else if remaining_secs < thresholds.critical_secs {
            CountdownPhase::Critical
        } else if remaining_secs < thresholds.urgent_secs {
            CountdownPhase::Urgent
        } else {
            CountdownPhase::Normal
        }
    }
}

#[derive(Debug, Clone)]
pub struct Countdown {
    be_back_by: DateTime<Utc>,
    remaining_secs: i64,
    thresholds: UrgencyThresholds,
    phase: CountdownPhase,
    /// Alerts not yet announced, in fire order.
    pending: Vec<AlertTiming>,
    active: bool,
}

impl Countdown {
    pub fn start(be_back_by: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let thresholds = UrgencyThresholds::default();
        let remaining_secs = seconds_until(be_back_by, now);
        Self {
            be_back_by,
            remaining_secs,
            thresholds,
            phase: CountdownPhase::classify(remaining_secs, thresholds),
            pending: Vec::new(),
            active: true,
        }
    }

    pub fn with_thresholds(mut self, thresholds: UrgencyThresholds) -> Self {
        self.thresholds = thresholds;
        self.phase = CountdownPhase::classify(self.remaining_secs, thresholds);
        self
    }

    /// Alerts to announce as `AlertDue` events when their time arrives.
    pub fn with_alerts(mut self, alerts: Vec<AlertTiming>) -> Self {
        self.pending = alerts;
        self.pending.sort_by_key(|a| a.fire_at);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn be_back_by(&self) -> DateTime<Utc> {
        self.be_back_by
    }

    pub fn remaining_secs(&self) -> i64 {
        self.remaining_secs
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_urgent(&self) -> bool {
        self.remaining_secs > 0 && self.remaining_secs < self.thresholds.urgent_secs
    }

    pub fn is_critical(&self) -> bool {
        self.remaining_secs > 0 && self.remaining_secs < self.thresholds.critical_secs
    }

    pub fn formatted(&self) -> String {
        format_countdown(self.remaining_secs)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Recompute the remaining time. The value never goes up while the
    /// countdown is active, even if the wall clock steps backwards.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.active {
            return Vec::new();
        }
        let mut events = Vec::new();

        self.remaining_secs = self.remaining_secs.min(seconds_until(self.be_back_by, now));

        let due = self.pending.iter().take_while(|a| a.fire_at <= now).count();
        for alert in self.pending.drain(..due) {
            events.push(Event::AlertDue {
                minutes_before: alert.minutes_before,
                label: alert.label(),
                at: now,
            });
        }

        let phase = CountdownPhase::classify(self.remaining_secs, self.thresholds);
        if phase != self.phase {
            events.push(Event::CountdownPhaseChanged {
                from: self.phase,
                to: phase,
                remaining_secs: self.remaining_secs,
                at: now,
            });
            self.phase = phase;
        }
        events
    }

    /// Stop ticking. Later ticks are ignored.
    pub fn cancel(&mut self) {
        self.active = false;
        self.pending.clear();
    }
}

/// `H:MM:SS`, with hours unpadded.
pub fn format_countdown(remaining_secs: i64) -> String {
    let secs = remaining_secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn seconds_until(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, s).unwrap()
    }

    #[test]
    fn remaining_floors_at_zero() {
        let mut countdown = Countdown::start(at(16, 30, 0), at(16, 29, 58));
        assert_eq!(countdown.remaining_secs(), 2);
        countdown.tick(at(16, 31, 0));
        assert_eq!(countdown.remaining_secs(), 0);
        assert_eq!(countdown.phase(), CountdownPhase::Expired);
        assert!(!countdown.is_urgent());
        assert!(!countdown.is_critical());
    }

    #[test]
    fn urgency_thresholds() {
        let countdown = Countdown::start(at(16, 30, 0), at(16, 0, 0));
        assert_eq!(countdown.remaining_secs(), 1800);
        assert!(!countdown.is_urgent());

        let countdown = Countdown::start(at(16, 30, 0), at(16, 0, 1));
        assert!(countdown.is_urgent());
        assert!(!countdown.is_critical());

        let countdown = Countdown::start(at(16, 30, 0), at(16, 15, 1));
        assert!(countdown.is_urgent());
        assert!(countdown.is_critical());
    }

    #[test]
    fn phase_changes_emit_events() {
        let mut countdown = Countdown::start(at(16, 30, 0), at(15, 59, 59));
        assert_eq!(countdown.phase(), CountdownPhase::Normal);
        assert!(countdown.tick(at(15, 59, 59)).is_empty());

        let events = countdown.tick(at(16, 0, 1));
        assert!(matches!(
            events.as_slice(),
            [Event::CountdownPhaseChanged {
                from: CountdownPhase::Normal,
                to: CountdownPhase::Urgent,
                ..
            }]
        ));
    }

    #[test]
    fn due_alerts_fire_once() {
        let alerts = vec![
            AlertTiming { minutes_before: 30, fire_at: at(16, 0, 0) },
            AlertTiming { minutes_before: 0, fire_at: at(16, 30, 0) },
        ];
        let mut countdown = Countdown::start(at(16, 30, 0), at(15, 0, 0)).with_alerts(alerts);

        let events = countdown.tick(at(16, 0, 0));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::AlertDue { minutes_before: 30, .. })));

        let events = countdown.tick(at(16, 0, 1));
        assert!(!events.iter().any(|e| matches!(e, Event::AlertDue { .. })));
    }

    #[test]
    fn cancelled_countdown_ignores_ticks() {
        let mut countdown = Countdown::start(at(16, 30, 0), at(15, 0, 0));
        countdown.cancel();
        assert!(countdown.tick(at(16, 29, 0)).is_empty());
        assert_eq!(countdown.remaining_secs(), 5400);
        assert!(!countdown.is_active());
    }

    #[test]
    fn custom_thresholds() {
        let countdown = Countdown::start(at(16, 30, 0), at(15, 30, 0)).with_thresholds(
            UrgencyThresholds {
                urgent_secs: 7200,
                critical_secs: 3601,
            },
        );
        assert_eq!(countdown.phase(), CountdownPhase::Critical);
    }

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_countdown(0), "0:00:00");
        assert_eq!(format_countdown(3_725), "1:02:05");
        assert_eq!(format_countdown(-5), "0:00:00");
    }

    proptest! {
        #[test]
        fn remaining_never_increases(steps in proptest::collection::vec(-5i64..120, 1..50)) {
            let be_back_by = at(16, 30, 0);
            let mut now = at(16, 0, 0);
            let mut countdown = Countdown::start(be_back_by, now);
            let mut last = countdown.remaining_secs();
            for step in steps {
                now += Duration::seconds(step);
                countdown.tick(now);
                prop_assert!(countdown.remaining_secs() <= last);
                prop_assert!(countdown.remaining_secs() >= 0);
                last = countdown.remaining_secs();
            }
        }
    }
}
