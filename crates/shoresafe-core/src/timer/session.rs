use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alerts::{compute_alert_schedule, AlertTiming};
use super::countdown::{format_countdown, CountdownPhase, UrgencyThresholds};
use super::model::{PortTimer, TimerDraft};
use crate::events::Event;

/// The active timer plus recently ended ones, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerSession {
    #[serde(default)]
    active: Option<PortTimer>,
    #[serde(default)]
    recent: Vec<PortTimer>,
}

impl TimerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&PortTimer> {
        self.active.as_ref()
    }

    pub fn recent(&self) -> &[PortTimer] {
        &self.recent
    }

    /// Start a timer from a draft. A timer that is already running is ended
    /// first so it lands in history.
    pub fn create_timer(&mut self, draft: TimerDraft, now: DateTime<Utc>) -> Vec<Event> {
        let mut events: Vec<Event> = self.end_timer(now).into_iter().collect();
        let timer = draft.into_timer();
        events.push(Event::TimerStarted {
            timer_id: timer.id,
            port_name: timer.port_name.clone(),
            mode: timer.mode,
            be_back_by: timer.be_back_by(),
            at: now,
        });
        self.active = Some(timer);
        events
    }

    pub fn end_timer(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let mut ended = self.active.take()?;
        ended.is_active = false;
        let event = Event::TimerEnded {
            timer_id: ended.id,
            port_name: ended.port_name.clone(),
            remaining_secs: (ended.be_back_by() - now).num_seconds().max(0),
            at: now,
        };
        self.recent.insert(0, ended);
        Some(event)
    }

    pub fn alert_schedule(&self, lead_minutes: &[u32], now: DateTime<Utc>) -> Vec<AlertTiming> {
        self.active
            .as_ref()
            .map(|t| compute_alert_schedule(t.be_back_by(), lead_minutes, now))
            .unwrap_or_default()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(
        &self,
        lead_minutes: &[u32],
        thresholds: UrgencyThresholds,
        now: DateTime<Utc>,
    ) -> Event {
        let timer = self.active.as_ref();
        let remaining_secs = timer
            .map(|t| (t.be_back_by() - now).num_seconds().max(0))
            .unwrap_or(0);
        Event::StateSnapshot {
            active: timer.is_some(),
            port_name: timer.map(|t| t.port_name.clone()),
            hard_deadline: timer.map(PortTimer::hard_deadline),
            be_back_by: timer.map(PortTimer::be_back_by),
            remaining_secs,
            countdown: format_countdown(remaining_secs),
            phase: CountdownPhase::classify(remaining_secs, thresholds),
            alerts: self.alert_schedule(lead_minutes, now),
            at: now,
        }
    }
}
