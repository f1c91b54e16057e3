//! Advance warnings before the "be back by" time.
//!
//! Alerts whose fire time has already passed are dropped rather than fired
//! late, so the schedule shrinks as the deadline approaches.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Conventional warning ladder, ending with "head back now".
pub const STANDARD_LEAD_MINUTES: [u32; 6] = [90, 60, 30, 15, 5, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTiming {
    pub minutes_before: u32,
    pub fire_at: DateTime<Utc>,
}

impl AlertTiming {
    pub fn label(&self) -> String {
        alert_label(self.minutes_before)
    }
}

pub fn alert_label(minutes_before: u32) -> String {
    if minutes_before == 0 {
        "Head back now".to_string()
    } else {
        format!("{minutes_before} min before")
    }
}

/// Descending lead times for a set of user-selected warning intervals.
///
/// "Head back now" (0) is always included and always last.
pub fn lead_minutes_for(warning_intervals: &BTreeSet<u32>) -> Vec<u32> {
    let mut leads: Vec<u32> = warning_intervals.iter().copied().filter(|m| *m > 0).collect();
    leads.sort_unstable_by(|a, b| b.cmp(a));
    leads.push(0);
    leads
}

pub fn compute_alert_schedule(
    be_back_by: DateTime<Utc>,
    lead_minutes: &[u32],
    now: DateTime<Utc>,
) -> Vec<AlertTiming> {
    lead_minutes
        .iter()
        .filter_map(|&minutes| {
            let fire_at = be_back_by - Duration::minutes(i64::from(minutes));
            (fire_at > now).then_some(AlertTiming {
                minutes_before: minutes,
                fire_at,
            })
        })
        .collect()
}

/// A notification handed to the platform scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertNotification {
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

pub fn notification_requests(port_name: &str, schedule: &[AlertTiming]) -> Vec<AlertNotification> {
    schedule
        .iter()
        .map(|alert| {
            let body = if alert.minutes_before == 0 {
                format!("Head back now. It's time to return to the ship from {port_name}.")
            } else {
                format!(
                    "{} min until you need to head back from {port_name}.",
                    alert.minutes_before
                )
            };
            AlertNotification {
                fire_at: alert.fire_at,
                title: format!("{port_name}: {}", alert.label()),
                body,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn selected_intervals_plus_head_back_now() {
        let leads = lead_minutes_for(&BTreeSet::from([60, 30]));
        assert_eq!(leads, vec![60, 30, 0]);

        let schedule = compute_alert_schedule(at(16, 30), &leads, at(15, 0));
        assert_eq!(
            schedule,
            vec![
                AlertTiming { minutes_before: 60, fire_at: at(15, 30) },
                AlertTiming { minutes_before: 30, fire_at: at(16, 0) },
                AlertTiming { minutes_before: 0, fire_at: at(16, 30) },
            ]
        );
    }

    #[test]
    fn past_alerts_are_dropped() {
        let leads = lead_minutes_for(&BTreeSet::from([60, 30]));
        let schedule = compute_alert_schedule(at(16, 30), &leads, at(15, 45));
        assert_eq!(
            schedule,
            vec![
                AlertTiming { minutes_before: 30, fire_at: at(16, 0) },
                AlertTiming { minutes_before: 0, fire_at: at(16, 30) },
            ]
        );
    }

    #[test]
    fn alert_exactly_now_is_dropped() {
        let schedule = compute_alert_schedule(at(16, 30), &[30, 0], at(16, 0));
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].minutes_before, 0);
    }

    #[test]
    fn empty_after_deadline() {
        let schedule = compute_alert_schedule(at(16, 30), &STANDARD_LEAD_MINUTES, at(16, 30));
        assert!(schedule.is_empty());
    }

    #[test]
    fn duplicate_zero_is_not_repeated() {
        let leads = lead_minutes_for(&BTreeSet::from([0, 5, 90]));
        assert_eq!(leads, vec![90, 5, 0]);
    }

    #[test]
    fn labels() {
        assert_eq!(alert_label(0), "Head back now");
        assert_eq!(alert_label(15), "15 min before");
    }

    #[test]
    fn notifications_follow_schedule() {
        let schedule = compute_alert_schedule(at(16, 30), &[15, 0], at(12, 0));
        let notes = notification_requests("Cozumel", &schedule);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].fire_at, at(16, 15));
        assert_eq!(notes[0].title, "Cozumel: 15 min before");
        assert_eq!(notes[1].title, "Cozumel: Head back now");
    }

    proptest! {
        #[test]
        fn schedule_is_future_and_descending(
            intervals in proptest::collection::btree_set(1u32..180, 0..6),
            now_offset in -300i64..300,
        ) {
            let be_back_by = at(16, 30);
            let now = be_back_by + Duration::minutes(now_offset);
            let schedule = compute_alert_schedule(be_back_by, &lead_minutes_for(&intervals), now);

            for alert in &schedule {
                prop_assert!(alert.fire_at > now);
                prop_assert!(alert.fire_at <= be_back_by);
            }
            for pair in schedule.windows(2) {
                prop_assert!(pair[0].minutes_before > pair[1].minutes_before);
            }
            if now < be_back_by {
                prop_assert_eq!(schedule.last().map(|a| a.minutes_before), Some(0));
            }
        }
    }
}
