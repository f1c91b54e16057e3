//! Trip setup wizard.
//!
//! The flow is linear: welcome, trip info, ship time, ports, buffer,
//! notifications, summary. The step position is a bounded counter, and the
//! draft fields become a [`Trip`] at the end.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use super::{BufferPersona, Port, ShipTimeConfig, Trip};

pub const SETUP_STEPS: usize = 7;

/// Position within a linear wizard, bounded to `[0, total - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCursor {
    current: usize,
    total: usize,
    complete: bool,
}

impl StepCursor {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total: total.max(1),
            complete: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Advance one step; on the last step this marks the wizard complete.
    pub fn next(&mut self) {
        if self.current + 1 < self.total {
            self.current += 1;
        } else {
            self.complete = true;
        }
    }

    pub fn back(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn go_to(&mut self, step: usize) {
        self.current = step.min(self.total.saturating_sub(1));
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSetup {
    pub cursor: StepCursor,
    pub trip_name: String,
    pub cruise_line: Option<String>,
    pub sail_date: NaiveDate,
    pub return_date: NaiveDate,
    pub offset_hours: i32,
    pub ports: Vec<Port>,
    pub buffer_persona: BufferPersona,
    pub warning_intervals: BTreeSet<u32>,
    pub notifications_granted: bool,
}

impl TripSetup {
    /// Fresh draft sailing a week after `today` and returning a week later.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            cursor: StepCursor::new(SETUP_STEPS),
            trip_name: String::new(),
            cruise_line: None,
            sail_date: today + Duration::days(7),
            return_date: today + Duration::days(14),
            offset_hours: 0,
            ports: Vec::new(),
            buffer_persona: BufferPersona::Balanced,
            warning_intervals: BufferPersona::Balanced.default_warnings(),
            notifications_granted: false,
        }
    }

    // ── Ports ────────────────────────────────────────────────────────

    pub fn add_port(&mut self, name: impl Into<String>, date: Option<NaiveDate>) -> Uuid {
        let port = Port::placeholder(name, date);
        let id = port.id;
        self.ports.push(port);
        id
    }

    /// Out-of-range indexes are ignored.
    pub fn remove_port(&mut self, index: usize) -> Option<Port> {
        (index < self.ports.len()).then(|| self.ports.remove(index))
    }

    pub fn update_port_time(
        &mut self,
        id: Uuid,
        all_aboard: Option<DateTime<Utc>>,
        last_tender: Option<DateTime<Utc>>,
    ) -> bool {
        match self.ports.iter_mut().find(|p| p.id == id) {
            Some(port) => {
                port.all_aboard_time = all_aboard;
                port.last_tender_time = last_tender;
                true
            }
            None => false,
        }
    }

    // ── Preferences ──────────────────────────────────────────────────

    /// Switching persona resets the warnings to that persona's defaults.
    pub fn select_persona(&mut self, persona: BufferPersona) {
        self.buffer_persona = persona;
        self.warning_intervals = persona.default_warnings();
    }

    pub fn toggle_warning(&mut self, minutes: u32) {
        if !self.warning_intervals.remove(&minutes) {
            self.warning_intervals.insert(minutes);
        }
    }

    /// Selecting the current cruise line again clears it.
    pub fn select_cruise_line(&mut self, name: &str) {
        self.cruise_line = match self.cruise_line.as_deref() {
            Some(current) if current == name => None,
            _ => Some(name.to_string()),
        };
    }

    pub fn build_trip(&self) -> Trip {
        let name = if self.trip_name.trim().is_empty() {
            self.cruise_line
                .clone()
                .unwrap_or_else(|| "My Cruise".to_string())
        } else {
            self.trip_name.clone()
        };
        Trip {
            id: Uuid::new_v4(),
            name,
            cruise_line: self.cruise_line.clone(),
            sail_date: Some(self.sail_date),
            return_date: Some(self.return_date),
            ship_time_config: ShipTimeConfig::from_offset_hours(self.offset_hours),
            ports: self.ports.clone(),
            buffer_persona: self.buffer_persona,
            warning_intervals: self.warning_intervals.clone(),
            notifications_granted: self.notifications_granted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn cursor_walks_forward_and_completes() {
        let mut cursor = StepCursor::new(3);
        cursor.next();
        cursor.next();
        assert_eq!(cursor.current(), 2);
        assert!(!cursor.is_complete());
        cursor.next();
        assert_eq!(cursor.current(), 2);
        assert!(cursor.is_complete());
    }

    #[test]
    fn cursor_back_floors_at_zero() {
        let mut cursor = StepCursor::new(SETUP_STEPS);
        cursor.back();
        assert_eq!(cursor.current(), 0);
        cursor.go_to(99);
        assert_eq!(cursor.current(), SETUP_STEPS - 1);
    }

    #[test]
    fn go_to_on_empty_cursor_stays_at_zero() {
        let mut cursor: StepCursor =
            serde_json::from_str(r#"{"current":0,"total":0,"complete":false}"#).unwrap();
        cursor.go_to(1);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn default_draft_dates() {
        let setup = TripSetup::new(today());
        assert_eq!(setup.sail_date, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
        assert_eq!(setup.return_date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
    }

    #[test]
    fn persona_resets_warnings_and_toggle_flips() {
        let mut setup = TripSetup::new(today());
        setup.toggle_warning(90);
        assert!(setup.warning_intervals.contains(&90));
        setup.toggle_warning(90);
        assert!(!setup.warning_intervals.contains(&90));

        setup.select_persona(BufferPersona::ThrillSeeker);
        assert_eq!(setup.warning_intervals, BTreeSet::from([30, 15, 5]));
    }

    #[test]
    fn cruise_line_toggles() {
        let mut setup = TripSetup::new(today());
        setup.select_cruise_line("Carnival");
        assert_eq!(setup.cruise_line.as_deref(), Some("Carnival"));
        setup.select_cruise_line("MSC");
        assert_eq!(setup.cruise_line.as_deref(), Some("MSC"));
        setup.select_cruise_line("MSC");
        assert_eq!(setup.cruise_line, None);
    }

    #[test]
    fn ports_add_update_remove() {
        let mut setup = TripSetup::new(today());
        let id = setup.add_port("Nassau", None);
        setup.add_port("CocoCay", None);
        let all_aboard = Utc.with_ymd_and_hms(2026, 3, 9, 17, 0, 0).unwrap();
        assert!(setup.update_port_time(id, Some(all_aboard), None));
        assert!(setup.ports[0].has_required_times());
        assert!(!setup.update_port_time(Uuid::new_v4(), None, None));

        assert!(setup.remove_port(5).is_none());
        assert_eq!(setup.remove_port(0).unwrap().name, "Nassau");
        assert_eq!(setup.ports.len(), 1);
    }

    #[test]
    fn build_trip_name_fallbacks() {
        let mut setup = TripSetup::new(today());
        assert_eq!(setup.build_trip().name, "My Cruise");
        setup.select_cruise_line("Disney");
        assert_eq!(setup.build_trip().name, "Disney");
        setup.trip_name = "Spring Break".into();
        assert_eq!(setup.build_trip().name, "Spring Break");
    }

    #[test]
    fn build_trip_ship_time() {
        let mut setup = TripSetup::new(today());
        assert!(setup.build_trip().ship_time_config.is_local());
        setup.offset_hours = 1;
        assert_eq!(setup.build_trip().ship_time_config, ShipTimeConfig::Offset { hours: 1 });
    }

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(moves in proptest::collection::vec(0u8..3, 0..40)) {
            let mut cursor = StepCursor::new(SETUP_STEPS);
            for m in moves {
                match m {
                    0 => cursor.next(),
                    1 => cursor.back(),
                    _ => cursor.go_to(usize::from(m) * 3),
                }
                prop_assert!(cursor.current() < SETUP_STEPS);
            }
        }
    }
}
