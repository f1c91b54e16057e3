use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How passengers get between ship and shore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    /// Ship docks at the pier.
    #[default]
    Dock,
    /// Smaller boats shuttle to shore.
    Tender,
}

impl PortMode {
    /// Buffer suggested when a timer is created for this mode.
    pub fn default_buffer(self) -> u32 {
        match self {
            PortMode::Dock => 60,
            PortMode::Tender => 90,
        }
    }

    /// Buffer choices offered for this mode, in minutes.
    pub fn buffer_options(self) -> &'static [u32] {
        match self {
            PortMode::Dock => &[30, 45, 60, 90],
            PortMode::Tender => &[60, 90, 120],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PortMode::Dock => "Dock",
            PortMode::Tender => "Tender",
        }
    }
}

impl std::str::FromStr for PortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dock" => Ok(PortMode::Dock),
            "tender" => Ok(PortMode::Tender),
            other => Err(format!("unknown port mode: {other}")),
        }
    }
}

/// A running (or finished) port-day timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortTimer {
    pub id: Uuid,
    pub port_name: String,
    pub all_aboard_time: DateTime<Utc>,
    pub mode: PortMode,
    pub buffer_minutes: u32,
    /// Last tender back to the ship. Only meaningful in tender mode.
    #[serde(default)]
    pub last_tender_back: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl PortTimer {
    pub fn hard_deadline(&self) -> DateTime<Utc> {
        super::compute_deadline(self).hard_deadline
    }

    pub fn be_back_by(&self) -> DateTime<Utc> {
        super::compute_deadline(self).be_back_by
    }
}

/// Form state used to create a [`PortTimer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDraft {
    pub port_name: String,
    pub all_aboard_time: DateTime<Utc>,
    pub mode: PortMode,
    pub buffer_minutes: u32,
    pub last_tender_back: Option<DateTime<Utc>>,
}

impl TimerDraft {
    /// Draft with the mode's default buffer and no last-tender time.
    pub fn new(port_name: impl Into<String>, all_aboard_time: DateTime<Utc>, mode: PortMode) -> Self {
        Self {
            port_name: port_name.into(),
            all_aboard_time,
            mode,
            buffer_minutes: mode.default_buffer(),
            last_tender_back: None,
        }
    }

    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    pub fn with_last_tender(mut self, last_tender_back: Option<DateTime<Utc>>) -> Self {
        self.last_tender_back = last_tender_back;
        self
    }

    /// Build an active timer. Empty names fall back to "Port Day" and a
    /// last-tender time is dropped unless the mode is tender.
    pub fn into_timer(self) -> PortTimer {
        let port_name = if self.port_name.trim().is_empty() {
            "Port Day".to_string()
        } else {
            self.port_name
        };
        let last_tender_back = match self.mode {
            PortMode::Tender => self.last_tender_back,
            PortMode::Dock => None,
        };
        PortTimer {
            id: Uuid::new_v4(),
            port_name,
            all_aboard_time: self.all_aboard_time,
            mode: self.mode,
            buffer_minutes: self.buffer_minutes,
            last_tender_back,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn mode_defaults() {
        assert_eq!(PortMode::Dock.default_buffer(), 60);
        assert_eq!(PortMode::Tender.default_buffer(), 90);
        assert_eq!(PortMode::Tender.buffer_options(), &[60, 90, 120]);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Tender".parse::<PortMode>().unwrap(), PortMode::Tender);
        assert_eq!("dock".parse::<PortMode>().unwrap(), PortMode::Dock);
        assert!("ferry".parse::<PortMode>().is_err());
    }

    #[test]
    fn empty_name_becomes_port_day() {
        let timer = TimerDraft::new("  ", at(17, 30), PortMode::Dock).into_timer();
        assert_eq!(timer.port_name, "Port Day");
        assert!(timer.is_active);
    }

    #[test]
    fn dock_draft_drops_last_tender() {
        let timer = TimerDraft::new("Cozumel", at(17, 30), PortMode::Dock)
            .with_last_tender(Some(at(15, 30)))
            .into_timer();
        assert_eq!(timer.last_tender_back, None);
    }

    #[test]
    fn tender_draft_keeps_last_tender() {
        let timer = TimerDraft::new("Grand Cayman", at(16, 0), PortMode::Tender)
            .with_last_tender(Some(at(15, 30)))
            .into_timer();
        assert_eq!(timer.last_tender_back, Some(at(15, 30)));
        assert_eq!(timer.buffer_minutes, 90);
    }

    #[test]
    fn serializes_mode_lowercase() {
        let json = serde_json::to_string(&PortMode::Tender).unwrap();
        assert_eq!(json, "\"tender\"");
    }
}
