use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::timer::PortMode;

/// Named buffer presets chosen during trip setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BufferPersona {
    SafetyNet,
    #[default]
    Balanced,
    ThrillSeeker,
}

impl BufferPersona {
    pub const ALL: [BufferPersona; 3] = [
        BufferPersona::SafetyNet,
        BufferPersona::Balanced,
        BufferPersona::ThrillSeeker,
    ];

    pub fn dock_buffer(self) -> u32 {
        match self {
            BufferPersona::SafetyNet => 90,
            BufferPersona::Balanced => 60,
            BufferPersona::ThrillSeeker => 30,
        }
    }

    pub fn tender_buffer(self) -> u32 {
        match self {
            BufferPersona::SafetyNet => 120,
            BufferPersona::Balanced => 90,
            BufferPersona::ThrillSeeker => 60,
        }
    }

    pub fn buffer_for(self, mode: PortMode) -> u32 {
        match mode {
            PortMode::Dock => self.dock_buffer(),
            PortMode::Tender => self.tender_buffer(),
        }
    }

    pub fn default_warnings(self) -> BTreeSet<u32> {
        let minutes: &[u32] = match self {
            BufferPersona::SafetyNet => &[90, 60, 30, 15, 5],
            BufferPersona::Balanced => &[60, 30, 15, 5],
            BufferPersona::ThrillSeeker => &[30, 15, 5],
        };
        minutes.iter().copied().collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            BufferPersona::SafetyNet => "Safety Net",
            BufferPersona::Balanced => "Balanced",
            BufferPersona::ThrillSeeker => "Thrill Seeker",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            BufferPersona::SafetyNet => "Extra margin, zero stress",
            BufferPersona::Balanced => "Sweet spot for most cruisers",
            BufferPersona::ThrillSeeker => "Every minute counts ashore",
        }
    }
}

impl std::str::FromStr for BufferPersona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "safety_net" | "safetynet" => Ok(BufferPersona::SafetyNet),
            "balanced" => Ok(BufferPersona::Balanced),
            "thrill_seeker" | "thrillseeker" => Ok(BufferPersona::ThrillSeeker),
            other => Err(format!("unknown buffer persona: {other}")),
        }
    }
}
