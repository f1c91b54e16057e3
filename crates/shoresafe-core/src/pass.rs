//! Crew passes: what a purchase unlocks.
//!
//! A solo pass covers one device. A crew pass lets the host share a code
//! with up to three guests. Both run for seven days from purchase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PassError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassType {
    #[serde(rename = "solo_pass_7d")]
    SoloPass7d,
    #[serde(rename = "crew_pass_7d")]
    CrewPass7d,
}

impl PassType {
    pub fn as_str(self) -> &'static str {
        match self {
            PassType::SoloPass7d => "solo_pass_7d",
            PassType::CrewPass7d => "crew_pass_7d",
        }
    }

    pub fn guest_limit(self) -> u32 {
        match self {
            PassType::SoloPass7d => 0,
            PassType::CrewPass7d => 3,
        }
    }

    pub fn days(self) -> i64 {
        7
    }

    pub fn tier(self) -> PurchaseTier {
        match self {
            PassType::SoloPass7d => PurchaseTier::Solo,
            PassType::CrewPass7d => PurchaseTier::Crew,
        }
    }
}

impl std::str::FromStr for PassType {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo_pass_7d" => Ok(PassType::SoloPass7d),
            "crew_pass_7d" => Ok(PassType::CrewPass7d),
            other => Err(PassError::InvalidType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseTier {
    #[default]
    None,
    Solo,
    Crew,
}

/// A newly issued pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    pub pass_id: Uuid,
    pub share_code: String,
    pub pass_type: PassType,
    pub expires_at: DateTime<Utc>,
    pub guest_limit: u32,
}

/// Result of joining (or rejoining) a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    pub pass_id: Uuid,
    pub share_code: String,
    pub pass_type: PassType,
    pub expires_at: DateTime<Utc>,
    pub guests_joined: u32,
    pub guest_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entitlement {
    pub is_active: bool,
    pub pass_type: PassType,
    pub expires_at: DateTime<Utc>,
    pub guests_joined: u32,
    pub guest_limit: u32,
}

impl Entitlement {
    /// Tier unlocked right now; an expired pass unlocks nothing.
    pub fn tier(&self) -> PurchaseTier {
        if self.is_active {
            self.pass_type.tier()
        } else {
            PurchaseTier::None
        }
    }
}
