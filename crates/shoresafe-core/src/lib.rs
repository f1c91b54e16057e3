//! # ShoreSafe Core Library
//!
//! Port-day logic for cruise passengers: when do I have to be back on the
//! ship, and when should I be warned? All operations are available through
//! the standalone `shoresafe` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: pure deadline and alert math, plus a wall-clock countdown that
//!   requires the caller to periodically invoke `tick(now)`
//! - **Trip**: the cruise itinerary, buffer personas and the setup wizard
//! - **Storage**: SQLite key-value persistence of whole records, the crew
//!   pass ledger, and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`compute_deadline`] / [`compute_alert_schedule`]: the port-day math
//! - [`Countdown`]: live countdown with urgency phases
//! - [`TripStore`]: the single persisted trip
//! - [`PassLedger`]: solo and crew pass issuance and entitlements
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod pass;
pub mod storage;
pub mod timer;
pub mod trip;

pub use error::{ConfigError, CoreError, PassError, StorageError, ValidationError};
pub use events::Event;
pub use pass::{Entitlement, JoinOutcome, PassRecord, PassType, PurchaseTier};
pub use storage::{Config, Database, PassLedger, TimerStore, TripStore};
pub use timer::{
    compute_alert_schedule, compute_deadline, lead_minutes_for, AlertTiming, Countdown,
    CountdownPhase, Deadline, PortMode, PortTimer, TimerDraft, TimerSession,
};
pub use trip::{BufferPersona, Port, ShipTimeConfig, Trip, TripSetup};
