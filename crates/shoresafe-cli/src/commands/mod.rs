pub mod config;
pub mod pass;
pub mod timer;
pub mod trip;

use serde::Serialize;
use shoresafe_core::timer::lead_minutes_for;
use shoresafe_core::{Config, Trip};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Alert lead times: the trip's chosen warnings when a trip exists,
/// otherwise the configured ladder.
pub fn lead_minutes(trip: Option<&Trip>, config: &Config) -> Vec<u32> {
    match trip {
        Some(trip) => lead_minutes_for(&trip.warning_intervals),
        None => config.alerts.lead_minutes(),
    }
}
