//! Whole-record persistence for the current trip and the timer session.
//!
//! Each record is one JSON blob in the kv table. Writes replace the whole
//! record (last writer wins). A blob that is missing or fails to parse reads
//! back as "nothing saved".

use chrono::{DateTime, NaiveDate, Utc};

use super::database::Database;
use crate::error::Result;
use crate::timer::TimerSession;
use crate::trip::{Port, Trip};

const TRIP_KEY: &str = "ss_current_trip";
const TIMER_KEY: &str = "ss_timer_session";

fn read_json<T: serde::de::DeserializeOwned>(db: &Database, key: &str) -> Option<T> {
    let json = match db.kv_get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored record");
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable stored record");
            None
        }
    }
}

/// Holds the single active trip.
pub struct TripStore<'a> {
    db: &'a Database,
    current_trip: Option<Trip>,
}

impl<'a> TripStore<'a> {
    /// Create a store and load whatever trip is saved.
    pub fn open(db: &'a Database) -> Self {
        let mut store = Self {
            db,
            current_trip: None,
        };
        store.load();
        store
    }

    pub fn current_trip(&self) -> Option<&Trip> {
        self.current_trip.as_ref()
    }

    /// Reload from storage. An unreadable blob leaves the in-memory trip
    /// untouched.
    pub fn load(&mut self) -> Option<&Trip> {
        if let Some(trip) = read_json::<Trip>(self.db, TRIP_KEY) {
            self.current_trip = Some(trip);
        }
        self.current_trip.as_ref()
    }

    pub fn save(&mut self, trip: Trip) -> Result<()> {
        let json = serde_json::to_string(&trip)?;
        self.current_trip = Some(trip);
        self.db.kv_set(TRIP_KEY, &json)?;
        tracing::debug!(bytes = json.len(), "saved trip");
        Ok(())
    }

    /// Replace the port with the same id and rewrite the trip.
    ///
    /// Returns `false` without writing when there is no trip or no such port.
    pub fn update_port(&mut self, port: Port) -> Result<bool> {
        let Some(mut trip) = self.current_trip.clone() else {
            return Ok(false);
        };
        if !trip.replace_port(port) {
            return Ok(false);
        }
        self.save(trip)?;
        Ok(true)
    }

    pub fn clear_trip(&mut self) -> Result<()> {
        self.current_trip = None;
        self.db.kv_delete(TRIP_KEY)?;
        tracing::info!("cleared trip");
        Ok(())
    }

    // ── Port day helpers ─────────────────────────────────────────────

    pub fn today_port(&self, today: NaiveDate) -> Option<&Port> {
        self.current_trip.as_ref()?.today_port(today)
    }

    pub fn next_port(&self, today: NaiveDate) -> Option<&Port> {
        self.current_trip.as_ref()?.next_port(today)
    }

    pub fn ports_needing_times(&self) -> Vec<&Port> {
        self.current_trip
            .as_ref()
            .map(Trip::ports_needing_times)
            .unwrap_or_default()
    }

    pub fn ship_time_adjusted(&self, time: DateTime<Utc>) -> DateTime<Utc> {
        match &self.current_trip {
            Some(trip) => trip.ship_time_adjusted(time),
            None => time,
        }
    }

    pub fn countdown_to_all_aboard(&self, port: &Port, now: DateTime<Utc>) -> Option<i64> {
        match &self.current_trip {
            Some(trip) => trip.countdown_to_all_aboard(port, now),
            None => Trip::empty().countdown_to_all_aboard(port, now),
        }
    }
}

/// Persists the [`TimerSession`].
pub struct TimerStore<'a> {
    db: &'a Database,
}

impl<'a> TimerStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn load(&self) -> TimerSession {
        read_json(self.db, TIMER_KEY).unwrap_or_default()
    }

    pub fn save(&self, session: &TimerSession) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.db.kv_set(TIMER_KEY, &json)?;
        Ok(())
    }
}
