use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use shoresafe_core::storage::Database;
use shoresafe_core::timer::{parse_clock_time, parse_date, PortMode};
use shoresafe_core::{BufferPersona, Config, Port, Trip, TripSetup, TripStore, ValidationError};
use uuid::Uuid;

use super::{print_json, CmdResult};
use crate::clock::Clock;

#[derive(Subcommand)]
pub enum TripAction {
    /// Print the saved trip
    Show,
    /// Create a trip, replacing any saved one
    Create {
        /// Trip name (falls back to the cruise line)
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        cruise_line: Option<String>,
        /// YYYY-MM-DD (defaults to a week from today)
        #[arg(long, value_parser = parse_date)]
        sail_date: Option<NaiveDate>,
        /// YYYY-MM-DD (defaults to two weeks from today)
        #[arg(long, value_parser = parse_date)]
        return_date: Option<NaiveDate>,
        /// Ship clock offset from local time, in hours
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset_hours: i32,
        /// safety-net, balanced or thrill-seeker
        #[arg(long)]
        persona: Option<BufferPersona>,
        /// Warning lead times in minutes, comma separated (e.g. 60,30,15)
        #[arg(long, value_delimiter = ',')]
        warnings: Option<Vec<u32>>,
    },
    /// Add a port to the saved trip
    AddPort {
        name: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// dock or tender
        #[arg(long)]
        mode: Option<PortMode>,
    },
    /// Set a port's times, mode or buffer
    SetTimes {
        /// Port id or name
        port: String,
        /// HH:MM on the port's date, or RFC 3339
        #[arg(long)]
        all_aboard: Option<String>,
        /// HH:MM on the port's date, or RFC 3339
        #[arg(long)]
        last_tender: Option<String>,
        /// Custom buffer minutes for this port
        #[arg(long)]
        buffer: Option<u32>,
        #[arg(long)]
        mode: Option<PortMode>,
    },
    /// Delete the saved trip
    Clear,
    /// Port scheduled for today
    Today,
    /// Next port today or later
    Next,
    /// Ports still missing an all-aboard time
    Pending,
    /// List buffer personas and what they set
    Personas,
}

fn find_port<'t>(trip: &'t Trip, key: &str) -> Result<&'t Port, ValidationError> {
    let by_id = Uuid::parse_str(key).ok().and_then(|id| trip.port(id));
    by_id
        .or_else(|| trip.ports.iter().find(|p| p.name.eq_ignore_ascii_case(key)))
        .ok_or_else(|| ValidationError::NotFound {
            kind: "port".into(),
            id: key.to_string(),
        })
}

fn parse_port_time(
    input: Option<String>,
    port: &Port,
    today: NaiveDate,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let day = port.date.unwrap_or(today);
    input.map(|t| parse_clock_time(&t, day)).transpose()
}

fn port_view(store: &TripStore<'_>, port: &Port, now: DateTime<Utc>) -> serde_json::Value {
    let buffer = store.current_trip().map(|trip| trip.buffer_for(port));
    serde_json::json!({
        "port": port,
        "display_date": port.display_date(),
        "mode_label": port.mode.label(),
        "buffer_minutes": buffer,
        "ship_all_aboard": port.all_aboard_time.map(|t| store.ship_time_adjusted(t)),
        "countdown_secs": store.countdown_to_all_aboard(port, now),
    })
}

pub fn run(action: TripAction, clock: &Clock) -> CmdResult {
    let db = Database::open()?;
    let mut store = TripStore::open(&db);
    let now = clock.now();
    let today = clock.today();

    match action {
        TripAction::Show => match store.current_trip() {
            Some(trip) => print_json(trip)?,
            None => println!("null"),
        },
        TripAction::Create {
            name,
            cruise_line,
            sail_date,
            return_date,
            offset_hours,
            persona,
            warnings,
        } => {
            let config = Config::load_or_default();
            let mut setup = TripSetup::new(today);
            setup.trip_name = name;
            if let Some(line) = cruise_line {
                setup.select_cruise_line(&line);
            }
            if let Some(date) = sail_date {
                setup.sail_date = date;
            }
            if let Some(date) = return_date {
                setup.return_date = date;
            }
            setup.offset_hours = offset_hours;
            setup.select_persona(persona.unwrap_or(config.trip.default_persona));
            if let Some(warnings) = warnings {
                setup.warning_intervals = warnings.into_iter().collect();
            }
            let trip = setup.build_trip();
            store.save(trip.clone())?;
            print_json(&trip)?;
        }
        TripAction::AddPort { name, date, mode } => {
            let mut trip = store.current_trip().cloned().ok_or("no trip saved")?;
            let mut port = Port::placeholder(name, date);
            if let Some(mode) = mode {
                port.mode = mode;
            }
            trip.ports.push(port.clone());
            store.save(trip)?;
            print_json(&port)?;
        }
        TripAction::SetTimes {
            port,
            all_aboard,
            last_tender,
            buffer,
            mode,
        } => {
            let trip = store.current_trip().ok_or("no trip saved")?;
            let mut updated = find_port(trip, &port)?.clone();
            if let Some(time) = parse_port_time(all_aboard, &updated, today)? {
                updated.all_aboard_time = Some(time);
            }
            if let Some(time) = parse_port_time(last_tender, &updated, today)? {
                updated.last_tender_time = Some(time);
            }
            if let Some(mode) = mode {
                updated.mode = mode;
            }
            if buffer.is_some() {
                updated.custom_buffer_minutes = buffer;
            }
            store.update_port(updated.clone())?;
            print_json(&updated)?;
        }
        TripAction::Clear => {
            store.clear_trip()?;
            println!("trip cleared");
        }
        TripAction::Today => match store.today_port(today) {
            Some(port) => print_json(&port_view(&store, port, now))?,
            None => println!("null"),
        },
        TripAction::Next => match store.next_port(today) {
            Some(port) => print_json(&port_view(&store, port, now))?,
            None => println!("null"),
        },
        TripAction::Pending => {
            print_json(&store.ports_needing_times())?;
        }
        TripAction::Personas => {
            let personas: Vec<_> = BufferPersona::ALL
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "persona": p,
                        "label": p.label(),
                        "tagline": p.tagline(),
                        "dock_buffer": p.dock_buffer(),
                        "tender_buffer": p.tender_buffer(),
                        "warnings": p.default_warnings(),
                    })
                })
                .collect();
            print_json(&personas)?;
        }
    }

    Ok(())
}
