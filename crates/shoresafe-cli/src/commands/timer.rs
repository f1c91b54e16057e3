use chrono::Duration;
use clap::{Args, Subcommand};
use shoresafe_core::storage::Database;
use shoresafe_core::timer::{
    notification_requests, parse_clock_time, Countdown, PortMode, TimerDraft, TimerSession,
};
use shoresafe_core::{Config, TimerStore, TripStore, ValidationError};

use super::{lead_minutes, print_json, CmdResult};
use crate::clock::Clock;

#[derive(Args)]
pub struct StartArgs {
    /// Port name
    #[arg(long, default_value = "")]
    port: String,
    /// All-aboard time, HH:MM (local) or RFC 3339
    #[arg(long)]
    all_aboard: Option<String>,
    /// dock or tender
    #[arg(long)]
    mode: Option<PortMode>,
    /// Buffer minutes (defaults to the mode's default)
    #[arg(long)]
    buffer: Option<u32>,
    /// Last tender back, HH:MM or RFC 3339 (tender mode only)
    #[arg(long)]
    last_tender: Option<String>,
    /// Use today's port from the saved trip
    #[arg(long, conflicts_with_all = ["all_aboard", "last_tender"])]
    from_trip: bool,
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a port-day timer (ends any running one)
    Start(StartArgs),
    /// Print current timer state as JSON
    Status,
    /// End the running timer
    End,
    /// Print upcoming alerts and the notifications they map to
    Alerts,
    /// Print recently ended timers
    History,
    /// Tick the countdown once per second, printing events as they happen
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn build_draft(
    args: StartArgs,
    trips: &TripStore<'_>,
    config: &Config,
    clock: &Clock,
) -> Result<TimerDraft, Box<dyn std::error::Error>> {
    let today = clock.today();

    if args.from_trip {
        let trip = trips.current_trip().ok_or("no trip saved")?;
        let port = trip.today_port(today).ok_or("no port scheduled for today")?;
        let mode = args.mode.unwrap_or(port.mode);
        let draft = trip
            .timer_draft_as(port, mode)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "all_aboard_time".into(),
                message: format!("{} has no all-aboard time yet", port.name),
            })?;
        return with_buffer_arg(draft, args.buffer);
    }

    let mode = args.mode.unwrap_or(config.timer.default_mode);
    let all_aboard = args
        .all_aboard
        .unwrap_or_else(|| config.timer.default_all_aboard.clone());
    let all_aboard = parse_clock_time(&all_aboard, today)?;
    let last_tender = args
        .last_tender
        .map(|t| parse_clock_time(&t, today))
        .transpose()?;

    let draft = TimerDraft::new(args.port, all_aboard, mode).with_last_tender(last_tender);
    with_buffer_arg(draft, args.buffer)
}

/// Apply `--buffer`, which must be one of the choices for the draft's mode.
fn with_buffer_arg(
    draft: TimerDraft,
    buffer: Option<u32>,
) -> Result<TimerDraft, Box<dyn std::error::Error>> {
    let Some(buffer) = buffer else {
        return Ok(draft);
    };
    let options = draft.mode.buffer_options();
    if !options.contains(&buffer) {
        return Err(ValidationError::InvalidValue {
            field: "buffer".into(),
            message: format!("{} ports allow {options:?} minutes", draft.mode.label()),
        }
        .into());
    }
    Ok(draft.with_buffer(buffer))
}

fn watch(
    session: &TimerSession,
    lead: &[u32],
    config: &Config,
    clock: &Clock,
    ticks: Option<u64>,
) -> CmdResult {
    let timer = session.active().ok_or("no active timer")?;
    let mut clock = *clock;
    let now = clock.now();
    let alerts = session.alert_schedule(lead, now);
    let mut countdown = Countdown::start(timer.be_back_by(), now)
        .with_thresholds(config.alerts.thresholds())
        .with_alerts(alerts);

    let mut count = 0;
    while countdown.remaining_secs() > 0 && ticks.map_or(true, |max| count < max) {
        if clock.is_pinned() {
            clock.advance(Duration::seconds(1));
        } else {
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
        for event in countdown.tick(clock.now()) {
            println!("{}", serde_json::to_string(&event)?);
        }
        count += 1;
    }
    countdown.cancel();
    tracing::debug!(ticks = count, remaining = countdown.remaining_secs(), "watch finished");
    Ok(())
}

pub fn run(action: TimerAction, clock: &Clock) -> CmdResult {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let trips = TripStore::open(&db);
    let timers = TimerStore::new(&db);
    let mut session = timers.load();
    let lead = lead_minutes(trips.current_trip(), &config);
    let now = clock.now();

    match action {
        TimerAction::Start(args) => {
            let draft = build_draft(args, &trips, &config, clock)?;
            let events = session.create_timer(draft, now);
            timers.save(&session)?;
            print_json(&events)?;
        }
        TimerAction::Status => {
            let snapshot = session.snapshot(&lead, config.alerts.thresholds(), now);
            print_json(&snapshot)?;
        }
        TimerAction::End => {
            let event = session.end_timer(now).ok_or("no active timer")?;
            timers.save(&session)?;
            print_json(&event)?;
        }
        TimerAction::Alerts => {
            let schedule = session.alert_schedule(&lead, now);
            let notifications = session
                .active()
                .map(|t| notification_requests(&t.port_name, &schedule))
                .unwrap_or_default();
            print_json(&serde_json::json!({
                "alerts": schedule
                    .iter()
                    .map(|a| serde_json::json!({
                        "minutes_before": a.minutes_before,
                        "fire_at": a.fire_at,
                        "label": a.label(),
                    }))
                    .collect::<Vec<_>>(),
                "notifications": notifications,
            }))?;
        }
        TimerAction::History => {
            print_json(session.recent())?;
        }
        TimerAction::Watch { ticks } => {
            watch(&session, &lead, &config, clock, ticks)?;
        }
    }

    Ok(())
}
