//! End-to-end port day: set up a trip, persist it, start a timer for the
//! day's port and run the countdown down to "head back now".

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use shoresafe_core::timer::{compute_alert_schedule, lead_minutes_for, notification_requests};
use shoresafe_core::{
    BufferPersona, CountdownPhase, Countdown, Database, Event, PassLedger, PassType, PortMode,
    PurchaseTier, TimerSession, TimerStore, TripSetup, TripStore,
};

fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, m, 0).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

#[test]
fn tender_port_day_end_to_end() {
    let db = Database::open_memory().unwrap();

    // Setup wizard.
    let mut setup = TripSetup::new(day(1));
    setup.select_cruise_line("Royal Caribbean");
    setup.select_persona(BufferPersona::SafetyNet);
    setup.toggle_warning(5);
    let cozumel = setup.add_port("Cozumel", Some(day(9)));
    let cayman = setup.add_port("Grand Cayman", Some(day(10)));
    setup.update_port_time(cozumel, Some(at(9, 17, 30)), None);
    while !setup.cursor.is_complete() {
        setup.cursor.next();
    }
    let trip = setup.build_trip();
    assert_eq!(trip.name, "Royal Caribbean");

    let mut store = TripStore::open(&db);
    store.save(trip).unwrap();

    // The tender port's times arrive later.
    let mut port = store.current_trip().unwrap().port(cayman).unwrap().clone();
    port.mode = PortMode::Tender;
    port.all_aboard_time = Some(at(10, 16, 0));
    port.last_tender_time = Some(at(10, 15, 30));
    assert!(store.update_port(port).unwrap());

    // Port day, fresh process.
    let store = TripStore::open(&db);
    assert!(store.ports_needing_times().is_empty());
    let trip = store.current_trip().unwrap();
    let today = trip.today_port(day(10)).unwrap();
    let draft = trip.timer_draft(today).unwrap();
    assert_eq!(draft.buffer_minutes, 120);

    let timers = TimerStore::new(&db);
    let mut session = timers.load();
    let started_at = at(10, 9, 0);
    session.create_timer(draft, started_at);
    timers.save(&session).unwrap();

    let session: TimerSession = timers.load();
    let timer = session.active().unwrap();
    assert_eq!(timer.hard_deadline(), at(10, 15, 30));
    assert_eq!(timer.be_back_by(), at(10, 13, 30));

    // Safety net warnings minus the toggled-off 5 minutes.
    let leads = lead_minutes_for(&trip.warning_intervals);
    assert_eq!(leads, vec![90, 60, 30, 15, 0]);
    let schedule = compute_alert_schedule(timer.be_back_by(), &leads, at(10, 12, 45));
    let minutes: Vec<u32> = schedule.iter().map(|a| a.minutes_before).collect();
    assert_eq!(minutes, vec![30, 15, 0]);
    assert_eq!(notification_requests(&timer.port_name, &schedule).len(), 3);

    // Countdown from 12:45 to past the deadline, one minute at a time.
    let mut countdown = Countdown::start(timer.be_back_by(), at(10, 12, 45)).with_alerts(schedule);
    let mut now = at(10, 12, 45);
    let mut due = Vec::new();
    let mut phases = vec![countdown.phase()];
    while now < at(10, 13, 40) {
        now += Duration::minutes(1);
        for event in countdown.tick(now) {
            match event {
                Event::AlertDue { minutes_before, .. } => due.push(minutes_before),
                Event::CountdownPhaseChanged { to, .. } => phases.push(to),
                _ => {}
            }
        }
    }
    assert_eq!(due, vec![30, 15, 0]);
    assert_eq!(
        phases,
        vec![
            CountdownPhase::Normal,
            CountdownPhase::Urgent,
            CountdownPhase::Critical,
            CountdownPhase::Expired
        ]
    );
    assert_eq!(countdown.remaining_secs(), 0);
}

#[test]
fn crew_pass_unlocks_tier_for_guests() {
    let db = Database::open_memory().unwrap();
    let ledger = PassLedger::new(&db);
    let now = at(1, 12, 0);

    let pass = ledger
        .create_pass(PassType::CrewPass7d, "host-phone", None, now)
        .unwrap();
    ledger.join_pass(&pass.share_code, "guest-phone", now).unwrap();

    let entitlement = ledger
        .entitlement("guest-phone", Some(&pass.share_code), None, now + Duration::days(3))
        .unwrap();
    assert_eq!(entitlement.tier(), PurchaseTier::Crew);

    let expired = ledger
        .entitlement("guest-phone", Some(&pass.share_code), None, now + Duration::days(8))
        .unwrap();
    assert_eq!(expired.tier(), PurchaseTier::None);
}
