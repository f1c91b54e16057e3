mod alerts;
mod clock;
mod countdown;
mod deadline;
mod model;
mod session;

pub use alerts::{
    alert_label, compute_alert_schedule, lead_minutes_for, notification_requests, AlertNotification,
    AlertTiming, STANDARD_LEAD_MINUTES,
};
pub use clock::{parse_clock_time, parse_clock_time_in, parse_date};
pub use countdown::{format_countdown, Countdown, CountdownPhase, UrgencyThresholds};
pub use deadline::{be_back_by, compute_deadline, hard_deadline, Deadline};
pub use model::{PortMode, PortTimer, TimerDraft};
pub use session::TimerSession;
