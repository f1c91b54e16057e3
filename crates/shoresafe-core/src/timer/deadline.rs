//! Hard deadline and "be back by" time for a port day.
//!
//! In tender mode the last tender back to the ship can leave before
//! boarding officially closes, so the earlier of the two binds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::model::{PortMode, PortTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    /// Latest moment the passenger can physically be back on board.
    pub hard_deadline: DateTime<Utc>,
    /// Hard deadline minus the safety buffer.
    pub be_back_by: DateTime<Utc>,
}

pub fn compute_deadline(timer: &PortTimer) -> Deadline {
    let hard_deadline = hard_deadline(timer.mode, timer.all_aboard_time, timer.last_tender_back);
    Deadline {
        hard_deadline,
        be_back_by: be_back_by(hard_deadline, timer.buffer_minutes),
    }
}

pub fn hard_deadline(
    mode: PortMode,
    all_aboard_time: DateTime<Utc>,
    last_tender_back: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    match (mode, last_tender_back) {
        (PortMode::Tender, Some(last_tender)) => all_aboard_time.min(last_tender),
        _ => all_aboard_time,
    }
}

pub fn be_back_by(hard_deadline: DateTime<Utc>, buffer_minutes: u32) -> DateTime<Utc> {
    hard_deadline - Duration::minutes(i64::from(buffer_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerDraft;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, h, m, 0).unwrap()
    }

    #[test]
    fn dock_subtracts_buffer() {
        let timer = TimerDraft::new("Cozumel", at(17, 30), PortMode::Dock)
            .with_buffer(60)
            .into_timer();
        let deadline = compute_deadline(&timer);
        assert_eq!(deadline.hard_deadline, at(17, 30));
        assert_eq!(deadline.be_back_by, at(16, 30));
    }

    #[test]
    fn tender_uses_earlier_last_tender() {
        let timer = TimerDraft::new("Grand Cayman", at(16, 0), PortMode::Tender)
            .with_buffer(90)
            .with_last_tender(Some(at(15, 30)))
            .into_timer();
        let deadline = compute_deadline(&timer);
        assert_eq!(deadline.hard_deadline, at(15, 30));
        assert_eq!(deadline.be_back_by, at(14, 0));
    }

    #[test]
    fn tender_ignores_later_last_tender() {
        let deadline = hard_deadline(PortMode::Tender, at(16, 0), Some(at(16, 45)));
        assert_eq!(deadline, at(16, 0));
    }

    #[test]
    fn dock_ignores_last_tender_even_if_present() {
        let deadline = hard_deadline(PortMode::Dock, at(16, 0), Some(at(15, 0)));
        assert_eq!(deadline, at(16, 0));
    }

    #[test]
    fn zero_buffer_is_hard_deadline() {
        assert_eq!(be_back_by(at(12, 0), 0), at(12, 0));
    }

    proptest! {
        #[test]
        fn dock_be_back_by_is_all_aboard_minus_buffer(
            offset_min in 0i64..(24 * 60),
            buffer in 0u32..600,
        ) {
            let all_aboard = at(0, 0) + Duration::minutes(offset_min);
            let deadline = compute_deadline(&TimerDraft::new("p", all_aboard, PortMode::Dock)
                .with_buffer(buffer)
                .into_timer());
            prop_assert_eq!(deadline.be_back_by, all_aboard - Duration::minutes(i64::from(buffer)));
        }

        #[test]
        fn tender_binds_to_the_earlier_time(
            all_aboard_min in 0i64..(24 * 60),
            tender_min in 0i64..(24 * 60),
        ) {
            let all_aboard = at(0, 0) + Duration::minutes(all_aboard_min);
            let tender = at(0, 0) + Duration::minutes(tender_min);
            let deadline = hard_deadline(PortMode::Tender, all_aboard, Some(tender));
            if tender < all_aboard {
                prop_assert_eq!(deadline, tender);
            } else {
                prop_assert_eq!(deadline, all_aboard);
            }
        }
    }
}
