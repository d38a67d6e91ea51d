//! Bangkok-clock refresh schedule.
//!
//! SET trades on a fixed UTC+7 clock, no DST. Day session gets full
//! refreshes; the night session only moves prices, so it gets the cheaper
//! price-only cycle. The decision is a pure function of the local wall
//! clock so it can be tested without a runtime.

use std::sync::Arc;
use std::time::Duration;

use time::macros::offset;
use time::{OffsetDateTime, UtcOffset, Weekday};
use tracing::{debug, error, info};

use crate::domain::{DAY_SESSION, NIGHT_SESSION};
use crate::refresh::{RefreshEngine, RefreshKind};

pub const BANGKOK_OFFSET: UtcOffset = offset!(+7);

/// How often the scheduler wakes up to consult the plan.
pub const CADENCE: Duration = Duration::from_secs(5 * 60);

/// What, if anything, to run at the given Bangkok wall-clock instant.
///
/// Day window Mon-Fri within the day session. Night window is the evening
/// leg Mon-Fri and the past-midnight leg Tue-Sat.
pub fn planned_refresh(local: OffsetDateTime) -> Option<RefreshKind> {
    let weekday = local.weekday();
    let t = local.time();

    let mon_fri = matches!(
        weekday,
        Weekday::Monday | Weekday::Tuesday | Weekday::Wednesday | Weekday::Thursday | Weekday::Friday
    );
    let tue_sat = matches!(
        weekday,
        Weekday::Tuesday | Weekday::Wednesday | Weekday::Thursday | Weekday::Friday | Weekday::Saturday
    );

    if mon_fri && DAY_SESSION.contains(t) {
        return Some(RefreshKind::Full);
    }
    if mon_fri && t >= NIGHT_SESSION.start {
        return Some(RefreshKind::Price);
    }
    if tue_sat && t <= NIGHT_SESSION.end {
        return Some(RefreshKind::Price);
    }

    None
}

/// Interval loop around the refresh engine. Always starts with one full
/// refresh so the store is populated regardless of the wall clock.
pub struct Scheduler {
    engine: Arc<RefreshEngine>,
    cadence: Duration,
}

impl Scheduler {
    pub fn new(engine: Arc<RefreshEngine>) -> Self {
        Self {
            engine,
            cadence: CADENCE,
        }
    }

    pub fn with_cadence(engine: Arc<RefreshEngine>, cadence: Duration) -> Self {
        Self { engine, cadence }
    }

    pub async fn run(&self) {
        info!("startup refresh");
        if let Err(error) = self.engine.full_refresh().await {
            error!(%error, "startup refresh failed, store stays empty until a cycle succeeds");
        }

        let mut ticker = tokio::time::interval(self.cadence);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; the startup refresh covered it.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let local = OffsetDateTime::now_utc().to_offset(BANGKOK_OFFSET);

            match planned_refresh(local) {
                Some(kind) => {
                    if let Err(error) = self.engine.refresh(kind).await {
                        error!(%error, ?kind, "scheduled refresh failed");
                    }
                }
                None => debug!("outside trading windows, skipping tick"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    // 2026-08-26 is a Wednesday, 2026-08-29 a Saturday, 2026-08-31 a Monday.

    #[test]
    fn weekday_day_session_runs_full() {
        assert_eq!(
            planned_refresh(datetime!(2026-08-26 12:00 +7)),
            Some(RefreshKind::Full)
        );
        assert_eq!(
            planned_refresh(datetime!(2026-08-26 10:00 +7)),
            Some(RefreshKind::Full)
        );
        assert_eq!(
            planned_refresh(datetime!(2026-08-26 16:30 +7)),
            Some(RefreshKind::Full)
        );
    }

    #[test]
    fn weekday_evening_runs_price_only() {
        assert_eq!(
            planned_refresh(datetime!(2026-08-26 19:00 +7)),
            Some(RefreshKind::Price)
        );
        assert_eq!(
            planned_refresh(datetime!(2026-08-26 23:59 +7)),
            Some(RefreshKind::Price)
        );
    }

    #[test]
    fn friday_night_spills_into_saturday_morning() {
        assert_eq!(
            planned_refresh(datetime!(2026-08-29 02:00 +7)),
            Some(RefreshKind::Price)
        );
        assert_eq!(planned_refresh(datetime!(2026-08-29 04:00 +7)), None);
    }

    #[test]
    fn monday_morning_has_no_preceding_night_session() {
        assert_eq!(planned_refresh(datetime!(2026-08-31 02:00 +7)), None);
    }

    #[test]
    fn gaps_and_weekends_are_idle() {
        assert_eq!(planned_refresh(datetime!(2026-08-26 09:59 +7)), None);
        assert_eq!(planned_refresh(datetime!(2026-08-26 17:00 +7)), None);
        assert_eq!(planned_refresh(datetime!(2026-08-26 18:59 +7)), None);
        // Sunday.
        assert_eq!(planned_refresh(datetime!(2026-08-30 12:00 +7)), None);
    }
}
