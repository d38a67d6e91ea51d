use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::macros::time;
use time::Time;

/// Time-of-day trading window in the local market timezone.
///
/// A window whose `end` is earlier than its `start` crosses midnight and is
/// open when `t >= start || t <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    #[serde(with = "hhmm")]
    pub start: Time,
    #[serde(with = "hhmm")]
    pub end: Time,
}

impl SessionWindow {
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub const fn crosses_midnight(&self) -> bool {
        // Time lacks const comparison; compare components instead.
        let (sh, sm) = (self.start.hour(), self.start.minute());
        let (eh, em) = (self.end.hour(), self.end.minute());
        eh < sh || (eh == sh && em < sm)
    }

    pub fn contains(&self, t: Time) -> bool {
        if self.crosses_midnight() {
            t >= self.start || t <= self.end
        } else {
            t >= self.start && t <= self.end
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

impl Display for SessionWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

mod hhmm {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Time;

    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02}:{:02}", value.hour(), value.minute()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (hh, mm) = raw
            .split_once(':')
            .ok_or_else(|| D::Error::custom("expected HH:MM"))?;
        let hour: u8 = hh.parse().map_err(D::Error::custom)?;
        let minute: u8 = mm.parse().map_err(D::Error::custom)?;
        Time::from_hms(hour, minute, 0).map_err(D::Error::custom)
    }
}

/// SET DR day session, 10:00-16:30 Bangkok time.
pub const DAY_SESSION: SessionWindow = SessionWindow::new(time!(10:00), time!(16:30));

/// Night session for US/EU underlyings, 19:00-03:00 crossing midnight.
pub const NIGHT_SESSION: SessionWindow = SessionWindow::new(time!(19:00), time!(03:00));

/// Which session, if any, is open at a given local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Day,
    Night,
    Closed,
}

/// Per-record trading-session descriptor produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSession {
    /// Thai label shown in listings, e.g. "กลางวัน+กลางคืน".
    pub session: String,
    pub day_session: SessionWindow,
    pub night_session: Option<SessionWindow>,
    pub has_night_trading: bool,
}

impl TradingSession {
    pub fn day_only() -> Self {
        Self {
            session: String::from("กลางวันเท่านั้น"),
            day_session: DAY_SESSION,
            night_session: None,
            has_night_trading: false,
        }
    }

    pub fn with_night() -> Self {
        Self {
            session: String::from("กลางวัน+กลางคืน"),
            day_session: DAY_SESSION,
            night_session: Some(NIGHT_SESSION),
            has_night_trading: true,
        }
    }

    /// Session-open check at a Bangkok-local wall-clock time.
    pub fn state_at(&self, local: Time) -> SessionState {
        if self.day_session.contains(local) {
            return SessionState::Day;
        }
        if let Some(night) = &self.night_session {
            if night.contains(local) {
                return SessionState::Night;
            }
        }
        SessionState::Closed
    }

    pub fn is_open_at(&self, local: Time) -> bool {
        self.state_at(local) != SessionState::Closed
    }
}
