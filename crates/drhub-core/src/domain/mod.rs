//! Canonical domain types for the DR pipeline.

mod country;
mod record;
mod session;
mod symbol;
mod timestamp;

pub use country::{Country, Sector};
pub use record::DrRecord;
pub use session::{
    SessionState, SessionWindow, TradingSession, DAY_SESSION, NIGHT_SESSION,
};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
