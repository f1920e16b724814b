//! Repository layer — entity-scoped database operations as free functions
//! over a borrowed connection.

mod intake;
mod patient;
mod report;
mod session;
mod user;

pub use intake::*;
pub use patient::*;
pub use report::*;
pub use session::*;
pub use user::*;

use chrono::NaiveDateTime;

/// Stored timestamp format. Written truncated to seconds so round-trips
/// are exact.
pub(crate) fn fmt_dt(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub(crate) fn parse_dt(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .unwrap_or_default()
}
