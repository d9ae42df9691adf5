//! UTC to local wall-clock conversion.
//!
//! All offset and DST handling for the resolver lives here so it can be tested
//! in isolation, especially on transition days.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use roster_types::Weekday;

/// Calendar fields of an instant as seen on a wall clock in a given zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFields {
    pub date: NaiveDate,
    pub hour: u32,
    pub weekday: Weekday,
}

pub fn local_fields(instant: DateTime<Utc>, tz: Tz) -> LocalFields {
    let local = instant.with_timezone(&tz);
    LocalFields {
        date: local.date_naive(),
        hour: local.hour(),
        weekday: local.weekday().into(),
    }
}

/// The instant at which the wall clock in `tz` reads `hour:00` on `date`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist (DST spring-forward gap) move to the next hour that does.
pub fn local_instant(date: NaiveDate, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    (hour..24)
        .filter_map(|h| date.and_hms_opt(h, 0, 0))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}
