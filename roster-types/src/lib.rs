//! Volunteer roster types
//!
//! These types describe the weekly on-call rotation:
//! - which weekdays are staffed
//! - the ordered volunteers for each weekday, one per week of the month
//!
//! Serializable with serde so the roster can live in a JSON or TOML file.

use serde::{Deserialize, Serialize};

/// Time zone assumed when a roster file does not name one.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

// ============================================================================
// Core Types
// ============================================================================

/// Day of the week, keyed by its lower-case English name ("friday").
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person who answers forwarded hotline calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volunteer {
    pub name: String,

    /// E.164 number, e.g. "+12025551234"
    pub phone: String,
}

/// Ordered volunteers for one weekday.
///
/// `callers[0]` covers days 1-7 of the month, `callers[1]` days 8-14, and so on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekdayRoster {
    pub key: Weekday,
    pub callers: Vec<Volunteer>,
}

/// The full weekly rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    /// IANA zone name the shift boundaries are measured in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// At most one roster per weekday
    #[serde(default)]
    pub days: Vec<WeekdayRoster>,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Schedule {
    /// Roster for a weekday, if that weekday is staffed.
    pub fn roster_for(&self, weekday: Weekday) -> Option<&WeekdayRoster> {
        self.days.iter().find(|day| day.key == weekday)
    }

    /// First volunteer whose number matches `phone`, ignoring formatting.
    pub fn find_volunteer_by_phone(&self, phone: &str) -> Option<&Volunteer> {
        let target = digits_only(phone);
        if target.is_empty() {
            return None;
        }
        self.days
            .iter()
            .flat_map(|day| day.callers.iter())
            .find(|caller| digits_only(&caller.phone) == target)
    }
}

/// Strip everything but ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
