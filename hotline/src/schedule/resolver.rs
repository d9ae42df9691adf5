//! Shift resolution: who is on call right now, and who takes over next.
//!
//! A shift that starts at the shift-change hour on day D runs until the same
//! hour on day D+1, so before that hour the previous calendar day's roster is
//! still in effect. Volunteers within a weekday's roster are picked by week of
//! the month: days 1-7 use `callers[0]`, days 8-14 `callers[1]`, and so on.
//!
//! Two fallback policies apply when a roster is shorter than the month:
//! - the current volunteer clamps to the last caller
//! - the next volunteer, when the next day has no roster of its own, wraps to
//!   the first caller of the current weekday

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use roster_types::{Schedule, Volunteer};

use super::loader::ScheduleConfig;
use super::tz::{local_fields, local_instant};

/// Calendar date whose roster is active at `now`.
pub fn effective_date(now: DateTime<Utc>, tz: Tz, shift_hour: u32) -> NaiveDate {
    let local = local_fields(now, tz);
    if local.hour < shift_hour {
        local.date.pred_opt().unwrap_or(local.date)
    } else {
        local.date
    }
}

/// 0 for days 1-7, 1 for 8-14, 2 for 15-21, 3 for 22-28, 4 for 29-31.
pub fn week_of_month_index(date: NaiveDate) -> usize {
    ((date.day() - 1) / 7) as usize
}

/// Volunteer scheduled for `date`, clamping to the last caller when the
/// roster has fewer entries than the week index.
pub fn volunteer_for_date(schedule: &Schedule, date: NaiveDate) -> Option<&Volunteer> {
    let roster = schedule.roster_for(date.weekday().into())?;
    let index = week_of_month_index(date);
    roster.callers.get(index).or_else(|| roster.callers.last())
}

/// First instant strictly after `now` at which the local clock reads `shift_hour:00`.
pub fn next_shift_change(now: DateTime<Utc>, tz: Tz, shift_hour: u32) -> DateTime<Utc> {
    let today = local_fields(now, tz).date;
    today
        .iter_days()
        .take(3)
        .filter_map(|date| local_instant(date, shift_hour, tz))
        .find(|instant| *instant > now)
        .unwrap_or(now + TimeDelta::days(1))
}

fn next_volunteer<'a>(
    schedule: &'a Schedule,
    current_date: NaiveDate,
    next_date: NaiveDate,
) -> Option<&'a Volunteer> {
    if let Some(volunteer) = volunteer_for_date(schedule, next_date) {
        return Some(volunteer);
    }

    // No roster for the next day: the next slot is the following week's
    // volunteer for the current weekday.
    let roster = schedule.roster_for(current_date.weekday().into())?;
    let index = week_of_month_index(current_date);
    roster
        .callers
        .get(index + 1)
        .or_else(|| roster.callers.first())
}

/// Resolved on-call state at a moment in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub effective_date: NaiveDate,
    pub current: Option<Volunteer>,
    pub next: Option<Volunteer>,
    pub next_change: DateTime<Utc>,
}

/// Pure resolver over a validated schedule. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct ShiftResolver {
    config: ScheduleConfig,
    shift_hour: u32,
}

impl ShiftResolver {
    pub fn new(config: ScheduleConfig, shift_hour: u32) -> Self {
        Self { config, shift_hour }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.config.schedule
    }

    pub fn tz(&self) -> Tz {
        self.config.tz
    }

    pub fn effective_date(&self, now: DateTime<Utc>) -> NaiveDate {
        effective_date(now, self.config.tz, self.shift_hour)
    }

    pub fn volunteer_for_date(&self, date: NaiveDate) -> Option<&Volunteer> {
        volunteer_for_date(&self.config.schedule, date)
    }

    pub fn current(&self, now: DateTime<Utc>) -> Option<&Volunteer> {
        self.volunteer_for_date(self.effective_date(now))
    }

    pub fn current_and_next(&self, now: DateTime<Utc>) -> Shift {
        let effective_date = self.effective_date(now);
        let next_change = next_shift_change(now, self.config.tz, self.shift_hour);
        let next_date = local_fields(next_change, self.config.tz).date;

        Shift {
            effective_date,
            current: self.volunteer_for_date(effective_date).cloned(),
            next: next_volunteer(&self.config.schedule, effective_date, next_date).cloned(),
            next_change,
        }
    }
}
