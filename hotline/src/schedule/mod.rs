//! Weekly volunteer rotation: loading the roster file and resolving who is on call.

pub mod loader;
pub mod resolver;
pub mod tz;

pub use loader::{load_schedule, ScheduleConfig, ScheduleError};
pub use resolver::{Shift, ShiftResolver};
