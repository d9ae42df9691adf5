//! Inbound call state machine.
//!
//! Three webhook endpoints drive it:
//! - `/` (Initial): public callers are forwarded straight away, admins get the menu
//! - `/menu` (Menu): dispatches on the digit collected by the admin menu
//! - `/admin-set-number` (SetNumber): validates and stores an override number
//!
//! Every request re-checks the caller's `From` number; no session state is kept.

pub mod handlers;
pub mod phone;
pub mod responses;

use serde::Deserialize;

pub const ENTRY_PATH: &str = "/";
pub const MENU_PATH: &str = "/menu";
pub const SET_NUMBER_PATH: &str = "/admin-set-number";

/// Form fields posted by the voice platform on each call event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallForm {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Digits", default)]
    pub digits: String,
}
