//! Hotline - IVR webhook service
//!
//! Forwards inbound hotline calls to the volunteer on call under a weekly
//! rotation, with a phone menu that lets administrators check the rotation
//! and override the forwarding number.

pub mod api;
pub mod auth;
pub mod call_flow;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod forward_store;
pub mod refresh;
pub mod schedule;
pub mod state;
pub mod twiml;

pub use state::AppState;
