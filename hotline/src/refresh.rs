//! Periodic rewrite of the forwarding number from the volunteer schedule.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::forward_store::{ForwardSource, ForwardStore, StoreError};
use crate::schedule::ShiftResolver;
use crate::AppState;

/// Store the number of whoever is on call at `now`, or `default_number` when
/// nobody is scheduled. Returns the number written.
///
/// Overwrites any administrator override unconditionally.
pub async fn refresh_forward_number(
    resolver: &ShiftResolver,
    store: &dyn ForwardStore,
    default_number: &str,
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    let (number, source, volunteer) = match resolver.current(now) {
        Some(volunteer) => (
            volunteer.phone.clone(),
            ForwardSource::Schedule,
            Some(volunteer.name.as_str()),
        ),
        None => (default_number.to_string(), ForwardSource::Default, None),
    };

    store.put(&number, source).await?;
    info!(
        effective_date = %resolver.effective_date(now),
        volunteer = volunteer.unwrap_or("-"),
        forward_number = %number,
        source = source.as_str(),
        "forwarding number refreshed"
    );
    Ok(number)
}

/// Background task: refresh the forwarding number every `period`, starting immediately.
pub async fn run_forward_refresh(state: Arc<AppState>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        if let Err(e) = refresh_forward_number(
            &state.resolver,
            state.store.as_ref(),
            &state.call.default_forward_number,
            state.clock.now(),
        )
        .await
        {
            error!("forward number refresh failed: {e}");
        }
    }
}
