use std::sync::Arc;

use crate::auth::CallerAuthorizer;
use crate::clock::Clock;
use crate::config::Config;
use crate::forward_store::{forward_number_or_default, ForwardStore};
use crate::schedule::ShiftResolver;

/// Settings that shape the spoken call flow.
#[derive(Debug, Clone)]
pub struct CallSettings {
    pub default_forward_number: String,
    pub caller_id: Option<String>,
    pub greeting_audio_url: Option<String>,
    pub voice: String,
    pub hotline_name: String,
}

impl CallSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_forward_number: config.default_forward_number.clone(),
            caller_id: config.caller_id.clone(),
            greeting_audio_url: config.greeting_audio_url.clone(),
            voice: config.voice.clone(),
            hotline_name: config.hotline_name.clone(),
        }
    }
}

pub struct AppState {
    pub store: Arc<dyn ForwardStore>,
    pub resolver: Arc<ShiftResolver>,
    pub authorizer: Arc<dyn CallerAuthorizer>,
    pub clock: Arc<dyn Clock>,
    pub call: CallSettings,
}

impl AppState {
    /// Current forwarding number, or the default when the store has none or is unreadable.
    pub async fn forward_number(&self) -> String {
        forward_number_or_default(self.store.as_ref(), &self.call.default_forward_number).await
    }
}
