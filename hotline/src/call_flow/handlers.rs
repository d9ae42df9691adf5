use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::Form;
use roster_types::digits_only;
use tracing::{debug, info, warn};

use crate::error::HotlineError;
use crate::forward_store::ForwardSource;
use crate::twiml::VoiceResponse;
use crate::AppState;

use super::phone::{normalize_override, spell_out};
use super::{responses, CallForm};

/// A malformed or untyped body is treated as an anonymous caller with no
/// digits, so the call still reaches the public flow.
fn call_form(form: Result<Form<CallForm>, FormRejection>) -> CallForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable call form, treating caller as public");
            CallForm::default()
        }
    }
}

/// POST / — entry point for every inbound call.
pub async fn initial(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CallForm>, FormRejection>,
) -> VoiceResponse {
    let form = call_form(form);
    let forward_number = state.forward_number().await;

    if !state.authorizer.is_admin(&form.from) {
        return responses::public_hotline(&state.call, &forward_number);
    }

    debug!(from = %form.from, "presenting administrator menu");
    responses::admin_menu(&state.call, &forward_number)
}

/// POST /menu — digit chosen from the administrator menu.
pub async fn menu(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CallForm>, FormRejection>,
) -> VoiceResponse {
    let form = call_form(form);
    if !state.authorizer.is_admin(&form.from) {
        let forward_number = state.forward_number().await;
        return responses::public_hotline(&state.call, &forward_number);
    }

    match form.digits.as_str() {
        "2" => {
            let shift = state.resolver.current_and_next(state.clock.now());
            debug!(
                current = ?shift.current.as_ref().map(|v| &v.name),
                next = ?shift.next.as_ref().map(|v| &v.name),
                "announcing shift"
            );
            responses::shift_announcement(&state.call, &shift)
        }
        "9" => {
            let forward_number = state.forward_number().await;
            responses::number_entry_prompt(&state.call, &forward_number)
        }
        _ => {
            let forward_number = state.forward_number().await;
            responses::public_hotline(&state.call, &forward_number)
        }
    }
}

/// POST /admin-set-number — digits entered after choosing 9.
pub async fn admin_set_number(
    State(state): State<Arc<AppState>>,
    form: Result<Form<CallForm>, FormRejection>,
) -> Result<VoiceResponse, HotlineError> {
    let form = call_form(form);
    let previous_number = state.forward_number().await;

    if !state.authorizer.is_admin(&form.from) {
        return Ok(responses::public_hotline(&state.call, &previous_number));
    }

    let Some(new_number) = normalize_override(&form.digits) else {
        info!(from = %form.from, "rejected forwarding override: not a North American number");
        return Ok(responses::override_rejected(&state.call, &previous_number));
    };

    // Stays in effect until the next periodic refresh overwrites it.
    state.store.put(&new_number, ForwardSource::Admin).await?;
    info!(
        from = %form.from,
        previous = %previous_number,
        forward_number = %new_number,
        "forwarding number overridden by administrator"
    );

    let spoken_target = match state.resolver.schedule().find_volunteer_by_phone(&new_number) {
        Some(volunteer) => volunteer.name.clone(),
        None => spell_out(&digits_only(&form.digits)),
    };

    Ok(responses::override_accepted(
        &state.call,
        &new_number,
        &spoken_target,
    ))
}
