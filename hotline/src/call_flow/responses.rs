//! Voice documents for each step of the call flow.

use crate::schedule::Shift;
use crate::state::CallSettings;
use crate::twiml::{Dial, Gather, VoiceResponse};

use super::{ENTRY_PATH, MENU_PATH, SET_NUMBER_PATH};

/// Seconds the forwarded phone rings before the transfer gives up.
pub const DIAL_TIMEOUT_SECS: u32 = 25;
/// Seconds the admin menu waits for a key press.
pub const MENU_TIMEOUT_SECS: u32 = 15;
/// Seconds the number-entry prompt waits for digits.
pub const NUMBER_ENTRY_TIMEOUT_SECS: u32 = 15;

fn dial(call: &CallSettings, number: &str) -> Dial {
    Dial {
        number: number.to_string(),
        caller_id: call.caller_id.clone(),
        timeout: DIAL_TIMEOUT_SECS,
    }
}

/// Greeting, a short pause, then transfer to `forward_number`.
pub fn public_hotline(call: &CallSettings, forward_number: &str) -> VoiceResponse {
    let response = match &call.greeting_audio_url {
        Some(url) => VoiceResponse::new().play(url.as_str()),
        None => VoiceResponse::new(),
    };
    response.pause(1).dial(dial(call, forward_number))
}

pub fn admin_menu(call: &CallSettings, forward_number: &str) -> VoiceResponse {
    let prompt = format!(
        "You have reached the {} administrator options. \
         Press 1 to forward this call to the currently scheduled volunteer. \
         Press 2 to hear who is on call now and who is on call next. \
         Press 9 to temporarily change the number that hotline calls are forwarded to.",
        call.hotline_name
    );

    VoiceResponse::new()
        .gather(
            Gather::new(MENU_PATH)
                .num_digits(1)
                .timeout(MENU_TIMEOUT_SECS)
                .say(&call.voice, prompt),
        )
        .say(
            &call.voice,
            "We did not receive any input. Forwarding your call using the current hotline number.",
        )
        .extend(public_hotline(call, forward_number))
}

pub fn number_entry_prompt(call: &CallSettings, forward_number: &str) -> VoiceResponse {
    VoiceResponse::new()
        .gather(
            Gather::new(SET_NUMBER_PATH)
                .input("dtmf")
                .finish_on_key("#")
                .timeout(NUMBER_ENTRY_TIMEOUT_SECS)
                .say(
                    &call.voice,
                    "Please enter the ten digit phone number, including area code, \
                     that you would like hotline calls forwarded to. \
                     When finished, press the pound key.",
                ),
        )
        .say(
            &call.voice,
            "We did not receive any input. Returning to the normal hotline flow.",
        )
        .extend(public_hotline(call, forward_number))
}

/// Speak the current and next volunteer, then return to the admin menu.
pub fn shift_announcement(call: &CallSettings, shift: &Shift) -> VoiceResponse {
    let current = match &shift.current {
        Some(volunteer) => format!("The volunteer currently on call is {}.", volunteer.name),
        None => "No volunteer is scheduled right now. Calls go to the default hotline number."
            .to_string(),
    };
    let next = match &shift.next {
        Some(volunteer) => format!("The next volunteer on call is {}.", volunteer.name),
        None => "No volunteer is scheduled for the next shift.".to_string(),
    };

    VoiceResponse::new()
        .say(&call.voice, format!("{current} {next}"))
        .pause(1)
        .redirect(ENTRY_PATH)
}

pub fn override_rejected(call: &CallSettings, previous_number: &str) -> VoiceResponse {
    VoiceResponse::new()
        .say(
            &call.voice,
            "The number you entered was not recognized as a valid ten digit North American phone number. \
             Keeping the existing forwarding number.",
        )
        .extend(public_hotline(call, previous_number))
}

/// Confirm the override, naming the volunteer when known, and transfer to it.
pub fn override_accepted(call: &CallSettings, new_number: &str, spoken_target: &str) -> VoiceResponse {
    VoiceResponse::new()
        .say(
            &call.voice,
            format!(
                "Thank you. The hotline will now be forwarded to {spoken_target}. \
                 Forwarding this call now."
            ),
        )
        .pause(1)
        .dial(dial(call, new_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twiml::Verb;
    use chrono::{NaiveDate, TimeZone, Utc};
    use roster_types::Volunteer;

    fn settings(greeting: Option<&str>) -> CallSettings {
        CallSettings {
            default_forward_number: "+12025559999".to_string(),
            caller_id: Some("+12025558888".to_string()),
            greeting_audio_url: greeting.map(ToString::to_string),
            voice: "Polly.Joanna".to_string(),
            hotline_name: "Example area hotline".to_string(),
        }
    }

    fn is_dial_to(verb: &Verb, number: &str) -> bool {
        matches!(verb, Verb::Dial(d) if d.number == number)
    }

    #[test]
    fn test_public_hotline_plays_greeting_when_configured() {
        let response = public_hotline(&settings(Some("https://example.com/g.wav")), "+12025550001");
        let verbs = response.verbs();
        assert_eq!(verbs.len(), 3);
        assert!(matches!(&verbs[0], Verb::Play { url } if url == "https://example.com/g.wav"));
        assert!(matches!(verbs[1], Verb::Pause { length: 1 }));
        assert!(is_dial_to(&verbs[2], "+12025550001"));
    }

    #[test]
    fn test_public_hotline_without_greeting() {
        let response = public_hotline(&settings(None), "+12025550001");
        assert_eq!(response.verbs().len(), 2);
        assert!(is_dial_to(&response.verbs()[1], "+12025550001"));
    }

    #[test]
    fn test_admin_menu_gathers_one_digit_then_falls_through() {
        let response = admin_menu(&settings(None), "+12025550001");
        let verbs = response.verbs();

        match &verbs[0] {
            Verb::Gather(g) => {
                assert_eq!(g.action, MENU_PATH);
                assert_eq!(g.num_digits, Some(1));
            }
            other => panic!("expected gather, got {other:?}"),
        }
        assert!(is_dial_to(verbs.last().unwrap(), "+12025550001"));

        let xml = response.render().unwrap();
        assert!(xml.contains("Example area hotline administrator options"));
        assert!(xml.contains("Press 2"));
        assert!(xml.contains("Press 9"));
    }

    #[test]
    fn test_shift_announcement_redirects_to_menu() {
        let shift = Shift {
            effective_date: NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(),
            current: Some(Volunteer {
                name: "Carol".to_string(),
                phone: "+12025550003".to_string(),
            }),
            next: None,
            next_change: Utc.with_ymd_and_hms(2026, 5, 16, 22, 0, 0).unwrap(),
        };

        let response = shift_announcement(&settings(None), &shift);
        let xml = response.render().unwrap();
        assert!(xml.contains("The volunteer currently on call is Carol."));
        assert!(xml.contains("No volunteer is scheduled for the next shift."));
        assert!(matches!(
            response.verbs().last(),
            Some(Verb::Redirect { url }) if url == ENTRY_PATH
        ));
        assert!(!response.verbs().iter().any(|v| matches!(v, Verb::Dial(_))));
    }

    #[test]
    fn test_override_accepted_dials_new_number() {
        let response = override_accepted(&settings(None), "+12025551234", "Carol");
        let xml = response.render().unwrap();
        assert!(xml.contains("forwarded to Carol"));
        assert!(is_dial_to(response.verbs().last().unwrap(), "+12025551234"));
    }
}
