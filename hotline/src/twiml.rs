//! Voice-response (TwiML) documents.

use std::io::Cursor;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::error;

#[derive(Debug, thiserror::Error)]
#[error("Failed to render voice response: {0}")]
pub struct RenderError(String);

/// Collect digits and POST them to `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gather {
    pub action: String,
    pub num_digits: Option<u32>,
    pub input: Option<String>,
    pub finish_on_key: Option<String>,
    pub timeout: Option<u32>,
    /// Verbs played while waiting for input
    pub prompts: Vec<Verb>,
}

impl Gather {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            num_digits: None,
            input: None,
            finish_on_key: None,
            timeout: None,
            prompts: Vec::new(),
        }
    }

    pub fn num_digits(mut self, n: u32) -> Self {
        self.num_digits = Some(n);
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn finish_on_key(mut self, key: impl Into<String>) -> Self {
        self.finish_on_key = Some(key.into());
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn say(mut self, voice: &str, text: impl Into<String>) -> Self {
        self.prompts.push(Verb::Say {
            voice: voice.to_string(),
            text: text.into(),
        });
        self
    }
}

/// Transfer the call to `number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dial {
    pub number: String,
    pub caller_id: Option<String>,
    pub timeout: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say { voice: String, text: String },
    Play { url: String },
    Pause { length: u32 },
    Gather(Gather),
    Dial(Dial),
    Redirect { url: String },
}

/// Ordered list of verbs under a `<Response>` root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn say(mut self, voice: &str, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            voice: voice.to_string(),
            text: text.into(),
        });
        self
    }

    pub fn play(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Play { url: url.into() });
        self
    }

    pub fn pause(mut self, length: u32) -> Self {
        self.verbs.push(Verb::Pause { length });
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn dial(mut self, dial: Dial) -> Self {
        self.verbs.push(Verb::Dial(dial));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect { url: url.into() });
        self
    }

    /// Append all verbs of `other`.
    pub fn extend(mut self, other: VoiceResponse) -> Self {
        self.verbs.extend(other.verbs);
        self
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| RenderError(e.to_string()))?;
        writer
            .write_event(Event::Start(BytesStart::new("Response")))
            .map_err(|e| RenderError(e.to_string()))?;
        for verb in &self.verbs {
            write_verb(&mut writer, verb)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("Response")))
            .map_err(|e| RenderError(e.to_string()))?;

        let xml = writer.into_inner().into_inner();
        String::from_utf8(xml).map_err(|e| RenderError(e.to_string()))
    }
}

fn write_verb(writer: &mut Writer<Cursor<Vec<u8>>>, verb: &Verb) -> Result<(), RenderError> {
    match verb {
        Verb::Say { voice, text } => {
            let mut start = BytesStart::new("Say");
            start.push_attribute(("voice", voice.as_str()));
            write_text_element(writer, start, text)
        }
        Verb::Play { url } => write_text_element(writer, BytesStart::new("Play"), url),
        Verb::Pause { length } => {
            let mut start = BytesStart::new("Pause");
            start.push_attribute(("length", length.to_string().as_str()));
            write(writer, Event::Empty(start))
        }
        Verb::Gather(gather) => {
            let mut start = BytesStart::new("Gather");
            if let Some(input) = &gather.input {
                start.push_attribute(("input", input.as_str()));
            }
            if let Some(n) = gather.num_digits {
                start.push_attribute(("numDigits", n.to_string().as_str()));
            }
            if let Some(key) = &gather.finish_on_key {
                start.push_attribute(("finishOnKey", key.as_str()));
            }
            start.push_attribute(("action", gather.action.as_str()));
            start.push_attribute(("method", "POST"));
            if let Some(timeout) = gather.timeout {
                start.push_attribute(("timeout", timeout.to_string().as_str()));
            }
            write(writer, Event::Start(start))?;
            for prompt in &gather.prompts {
                write_verb(writer, prompt)?;
            }
            write(writer, Event::End(BytesEnd::new("Gather")))
        }
        Verb::Dial(dial) => {
            let mut start = BytesStart::new("Dial");
            if let Some(caller_id) = &dial.caller_id {
                start.push_attribute(("callerId", caller_id.as_str()));
            }
            start.push_attribute(("answerOnBridge", "true"));
            start.push_attribute(("timeout", dial.timeout.to_string().as_str()));
            write_text_element(writer, start, &dial.number)
        }
        Verb::Redirect { url } => {
            let mut start = BytesStart::new("Redirect");
            start.push_attribute(("method", "POST"));
            write_text_element(writer, start, url)
        }
    }
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), RenderError> {
    let end = start.to_end().into_owned();
    write(writer, Event::Start(start))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(end))
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError(e.to_string()))
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(xml) => ([(header::CONTENT_TYPE, "text/xml")], xml).into_response(),
            Err(e) => {
                error!("voice response: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
            }
        }
    }
}
