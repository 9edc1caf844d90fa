//! Chat wire protocol: JSON text frames tagged by `type`.

use serde::{Deserialize, Serialize};

/// Messages the widget sends.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// First frame. Carries the id of a previous session to resume it.
    #[serde(rename = "hello")]
    Hello {
        #[serde(default)]
        session_id: Option<String>,
    },

    #[serde(rename = "ask")]
    Ask { text: String },

    /// Clear history, topic and rate-limit log of the session.
    #[serde(rename = "reset")]
    Reset,

    /// Forget the session and close.
    #[serde(rename = "end")]
    End,
}

/// Messages the server sends. Everything tied to a question carries its
/// `turn_id` so concurrent turns can be told apart.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "session_ready")]
    SessionReady { session_id: String, resumed: bool },

    /// Everything streamed so far for a turn. Each one extends the previous.
    #[serde(rename = "partial")]
    Partial { turn_id: String, text: String },

    #[serde(rename = "answer")]
    Answer {
        turn_id: String,
        status: String,
        text: String,
    },

    #[serde(rename = "rate_limited")]
    RateLimited {
        turn_id: String,
        message: String,
        retry_after_secs: u64,
    },

    #[serde(rename = "images")]
    Images {
        turn_id: String,
        place: String,
        urls: Vec<String>,
    },

    #[serde(rename = "weather")]
    Weather {
        turn_id: String,
        location: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        temperature_c: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        precipitation_probability: Option<f64>,
    },

    #[serde(rename = "reset_done")]
    ResetDone,

    #[serde(rename = "warning")]
    Warning { message: String },

    #[serde(rename = "error")]
    Error { message: String },
}
