//! Status payload decoding and the fixed six-line report.

use std::{borrow::Cow, fmt, fmt::Write as _};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::StatusError,
    motd::{self, Motd},
};

/// Placeholder for missing text fields.
pub const UNKNOWN: &str = "未知";

pub const HEADER: &str = "🖥️ 服务器信息:";

fn unknown() -> Value {
    Value::String(UNKNOWN.to_string())
}

fn zero() -> Value {
    Value::from(0)
}

/// The decoded status document.
///
/// Fields keep whatever JSON type the server sent; only missing keys are
/// replaced by their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    #[serde(default = "unknown")]
    pub version: Value,
    #[serde(default = "unknown")]
    pub protocol: Value,
    #[serde(default = "zero")]
    pub players_online: Value,
    #[serde(default = "zero")]
    pub max_players: Value,
    #[serde(default = "zero")]
    pub ping: Value,
    /// `None` when the key is absent (or `null`), which renders as empty text.
    #[serde(default)]
    pub motd: Option<Motd>,
}

impl Default for StatusPayload {
    fn default() -> Self {
        Self {
            version: unknown(),
            protocol: unknown(),
            players_online: zero(),
            max_players: zero(),
            ping: zero(),
            motd: None,
        }
    }
}

impl StatusPayload {
    /// Decodes a textual payload. See [`decode_json`] for what is tolerated.
    pub fn decode(text: &str) -> Result<Self, StatusError> {
        Self::from_value(decode_json(text)?)
    }

    pub fn from_value(value: Value) -> Result<Self, StatusError> {
        if !value.is_object() {
            return Err(StatusError::NotAnObject(kind_of(&value)));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// MOTD as display text: flattened, then stripped of formatting codes.
    pub fn motd_text(&self) -> String {
        self.motd.as_ref().map(motd::display_text).unwrap_or_default()
    }
}

/// A payload as handed over by whoever fetched it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Text(String),
    Structured(Value),
}

impl RawPayload {
    /// Decodes textual payloads; structured ones are used as they are.
    pub fn into_status(self) -> Result<StatusPayload, StatusError> {
        match self {
            RawPayload::Text(text) => StatusPayload::decode(&text),
            RawPayload::Structured(value) => StatusPayload::from_value(value),
        }
    }
}

impl From<&str> for RawPayload {
    fn from(text: &str) -> Self {
        RawPayload::Text(text.to_string())
    }
}

impl From<String> for RawPayload {
    fn from(text: String) -> Self {
        RawPayload::Text(text)
    }
}

impl From<Value> for RawPayload {
    fn from(value: Value) -> Self {
        RawPayload::Structured(value)
    }
}

/// The rendered status, one field per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub version: String,
    pub protocol: String,
    pub players_online: String,
    pub max_players: String,
    pub ping: String,
    pub motd: String,
}

impl Report {
    pub fn from_payload(payload: &StatusPayload) -> Self {
        Self {
            version: motd::value_text(&payload.version).into_owned(),
            protocol: motd::value_text(&payload.protocol).into_owned(),
            players_online: motd::value_text(&payload.players_online).into_owned(),
            max_players: motd::value_text(&payload.max_players).into_owned(),
            ping: motd::value_text(&payload.ping).into_owned(),
            motd: payload.motd_text(),
        }
    }

    pub fn lines(&self) -> [String; 6] {
        [
            HEADER.to_string(),
            format!("版本: {}", self.version),
            format!("协议: {}", self.protocol),
            format!("玩家: {}/{}", self.players_online, self.max_players),
            format!("延迟: {}ms", self.ping),
            format!("标语: {}", self.motd),
        ]
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

/// Decodes `payload` if needed and renders the report.
///
/// Decoding errors are returned as is; nothing is recovered from a payload
/// that does not parse.
pub fn format_server_info(payload: impl Into<RawPayload>) -> Result<String, StatusError> {
    let status = payload.into().into_status()?;
    Ok(Report::from_payload(&status).to_string())
}

/// Parses the first JSON value in `text`.
///
/// Leading whitespace and a byte order mark are skipped, anything after the
/// first complete value is ignored, and raw control characters inside
/// strings are accepted.
pub fn decode_json(text: &str) -> Result<Value, StatusError> {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.is_empty() {
        return Err(StatusError::Empty);
    }
    let text = escape_control_chars(text);
    let mut values = serde_json::Deserializer::from_str(&text).into_iter::<Value>();
    match values.next() {
        Some(value) => Ok(value?),
        None => Err(StatusError::Empty),
    }
}

/// Rewrites control characters found inside string literals as `\uXXXX`.
fn escape_control_chars(text: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string && c < ' ' {
            let buf = out.get_or_insert_with(|| text[..i].to_string());
            let _ = write!(buf, "\\u{:04x}", c as u32);
            escaped = false;
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        }

        if let Some(buf) = out.as_mut() {
            buf.push(c);
        }
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(text),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_all_fields() {
        let report = format_server_info(
            r#"{"version":"1.20","protocol":765,"playersOnline":3,"maxPlayers":20,"ping":42,"motd":"§aWelcome§r!"}"#,
        )
        .unwrap();

        assert_eq!(
            report,
            "🖥️ 服务器信息:\n版本: 1.20\n协议: 765\n玩家: 3/20\n延迟: 42ms\n标语: Welcome!"
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let report = format_server_info(json!({"protocol": "765"})).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "版本: 未知");
        assert_eq!(lines[2], "协议: 765");
        assert_eq!(lines[3], "玩家: 0/0");
        assert_eq!(lines[4], "延迟: 0ms");
        assert_eq!(lines[5], "标语: ");
    }

    #[test]
    fn wrongly_typed_fields_pass_through() {
        let payload = StatusPayload::from_value(json!({
            "version": 1.5,
            "playersOnline": "many",
            "ping": [1, 2]
        }))
        .unwrap();
        let report = Report::from_payload(&payload);

        assert_eq!(report.version, "1.5");
        assert_eq!(report.players_online, "many");
        assert_eq!(report.ping, "[1,2]");
    }

    #[test]
    fn composite_motd_is_flattened_and_stripped() {
        let payload = StatusPayload::from_value(json!({
            "motd": {"text": "§6A", "extra": [{"text": "§lB"}, "C"]}
        }))
        .unwrap();

        assert_eq!(payload.motd_text(), "ABC");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = StatusPayload::decode("[1, 2]").unwrap_err();
        assert!(matches!(err, StatusError::NotAnObject("array")));
    }

    #[test]
    fn malformed_text_is_a_decode_error() {
        assert!(matches!(
            format_server_info("{\"version\": "),
            Err(StatusError::Decode(_))
        ));
        assert!(matches!(format_server_info("   "), Err(StatusError::Empty)));
    }

    #[test]
    fn tolerates_trailing_garbage_and_raw_control_chars() {
        let payload = StatusPayload::decode("\u{feff} {\"motd\":\"a\tb\nc\"} trailing\n").unwrap();
        assert_eq!(payload.motd_text(), "a\tb\nc");
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let payload = StatusPayload::decode("{\"motd\":\"say \\\"hi\\\"\tnow\"}").unwrap();
        assert_eq!(payload.motd_text(), "say \"hi\"\tnow");
    }

    #[test]
    fn text_without_control_chars_is_borrowed() {
        assert!(matches!(
            escape_control_chars("{\"a\": \"b\"}\n"),
            Cow::Borrowed(_)
        ));
    }
}
