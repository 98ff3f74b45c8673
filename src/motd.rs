//! Message-of-the-day handling.
//!
//! Servers report their MOTD either as a plain string or as a chat component
//! tree (`{"text": ..., "extra": [...]}`), sometimes wrapped in an array.
//! [`Motd`] captures those shapes and [`Motd::normalize`] flattens any of them
//! into plain text.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `§` followed by a single color or style code.
static COLOR_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new("§[0-9a-fk-orA-FK-OR]").expect("color code pattern is valid"));

/// A MOTD value as found in a status payload.
///
/// Variant order matters for deserialization: arrays must be tried before
/// nodes, since serde accepts a sequence for a struct.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Motd {
    Plain(String),
    Sequence(Vec<Motd>),
    Node(MotdNode),
    /// Numbers, booleans and anything else; rendered as text.
    Other(Value),
}

/// A chat component with its own text and optional children.
///
/// `extra` is normally an array, but any MOTD shape is accepted there and
/// flattened as a single child.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MotdNode {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub extra: Option<Box<Motd>>,
}

impl MotdNode {
    /// A node without children. An `extra` that is present but empty counts
    /// as no children, so only `text` contributes.
    pub fn is_simple(&self) -> bool {
        match self.extra.as_deref() {
            None => true,
            Some(Motd::Sequence(children)) => children.is_empty(),
            Some(Motd::Plain(text)) => text.is_empty(),
            Some(Motd::Other(value)) => value.is_null(),
            Some(Motd::Node(_)) => false,
        }
    }

    fn flatten_into(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(&value_text(text));
        }
        if self.is_simple() {
            return;
        }
        if let Some(extra) = &self.extra {
            extra.flatten_into(out);
        }
    }
}

impl Motd {
    /// Reads a MOTD out of an already decoded JSON value. Every value maps to
    /// some variant, falling back to [`Motd::Other`].
    pub fn from_value(value: &Value) -> Self {
        Motd::deserialize(value).unwrap_or_else(|_| Motd::Other(value.clone()))
    }

    /// Flattens the MOTD depth-first, left to right, into a single string.
    ///
    /// Nothing is deduplicated or skipped: each node contributes its own text
    /// followed by the text of its children in order.
    pub fn normalize(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut String) {
        match self {
            Motd::Plain(text) => out.push_str(text),
            Motd::Sequence(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            Motd::Node(node) => node.flatten_into(out),
            Motd::Other(value) => out.push_str(&value_text(value)),
        }
    }
}

impl Default for Motd {
    fn default() -> Self {
        Motd::Plain(String::new())
    }
}

impl From<&str> for Motd {
    fn from(text: &str) -> Self {
        Motd::Plain(text.to_string())
    }
}

/// Plain-text rendering of a JSON scalar: strings without quotes, `null` as
/// nothing, everything else as JSON.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Removes every `§x` formatting code, leaving all other characters intact.
///
/// A `§` not followed by a valid code character is kept as is.
pub fn strip_color_codes(text: &str) -> Cow<'_, str> {
    COLOR_CODE.replace_all(text, "")
}

/// Flattens then strips, the full path from payload value to display text.
pub fn display_text(motd: &Motd) -> String {
    strip_color_codes(&motd.normalize()).into_owned()
}
