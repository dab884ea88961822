//! Per-update decision procedure.
//!
//! Every check below is evaluated independently against the same parsed
//! update, so one message may fire several paths at once (a tracked link in a
//! group is both previewed and deleted). Only the command checks are mutually
//! exclusive among themselves.

use once_cell::sync::Lazy;
use regex::Regex;

use super::callback_data::CallbackKind;
use super::commands::Command;
use super::update::{InboundUpdate, Person};

static TRACKED_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(https?://(?:vm|vt|m|www)\.tiktok\.com/[^\s]+|https?://(?:www\.)?tiktok\.com/@[^/\s]+/video/\d+|https?://(?:www\.)?tiktok\.com/t/[^\s]+)",
    )
    .unwrap_or_else(|_| panic!("Broken tracked link regexp!"))
});

static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://[^\s]+").unwrap_or_else(|_| panic!("Broken url regexp!"))
});

/// Which handling paths apply to one update.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    pub welcome: &'a [Person],
    pub command: Option<Command>,
    pub tracked_link: Option<&'a str>,
    pub callback: Option<CallbackKind>,
    pub group_guard: bool,
    pub echo: bool,
}

impl Classification<'_> {
    pub fn is_empty(&self) -> bool {
        self.welcome.is_empty()
            && self.command.is_none()
            && self.tracked_link.is_none()
            && self.callback.is_none()
            && !self.group_guard
            && !self.echo
    }
}

pub fn find_tracked_link(text: &str) -> Option<&str> {
    TRACKED_LINK_RE.find(text).map(|m| m.as_str())
}

pub fn contains_url(text: &str) -> bool {
    BARE_URL_RE.is_match(text)
}

pub fn classify(update: &InboundUpdate) -> Classification<'_> {
    let mut result = Classification {
        welcome: &[],
        command: None,
        tracked_link: None,
        callback: None,
        group_guard: false,
        echo: false,
    };

    if let Some(cb) = update.callback() {
        result.callback = Some(CallbackKind::from_data(cb.data.as_deref()));
        return result;
    }

    let message = match update.message() {
        Some(v) => v,
        None => return result,
    };

    result.welcome = &message.new_chat_members;

    let text = message.trimmed_text();
    if text.is_empty() {
        return result;
    }

    result.command = text.parse::<Command>().ok();
    result.tracked_link = find_tracked_link(text);
    result.group_guard = !message.chat.is_private() && contains_url(text);
    result.echo = result.command.is_none()
        && !text.starts_with('/')
        && result.tracked_link.is_none()
        && !result.group_guard;

    result
}
