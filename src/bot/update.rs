//! Inbound update model.
//!
//! A webhook body is decoded into exactly one [`InboundUpdate`] variant.
//! Only the fields the dispatcher looks at are modelled, and they are
//! decoded leniently so partial payloads still reach the classifier.

use std::fmt;

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;

/// Opaque identity of whoever produced the update, compared for equality only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawIdentity")]
pub struct ActorIdentity(SmartString);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentity {
    Number(serde_json::Number),
    Text(String),
}

impl From<RawIdentity> for ActorIdentity {
    fn from(value: RawIdentity) -> Self {
        match value {
            RawIdentity::Number(v) => ActorIdentity::new(v.to_string()),
            RawIdentity::Text(v) => ActorIdentity::new(v),
        }
    }
}

impl ActorIdentity {
    pub fn new<T: AsRef<str>>(value: T) -> Self {
        Self(value.as_ref().trim().into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Chat identity, kept in the JSON shape it arrived in so it can be echoed
/// back unchanged. Numbers of any width are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatIdentity {
    Id(serde_json::Number),
    Username(String),
}

impl From<i64> for ChatIdentity {
    fn from(value: i64) -> Self {
        ChatIdentity::Id(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub id: ActorIdentity,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Chat {
    pub id: ChatIdentity,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Chat {
    /// Chats without a type are treated as private.
    pub fn is_private(&self) -> bool {
        matches!(self.kind.as_deref(), None | Some("private"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub from: Option<Person>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub new_chat_members: Vec<Person>,
}

impl IncomingMessage {
    pub fn actor(&self) -> Option<&ActorIdentity> {
        self.from.as_ref().map(|p| &p.id)
    }

    /// Message text with surrounding whitespace removed, empty when absent.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallbackPress {
    pub id: String,
    pub from: Person,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundUpdate {
    PlainMessage(IncomingMessage),
    CommandMessage(IncomingMessage),
    MembershipChange(IncomingMessage),
    CallbackPress(CallbackPress),
}

#[derive(Deserialize)]
struct RawUpdate {
    #[serde(default)]
    message: Option<IncomingMessage>,
    #[serde(default)]
    callback_query: Option<CallbackPress>,
}

#[derive(Debug)]
pub enum UpdateParseError {
    Json(serde_json::Error),
    Ambiguous,
}

impl fmt::Display for UpdateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateParseError::Json(err) => write!(f, "malformed update body: {err}"),
            UpdateParseError::Ambiguous => {
                write!(f, "update carries both message and callback_query")
            }
        }
    }
}

impl std::error::Error for UpdateParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpdateParseError::Json(err) => Some(err),
            UpdateParseError::Ambiguous => None,
        }
    }
}

impl InboundUpdate {
    /// Decodes one webhook body.
    ///
    /// `Ok(None)` means the body is well formed but carries nothing this bot
    /// handles (edited messages, channel posts, ...).
    pub fn from_slice(body: &[u8]) -> Result<Option<InboundUpdate>, UpdateParseError> {
        let raw: RawUpdate = serde_json::from_slice(body).map_err(UpdateParseError::Json)?;

        match (raw.message, raw.callback_query) {
            (Some(_), Some(_)) => Err(UpdateParseError::Ambiguous),
            (Some(message), None) => Ok(Some(InboundUpdate::from_message(message))),
            (None, Some(callback)) => Ok(Some(InboundUpdate::CallbackPress(callback))),
            (None, None) => Ok(None),
        }
    }

    fn from_message(message: IncomingMessage) -> InboundUpdate {
        if !message.new_chat_members.is_empty() {
            InboundUpdate::MembershipChange(message)
        } else if message.trimmed_text().starts_with('/') {
            InboundUpdate::CommandMessage(message)
        } else {
            InboundUpdate::PlainMessage(message)
        }
    }

    pub fn message(&self) -> Option<&IncomingMessage> {
        match self {
            InboundUpdate::PlainMessage(m)
            | InboundUpdate::CommandMessage(m)
            | InboundUpdate::MembershipChange(m) => Some(m),
            InboundUpdate::CallbackPress(_) => None,
        }
    }

    pub fn callback(&self) -> Option<&CallbackPress> {
        match self {
            InboundUpdate::CallbackPress(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn actor(&self) -> Option<&ActorIdentity> {
        match self {
            InboundUpdate::CallbackPress(cb) => Some(&cb.from.id),
            _ => self.message().and_then(IncomingMessage::actor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<InboundUpdate> {
        InboundUpdate::from_slice(body.as_bytes()).unwrap()
    }

    #[test]
    fn minimal_command_message() {
        let update =
            parse(r#"{"message":{"text":"/start","from":{"id":42},"chat":{"id":1,"type":"private"}}}"#)
                .unwrap();

        match &update {
            InboundUpdate::CommandMessage(m) => {
                assert_eq!(m.chat.id, ChatIdentity::from(1));
                assert!(m.chat.is_private());
                assert!(m.message_id.is_none());
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert_eq!(update.actor(), Some(&ActorIdentity::new("42")));
    }

    #[test]
    fn string_and_numeric_identities_normalize_alike() {
        let a = parse(r#"{"message":{"text":"hi","from":{"id":"  99 "},"chat":{"id":"@group"}}}"#)
            .unwrap();
        let b = parse(r#"{"message":{"text":"hi","from":{"id":99},"chat":{"id":5}}}"#).unwrap();

        assert_eq!(a.actor(), b.actor());
        assert_eq!(
            a.message().unwrap().chat.id,
            ChatIdentity::Username("@group".to_string())
        );
    }

    #[test]
    fn identities_wider_than_i64_are_kept() {
        let update = parse(
            r#"{"message":{"text":"hi","from":{"id":18446744073709551615},"chat":{"id":18446744073709551615}}}"#,
        )
        .unwrap();

        assert_eq!(
            update.actor(),
            Some(&ActorIdentity::new("18446744073709551615"))
        );
        assert_eq!(
            update.message().unwrap().chat.id,
            ChatIdentity::Id(u64::MAX.into())
        );
        assert_eq!(
            serde_json::to_string(&update.message().unwrap().chat.id).unwrap(),
            "18446744073709551615"
        );
    }

    #[test]
    fn new_members_select_membership_change() {
        let update = parse(
            r#"{"message":{"chat":{"id":-100,"type":"supergroup"},"new_chat_members":[{"id":1,"first_name":"Ana"},{"id":2}]}}"#,
        )
        .unwrap();

        assert!(matches!(update, InboundUpdate::MembershipChange(ref m) if m.new_chat_members.len() == 2));
    }

    #[test]
    fn callback_press() {
        let update = parse(
            r#"{"callback_query":{"id":"cb1","from":{"id":7},"data":"site_off","message":{"message_id":3,"chat":{"id":7,"type":"private"}}}}"#,
        )
        .unwrap();

        let cb = update.callback().unwrap();
        assert_eq!(cb.data.as_deref(), Some("site_off"));
        assert_eq!(cb.message.as_ref().unwrap().message_id, Some(3));
        assert_eq!(update.actor(), Some(&ActorIdentity::new("7")));
    }

    #[test]
    fn nothing_to_handle() {
        assert!(parse(r#"{"update_id":1,"edited_message":{}}"#).is_none());
    }

    #[test]
    fn both_payloads_rejected() {
        let result = InboundUpdate::from_slice(
            br#"{"message":{"chat":{"id":1}},"callback_query":{"id":"x","from":{"id":1}}}"#,
        );

        assert!(matches!(result, Err(UpdateParseError::Ambiguous)));
    }

    #[test]
    fn malformed_body_rejected() {
        assert!(matches!(
            InboundUpdate::from_slice(b"not json"),
            Err(UpdateParseError::Json(_))
        ));
        assert!(matches!(
            InboundUpdate::from_slice(br#"{"message":{"text":"no chat"}}"#),
            Err(UpdateParseError::Json(_))
        ));
    }
}
