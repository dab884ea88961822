//! Outbound requests produced by the dispatcher.
//!
//! Each variant maps onto one Bot API method; the payload structs serialize
//! directly into that method's JSON body.

use serde::Serialize;
use smallvec::SmallVec;
use teloxide::types::{InlineKeyboardMarkup, ParseMode};

use super::update::ChatIdentity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendMessage {
    pub chat_id: ChatIdentity,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditMessage {
    pub chat_id: ChatIdentity,
    pub message_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

/// `photo` is either a public URL or a file id already known to the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendPhoto {
    pub chat_id: ChatIdentity,
    pub photo: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerCallback {
    pub callback_query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteMessage {
    pub chat_id: ChatIdentity,
    pub message_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutboundAction {
    SendMessage(SendMessage),
    EditMessage(EditMessage),
    SendPhoto(SendPhoto),
    AnswerCallback(AnswerCallback),
    DeleteMessage(DeleteMessage),
}

/// Ordered list of actions for one update. Most updates produce one or two.
pub type ActionPlan = SmallVec<[OutboundAction; 4]>;

impl OutboundAction {
    pub fn method(&self) -> &'static str {
        match self {
            OutboundAction::SendMessage(_) => "sendMessage",
            OutboundAction::EditMessage(_) => "editMessageText",
            OutboundAction::SendPhoto(_) => "sendPhoto",
            OutboundAction::AnswerCallback(_) => "answerCallbackQuery",
            OutboundAction::DeleteMessage(_) => "deleteMessage",
        }
    }

    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            OutboundAction::SendMessage(v) => serde_json::to_value(v),
            OutboundAction::EditMessage(v) => serde_json::to_value(v),
            OutboundAction::SendPhoto(v) => serde_json::to_value(v),
            OutboundAction::AnswerCallback(v) => serde_json::to_value(v),
            OutboundAction::DeleteMessage(v) => serde_json::to_value(v),
        }
    }

    /// Plain text message without formatting or keyboard.
    pub fn text(chat_id: ChatIdentity, text: impl Into<String>) -> Self {
        OutboundAction::SendMessage(SendMessage {
            chat_id,
            text: text.into(),
            parse_mode: None,
            reply_markup: None,
        })
    }

    /// HTML formatted message with an optional keyboard.
    pub fn html(
        chat_id: ChatIdentity,
        text: impl Into<String>,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Self {
        OutboundAction::SendMessage(SendMessage {
            chat_id,
            text: text.into(),
            parse_mode: Some(ParseMode::Html),
            reply_markup,
        })
    }

    pub fn answer(callback_query_id: &str, text: Option<String>) -> Self {
        OutboundAction::AnswerCallback(AnswerCallback {
            callback_query_id: callback_query_id.to_string(),
            text,
        })
    }
}
