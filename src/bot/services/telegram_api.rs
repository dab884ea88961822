//! Chat platform API, driven through a teloxide [`Bot`].

use std::fmt;
use std::future::Future;

use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, FileId, InputFile, MessageId, Recipient};
use teloxide::RequestError;
use tracing::warn;

use crate::bot::actions::OutboundAction;
use crate::bot::update::{ActorIdentity, ChatIdentity};

#[derive(Debug)]
pub enum GatewayError {
    Request {
        method: &'static str,
        source: RequestError,
    },
    OutOfRange {
        field: &'static str,
        value: String,
    },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Request { method, source } => write!(f, "{method} failed: {source}"),
            GatewayError::OutOfRange { field, value } => {
                write!(f, "{field} {value} does not fit the bot api")
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Request { source, .. } => Some(source),
            GatewayError::OutOfRange { .. } => None,
        }
    }
}

/// Outbound side of the bot. Only the dispatcher talks to it.
pub trait Gateway: Send + Sync {
    fn execute(
        &self,
        action: &OutboundAction,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// File id of the user's largest current profile photo, if any.
    fn profile_photo(&self, user: &ActorIdentity) -> impl Future<Output = Option<String>> + Send;
}

fn recipient(chat: &ChatIdentity) -> Result<Recipient, GatewayError> {
    match chat {
        ChatIdentity::Id(number) => number
            .as_i64()
            .map(|v| Recipient::Id(ChatId(v)))
            .ok_or_else(|| GatewayError::OutOfRange {
                field: "chat_id",
                value: number.to_string(),
            }),
        ChatIdentity::Username(name) => Ok(Recipient::ChannelUsername(name.clone())),
    }
}

fn message_id(value: i64) -> Result<MessageId, GatewayError> {
    i32::try_from(value)
        .map(MessageId)
        .map_err(|_| GatewayError::OutOfRange {
            field: "message_id",
            value: value.to_string(),
        })
}

/// Public http(s) links are fetched by the platform, anything else is a file id.
fn photo_url(photo: &str) -> Option<reqwest::Url> {
    reqwest::Url::parse(photo)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

fn photo_input(photo: &str) -> InputFile {
    match photo_url(photo) {
        Some(url) => InputFile::url(url),
        None => InputFile::file_id(FileId(photo.to_string())),
    }
}

pub struct TelegramApi {
    bot: Bot,
}

impl TelegramApi {
    pub fn new(api_root: &reqwest::Url, token: &str) -> Self {
        Self {
            bot: Bot::new(token).set_api_url(api_root.clone()),
        }
    }

    async fn run(&self, action: &OutboundAction) -> Result<Result<(), RequestError>, GatewayError> {
        let result = match action {
            OutboundAction::SendMessage(m) => {
                let mut request = self.bot.send_message(recipient(&m.chat_id)?, m.text.clone());
                if let Some(mode) = m.parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = &m.reply_markup {
                    request = request.reply_markup(markup.clone());
                }
                request.send().await.map(|_| ())
            }
            OutboundAction::EditMessage(m) => {
                let mut request = self.bot.edit_message_text(
                    recipient(&m.chat_id)?,
                    message_id(m.message_id)?,
                    m.text.clone(),
                );
                if let Some(mode) = m.parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = &m.reply_markup {
                    request = request.reply_markup(markup.clone());
                }
                request.send().await.map(|_| ())
            }
            OutboundAction::SendPhoto(m) => {
                let mut request = self
                    .bot
                    .send_photo(recipient(&m.chat_id)?, photo_input(&m.photo))
                    .caption(m.caption.clone());
                if let Some(mode) = m.parse_mode {
                    request = request.parse_mode(mode);
                }
                if let Some(markup) = &m.reply_markup {
                    request = request.reply_markup(markup.clone());
                }
                request.send().await.map(|_| ())
            }
            OutboundAction::AnswerCallback(m) => {
                let mut request = self
                    .bot
                    .answer_callback_query(CallbackQueryId(m.callback_query_id.clone()));
                if let Some(text) = &m.text {
                    request = request.text(text.clone());
                }
                request.send().await.map(|_| ())
            }
            OutboundAction::DeleteMessage(m) => self
                .bot
                .delete_message(recipient(&m.chat_id)?, message_id(m.message_id)?)
                .send()
                .await
                .map(|_| ()),
        };

        Ok(result)
    }
}

impl Gateway for TelegramApi {
    async fn execute(&self, action: &OutboundAction) -> Result<(), GatewayError> {
        let method = action.method();

        self.run(action)
            .await?
            .map_err(|source| GatewayError::Request { method, source })
    }

    async fn profile_photo(&self, user: &ActorIdentity) -> Option<String> {
        let user_id = UserId(user.as_str().parse().ok()?);

        match self.bot.get_user_profile_photos(user_id).limit(1).send().await {
            Ok(photos) => photos
                .photos
                .into_iter()
                .next()
                .and_then(|sizes| sizes.into_iter().last())
                .map(|size| size.file.id.0),
            Err(err) => {
                warn!("getUserProfilePhotos failed: {err}");
                None
            }
        }
    }
}
