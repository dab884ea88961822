use teloxide::types::ParseMode;

use crate::bot::actions::{ActionPlan, EditMessage, OutboundAction};
use crate::bot::auth::OwnerGuard;
use crate::bot::callback_data::CallbackData;
use crate::bot::errors::DispatchError;
use crate::bot::keyboards::main_keyboard;
use crate::bot::services::status_store::{StatusBackend, StatusStore};
use crate::bot::strings::{DECODE_HELP, ENCODE_HELP, SHORT_HELP, TIKTOK_HELP};
use crate::bot::update::CallbackPress;

pub fn help_text(data: &CallbackData) -> Option<&'static str> {
    match data {
        CallbackData::TikTokHelp => Some(TIKTOK_HELP),
        CallbackData::EncodeHelp => Some(ENCODE_HELP),
        CallbackData::DecodeHelp => Some(DECODE_HELP),
        CallbackData::ShortHelp => Some(SHORT_HELP),
        _ => None,
    }
}

/// Turns the menu message into a help page and keeps the menu under it.
pub async fn show_help<B: StatusBackend>(
    store: &StatusStore<B>,
    guard: &OwnerGuard,
    press: &CallbackPress,
    text: &str,
    plan: &mut ActionPlan,
) -> Result<(), DispatchError> {
    let message = press
        .message
        .as_ref()
        .ok_or_else(|| DispatchError::MissingCallbackMessage {
            data: press.data.clone().unwrap_or_default(),
        })?;
    let message_id = message.message_id.ok_or(DispatchError::MissingMessageId)?;

    let is_owner = guard.is_owner(Some(&press.from.id));
    // Only the owner row depends on the flag.
    let active = if is_owner {
        store.read().await.active
    } else {
        true
    };

    plan.push(OutboundAction::EditMessage(EditMessage {
        chat_id: message.chat.id.clone(),
        message_id,
        text: text.to_string(),
        parse_mode: Some(ParseMode::Html),
        reply_markup: Some(main_keyboard(is_owner, active)),
    }));
    plan.push(OutboundAction::answer(&press.id, None));

    Ok(())
}
