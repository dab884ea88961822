use teloxide::types::ParseMode;
use tracing::warn;

use crate::bot::actions::{OutboundAction, SendPhoto};
use crate::bot::keyboards::link_keyboard;
use crate::bot::services::link_info::Enricher;
use crate::bot::strings::{format_link_caption, format_link_message, LINK_INFO_FAILED};
use crate::bot::update::ChatIdentity;

/// Looks the link up and replies with a preview card, or with a fixed
/// failure text when the lookup does not work out.
pub async fn preview<E: Enricher>(enricher: &E, chat: &ChatIdentity, link: &str) -> OutboundAction {
    let info = match enricher.link_info(link).await {
        Ok(v) => v,
        Err(err) => {
            warn!("Link preview for {link} failed: {err}");
            return OutboundAction::text(chat.clone(), LINK_INFO_FAILED);
        }
    };

    let caption = format_link_caption(&info.title, &info.author);
    let keyboard = link_keyboard(link, &info.download_url);

    match info.thumbnail {
        Some(photo) => OutboundAction::SendPhoto(SendPhoto {
            chat_id: chat.clone(),
            photo,
            caption,
            parse_mode: Some(ParseMode::Html),
            reply_markup: keyboard,
        }),
        None => OutboundAction::html(
            chat.clone(),
            format_link_message(&caption, &info.download_url),
            keyboard,
        ),
    }
}
