//! Reading and toggling the site flag: `/start`, `/status on|off` and the
//! `site_on` / `site_off` buttons. Every mutation goes through the owner
//! guard first; a denied attempt is answered, never dropped.

use teloxide::types::ParseMode;
use tracing::info;

use crate::bot::actions::{ActionPlan, EditMessage, OutboundAction};
use crate::bot::auth::OwnerGuard;
use crate::bot::commands::StatusArg;
use crate::bot::keyboards::{main_keyboard, site_panel_keyboard};
use crate::bot::services::status_store::{StatusBackend, StatusStore};
use crate::bot::strings::{
    format_site_panel, format_start_message, format_status_changed, format_toggle_answer,
    ACCESS_DENIED, ACCESS_DENIED_SHORT, STATUS_USAGE,
};
use crate::bot::update::{CallbackPress, IncomingMessage};

pub async fn start<B: StatusBackend>(
    store: &StatusStore<B>,
    guard: &OwnerGuard,
    message: &IncomingMessage,
) -> OutboundAction {
    let status = store.read().await;
    let is_owner = guard.is_owner(message.actor());

    OutboundAction::html(
        message.chat.id.clone(),
        format_start_message(status.active, status.source),
        Some(main_keyboard(is_owner, status.active)),
    )
}

pub async fn set_status<B: StatusBackend>(
    store: &StatusStore<B>,
    guard: &OwnerGuard,
    message: &IncomingMessage,
    arg: &StatusArg,
) -> OutboundAction {
    let chat = message.chat.id.clone();

    if !guard.is_owner(message.actor()) {
        return OutboundAction::text(chat, ACCESS_DENIED);
    }

    let target = match arg.target() {
        Some(v) => v,
        None => return OutboundAction::html(chat, STATUS_USAGE, None),
    };

    let outcome = store.write(target).await;
    info!("Owner set site active={target} via {}", outcome.source);

    OutboundAction::text(chat, format_status_changed(target, outcome.source))
}

pub async fn toggle<B: StatusBackend>(
    store: &StatusStore<B>,
    guard: &OwnerGuard,
    press: &CallbackPress,
    target: bool,
    plan: &mut ActionPlan,
) {
    if !guard.is_owner(Some(&press.from.id)) {
        plan.push(OutboundAction::answer(
            &press.id,
            Some(ACCESS_DENIED_SHORT.to_string()),
        ));
        return;
    }

    let outcome = store.write(target).await;
    info!("Owner toggled site active={target} via {}", outcome.source);

    plan.push(OutboundAction::answer(
        &press.id,
        Some(format_toggle_answer(target, outcome.source)),
    ));

    let panel = press
        .message
        .as_ref()
        .and_then(|m| Some((m.chat.id.clone(), m.message_id?)));

    if let Some((chat_id, message_id)) = panel {
        plan.push(OutboundAction::EditMessage(EditMessage {
            chat_id,
            message_id,
            text: format_site_panel(target),
            parse_mode: Some(ParseMode::Html),
            reply_markup: Some(site_panel_keyboard(target)),
        }));
    }
}
