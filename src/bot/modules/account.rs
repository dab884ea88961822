//! `/id` command and the `cekid` / `copy_<id>` buttons.

use teloxide::types::ParseMode;

use crate::bot::actions::{ActionPlan, OutboundAction, SendPhoto};
use crate::bot::errors::DispatchError;
use crate::bot::keyboards::copy_id_keyboard;
use crate::bot::services::telegram_api::Gateway;
use crate::bot::strings::{format_account_card, format_copied_id, format_user_id, COPY_ID_HINT};
use crate::bot::update::{CallbackPress, ChatIdentity, IncomingMessage};

fn callback_chat(press: &CallbackPress) -> Result<&ChatIdentity, DispatchError> {
    press
        .message
        .as_ref()
        .map(|m| &m.chat.id)
        .ok_or_else(|| DispatchError::MissingCallbackMessage {
            data: press.data.clone().unwrap_or_default(),
        })
}

pub fn user_id(message: &IncomingMessage) -> OutboundAction {
    let id = message.actor().map(|a| a.as_str()).unwrap_or("-");

    OutboundAction::html(message.chat.id.clone(), format_user_id(id), None)
}

/// Account card for whoever pressed the button, with their profile photo when
/// they have one.
pub async fn check_id<G: Gateway>(
    gateway: &G,
    press: &CallbackPress,
    plan: &mut ActionPlan,
) -> Result<(), DispatchError> {
    let chat = callback_chat(press)?;
    let user = &press.from;

    let card = format_account_card(
        user.first_name.as_deref().unwrap_or_default(),
        user.username.as_deref(),
        user.id.as_str(),
    );
    let keyboard = copy_id_keyboard(user.id.as_str());

    let card = match gateway.profile_photo(&user.id).await {
        Some(photo) => OutboundAction::SendPhoto(SendPhoto {
            chat_id: chat.clone(),
            photo,
            caption: card,
            parse_mode: Some(ParseMode::Html),
            reply_markup: Some(keyboard),
        }),
        None => OutboundAction::html(chat.clone(), card, Some(keyboard)),
    };

    plan.push(card);
    plan.push(OutboundAction::answer(&press.id, None));

    Ok(())
}

pub fn copy_id(press: &CallbackPress, id: &str, plan: &mut ActionPlan) -> Result<(), DispatchError> {
    let chat = callback_chat(press)?;

    plan.push(OutboundAction::html(chat.clone(), format_copied_id(id), None));
    plan.push(OutboundAction::answer(&press.id, Some(COPY_ID_HINT.to_string())));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::services::telegram_api::testing::RecordingGateway;
    use crate::bot::update::InboundUpdate;

    fn press(body: &str) -> CallbackPress {
        match InboundUpdate::from_slice(body.as_bytes()).unwrap().unwrap() {
            InboundUpdate::CallbackPress(v) => v,
            other => panic!("unexpected update {other:?}"),
        }
    }

    const CEKID: &str = r#"{"callback_query":{"id":"q1","data":"cekid","from":{"id":42,"first_name":"Ana","username":"ana"},"message":{"message_id":3,"chat":{"id":7}}}}"#;

    #[tokio::test]
    async fn photo_card_when_profile_photo_exists() {
        let gateway = RecordingGateway::with_photo("file-big");
        let mut plan = ActionPlan::new();

        check_id(&gateway, &press(CEKID), &mut plan).await.unwrap();

        assert_eq!(plan.len(), 2);
        match &plan[0] {
            OutboundAction::SendPhoto(photo) => {
                assert_eq!(photo.chat_id, ChatIdentity::from(7));
                assert_eq!(photo.photo, "file-big");
                assert!(photo.caption.contains("@ana"));
            }
            other => panic!("unexpected action {other:?}"),
        }
        assert_eq!(plan[1], OutboundAction::answer("q1", None));
    }

    #[tokio::test]
    async fn text_card_without_photo() {
        let gateway = RecordingGateway::default();
        let mut plan = ActionPlan::new();

        check_id(&gateway, &press(CEKID), &mut plan).await.unwrap();

        assert!(matches!(plan[0], OutboundAction::SendMessage(_)));
    }

    #[tokio::test]
    async fn press_without_message_is_a_fault() {
        let gateway = RecordingGateway::default();
        let mut plan = ActionPlan::new();
        let bare = press(r#"{"callback_query":{"id":"q1","data":"cekid","from":{"id":42}}}"#);

        assert_eq!(
            check_id(&gateway, &bare, &mut plan).await,
            Err(DispatchError::MissingCallbackMessage {
                data: "cekid".into()
            })
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn copy_sends_id_and_hint() {
        let mut plan = ActionPlan::new();

        copy_id(&press(CEKID), "42", &mut plan).unwrap();

        assert_eq!(
            plan.into_vec(),
            vec![
                OutboundAction::html(ChatIdentity::from(7), "🆔 ID: <code>42</code>", None),
                OutboundAction::answer("q1", Some(COPY_ID_HINT.into())),
            ]
        );
    }
}
