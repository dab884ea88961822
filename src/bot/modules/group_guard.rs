use crate::bot::actions::{DeleteMessage, OutboundAction};
use crate::bot::errors::DispatchError;
use crate::bot::update::IncomingMessage;

/// Removes a link-carrying message from a group chat. The bot needs delete
/// rights there; a refusal only shows up as a failed gateway call.
pub fn delete_link_message(message: &IncomingMessage) -> Result<OutboundAction, DispatchError> {
    let message_id = message.message_id.ok_or(DispatchError::MissingMessageId)?;

    Ok(OutboundAction::DeleteMessage(DeleteMessage {
        chat_id: message.chat.id.clone(),
        message_id,
    }))
}
