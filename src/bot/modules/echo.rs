use crate::bot::actions::OutboundAction;
use crate::bot::strings::format_echo;
use crate::bot::update::IncomingMessage;

/// Polite auto-reply for plain text nothing else handled.
pub fn echo(message: &IncomingMessage) -> OutboundAction {
    let text = message.text.as_deref().unwrap_or_default();

    OutboundAction::html(message.chat.id.clone(), format_echo(text), None)
}
