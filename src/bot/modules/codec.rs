//! `encode:`, `decode:` and `short:` text commands.

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::warn;

use crate::bot::actions::OutboundAction;
use crate::bot::services::link_info::Enricher;
use crate::bot::strings::{
    format_decoded, format_encoded, format_shortlink, DECODE_FAILED, SHORTLINK_FAILED,
};
use crate::bot::update::ChatIdentity;

pub fn encode(chat: &ChatIdentity, raw: &str) -> OutboundAction {
    let encoded = STANDARD.encode(raw.as_bytes());

    OutboundAction::html(chat.clone(), format_encoded(&encoded), None)
}

pub fn decode(chat: &ChatIdentity, raw: &str) -> OutboundAction {
    match STANDARD.decode(raw) {
        Ok(bytes) => OutboundAction::text(
            chat.clone(),
            format_decoded(&String::from_utf8_lossy(&bytes)),
        ),
        Err(_) => OutboundAction::text(chat.clone(), DECODE_FAILED),
    }
}

pub async fn short<E: Enricher>(enricher: &E, chat: &ChatIdentity, raw: &str) -> OutboundAction {
    match enricher.shorten(raw).await {
        Ok(link) => OutboundAction::text(chat.clone(), format_shortlink(&link)),
        Err(err) => {
            warn!("Shortening {raw:?} failed: {err}");
            OutboundAction::text(chat.clone(), SHORTLINK_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::actions::SendMessage;
    use crate::bot::services::link_info::testing::FakeEnricher;

    fn text_of(action: &OutboundAction) -> &str {
        match action {
            OutboundAction::SendMessage(SendMessage { text, .. }) => text,
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn encodes_utf8_bytes() {
        let chat = ChatIdentity::from(1);

        assert_eq!(text_of(&encode(&chat, "hello")), "🔐 Encode:\n<code>aGVsbG8=</code>");
        assert!(text_of(&encode(&chat, "é")).contains("w6k="));
    }

    #[test]
    fn decodes_valid_input() {
        assert_eq!(
            text_of(&decode(&ChatIdentity::from(1), "aGVsbG8=")),
            "🔓 Decode:\nhello"
        );
    }

    #[test]
    fn invalid_input_gets_fixed_reply() {
        assert_eq!(
            text_of(&decode(&ChatIdentity::from(1), "not-valid-base64!!")),
            DECODE_FAILED
        );
    }

    #[tokio::test]
    async fn shortener_failure_gets_fixed_reply() {
        let chat = ChatIdentity::from(1);
        let working = FakeEnricher {
            short: Some("https://tinyurl.com/abc".into()),
            ..Default::default()
        };

        assert_eq!(
            text_of(&short(&working, &chat, "https://example.com").await),
            "🌐 Shortlink:\nhttps://tinyurl.com/abc"
        );
        assert_eq!(
            text_of(&short(&FakeEnricher::default(), &chat, "https://example.com").await),
            SHORTLINK_FAILED
        );
    }
}
