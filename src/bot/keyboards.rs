use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup};

use super::callback_data::CallbackData;

fn callback_button(text: &str, data: CallbackData) -> InlineKeyboardButton {
    InlineKeyboardButton {
        text: text.to_string(),
        kind: InlineKeyboardButtonKind::CallbackData(data.to_string()),
    }
}

fn site_toggle_button(active: bool) -> InlineKeyboardButton {
    let text = if active {
        "🔴 Nonaktifkan Web"
    } else {
        "🟢 Aktifkan Web"
    };

    callback_button(text, CallbackData::site_toggle(active))
}

/// Main menu. Only the owner sees the site toggle row.
pub fn main_keyboard(is_owner: bool, site_active: bool) -> InlineKeyboardMarkup {
    let mut rows = vec![
        vec![
            callback_button("🆔 Cek ID", CallbackData::CheckId),
            callback_button("🎬 TikTok", CallbackData::TikTokHelp),
        ],
        vec![
            callback_button("🔐 Encode", CallbackData::EncodeHelp),
            callback_button("🔓 Decode", CallbackData::DecodeHelp),
        ],
        vec![callback_button("🌐 Shortlink", CallbackData::ShortHelp)],
    ];

    if is_owner {
        rows.push(vec![site_toggle_button(site_active)]);
    }

    InlineKeyboardMarkup {
        inline_keyboard: rows,
    }
}

pub fn site_panel_keyboard(site_active: bool) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![site_toggle_button(site_active)]],
    }
}

pub fn copy_id_keyboard(id: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![callback_button(
            "📋 Copy ID",
            CallbackData::CopyId { id: id.to_string() },
        )]],
    }
}

/// Watch/download buttons for a previewed link. Buttons whose target is not
/// a valid URL are left out.
pub fn link_keyboard(watch: &str, download: &str) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = [("▶️ Tonton di TikTok", watch), ("⬇️ Download (API)", download)]
        .into_iter()
        .filter_map(|(text, target)| {
            let url = reqwest::Url::parse(target).ok()?;
            Some(vec![InlineKeyboardButton {
                text: text.to_string(),
                kind: InlineKeyboardButtonKind::Url(url),
            }])
        })
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(InlineKeyboardMarkup {
        inline_keyboard: rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn main_keyboard_for_regular_user() {
        let markup = main_keyboard(false, true);

        assert_eq!(markup.inline_keyboard.len(), 3);
        assert_eq!(
            callback_data(&markup),
            vec!["cekid", "tiktok", "encode_help", "decode_help", "short_help"]
        );
    }

    #[test]
    fn owner_row_offers_the_opposite_state() {
        let active = main_keyboard(true, true);
        let inactive = main_keyboard(true, false);

        assert_eq!(active.inline_keyboard.len(), 4);
        assert_eq!(callback_data(&active).last().unwrap(), "site_off");
        assert_eq!(callback_data(&inactive).last().unwrap(), "site_on");
    }

    #[test]
    fn link_keyboard_skips_invalid_targets() {
        let markup = link_keyboard("https://vt.tiktok.com/x/", "not a url").unwrap();

        assert_eq!(markup.inline_keyboard.len(), 1);
        assert!(link_keyboard("nope", "also nope").is_none());
    }

    #[test]
    fn copy_button_carries_id() {
        assert_eq!(callback_data(&copy_id_keyboard("42")), vec!["copy_42"]);
    }
}
