use teloxide::utils::html::escape;

use super::services::status_store::StatusSource;

pub const ACCESS_DENIED: &str = "❌ Akses ditolak — hanya owner yang dapat mengubah status.";

pub const ACCESS_DENIED_SHORT: &str = "❌ Akses ditolak";

pub const STATUS_USAGE: &str = "Gunakan: <code>/status on</code> atau <code>/status off</code>";

pub const DECODE_FAILED: &str = "❌ Gagal decode — format Base64 tidak valid.";

pub const SHORTLINK_FAILED: &str = "❌ Gagal membuat shortlink.";

pub const LINK_INFO_FAILED: &str =
    "❌ Gagal mengambil info TikTok (API tidak respons atau format tak dikenali).";

pub const COPY_ID_HINT: &str = "ID dikirim (tap lalu salin)";

pub const TIKTOK_HELP: &str =
    "🎬 Kirim link TikTok di chat — bot akan otomatis mendeteksi & menampilkan preview.";

pub const ENCODE_HELP: &str =
    "✍️ Kirim teks: <code>encode: teks_anda</code> untuk mengubah ke Base64.";

pub const DECODE_HELP: &str = "🔓 Kirim teks: <code>decode: teks_base64</code> untuk decode Base64.";

pub const SHORT_HELP: &str =
    "🌐 Kirim: <code>short: https://example.com</code> untuk membuat shortlink via TinyURL.";

pub const DEFAULT_MEMBER_NAME: &str = "teman baru";

pub const ECHO_LIMIT: usize = 200;

fn state_label(active: bool) -> &'static str {
    if active {
        "AKTIF"
    } else {
        "NONAKTIF"
    }
}

fn state_badge(active: bool) -> &'static str {
    if active {
        "🟢 AKTIF"
    } else {
        "🔴 NONAKTIF"
    }
}

pub fn format_start_message(active: bool, source: StatusSource) -> String {
    format!("👋 Halo! Site: {} (via {source})", state_badge(active))
}

pub fn format_status_changed(active: bool, source: StatusSource) -> String {
    format!("✅ Situs sekarang {} (via {source}).", state_label(active))
}

pub fn format_toggle_answer(active: bool, source: StatusSource) -> String {
    format!("Situs -> {} ({source})", state_label(active))
}

pub fn format_site_panel(active: bool) -> String {
    format!("📋 Site status: {}", state_badge(active))
}

pub fn format_user_id(id: &str) -> String {
    format!("🆔 ID kamu: <code>{}</code>", escape(id))
}

pub fn format_copied_id(id: &str) -> String {
    format!("🆔 ID: <code>{}</code>", escape(id))
}

pub fn format_account_card(first_name: &str, username: Option<&str>, id: &str) -> String {
    let username = match username {
        Some(v) if !v.is_empty() => format!("@{}", escape(v)),
        _ => "-".to_string(),
    };

    format!(
        "🪪 <b>Data Akun</b>\n\n👤 <b>Nama:</b> {}\n🔗 <b>Username:</b> {username}\n🆔 <b>ID:</b> <code>{}</code>",
        escape(first_name),
        escape(id)
    )
}

pub fn format_encoded(encoded: &str) -> String {
    format!("🔐 Encode:\n<code>{}</code>", escape(encoded))
}

pub fn format_decoded(decoded: &str) -> String {
    format!("🔓 Decode:\n{decoded}")
}

pub fn format_shortlink(short: &str) -> String {
    format!("🌐 Shortlink:\n{short}")
}

pub fn format_link_caption(title: &str, author: &str) -> String {
    format!("🎬 <b>{}</b>\n👤 <b>{}</b>", escape(title), escape(author))
}

pub fn format_link_message(caption: &str, download_url: &str) -> String {
    format!("{caption}\n\n🔽 Download: {}", escape(download_url))
}

pub fn format_welcome(first_name: Option<&str>) -> String {
    let name = first_name.filter(|v| !v.is_empty()).unwrap_or(DEFAULT_MEMBER_NAME);

    format!("👋 Selamat datang, {name}!")
}

pub fn format_echo(text: &str) -> String {
    let head: String = text.chars().take(ECHO_LIMIT).collect();

    format!("💬 Aku menerima pesanmu: <i>{}</i>", escape(&head))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_message_mentions_state_and_source() {
        assert_eq!(
            format_start_message(true, StatusSource::Memory),
            "👋 Halo! Site: 🟢 AKTIF (via memory)"
        );
        assert_eq!(
            format_start_message(false, StatusSource::Remote),
            "👋 Halo! Site: 🔴 NONAKTIF (via remote)"
        );
    }

    #[test]
    fn echo_is_escaped_and_truncated() {
        let long = "x".repeat(300);

        assert_eq!(format_echo("<b>"), "💬 Aku menerima pesanmu: <i>&lt;b&gt;</i>");
        assert_eq!(format_echo(&long).matches('x').count(), ECHO_LIMIT);
    }

    #[test]
    fn echo_truncates_on_char_boundaries() {
        let text = "é".repeat(250);

        assert_eq!(format_echo(&text).matches('é').count(), ECHO_LIMIT);
    }

    #[test]
    fn welcome_uses_default_name() {
        assert_eq!(format_welcome(Some("Ana")), "👋 Selamat datang, Ana!");
        assert_eq!(format_welcome(None), "👋 Selamat datang, teman baru!");
        assert_eq!(format_welcome(Some("")), "👋 Selamat datang, teman baru!");
    }

    #[test]
    fn account_card_escapes_user_fields() {
        let card = format_account_card("<x>", None, "42");

        assert!(card.contains("&lt;x&gt;"));
        assert!(card.contains("<b>Username:</b> -"));
        assert!(card.contains("<code>42</code>"));
    }
}
