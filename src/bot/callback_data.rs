use std::{fmt::Display, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

static COPY_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^copy_(?P<id>[^_]+)")
        .unwrap_or_else(|_| panic!("Broken CopyId regex pattern!"))
});

/// Inline button identifiers this bot knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
    CheckId,
    TikTokHelp,
    EncodeHelp,
    DecodeHelp,
    ShortHelp,
    SiteOn,
    SiteOff,
    CopyId { id: String },
}

impl Display for CallbackData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackData::CheckId => write!(f, "cekid"),
            CallbackData::TikTokHelp => write!(f, "tiktok"),
            CallbackData::EncodeHelp => write!(f, "encode_help"),
            CallbackData::DecodeHelp => write!(f, "decode_help"),
            CallbackData::ShortHelp => write!(f, "short_help"),
            CallbackData::SiteOn => write!(f, "site_on"),
            CallbackData::SiteOff => write!(f, "site_off"),
            CallbackData::CopyId { id } => write!(f, "copy_{id}"),
        }
    }
}

impl FromStr for CallbackData {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = match s {
            "cekid" => CallbackData::CheckId,
            "tiktok" => CallbackData::TikTokHelp,
            "encode_help" => CallbackData::EncodeHelp,
            "decode_help" => CallbackData::DecodeHelp,
            "short_help" => CallbackData::ShortHelp,
            "site_on" => CallbackData::SiteOn,
            "site_off" => CallbackData::SiteOff,
            _ => {
                let caps = COPY_ID_RE
                    .captures(s)
                    .ok_or(strum::ParseError::VariantNotFound)?;

                CallbackData::CopyId {
                    id: caps["id"].to_string(),
                }
            }
        };

        Ok(data)
    }
}

/// Result of reading a button press. Unknown identifiers still have to be
/// acknowledged, so they get their own variant instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackKind {
    Known(CallbackData),
    Unknown(Option<String>),
}

impl CallbackKind {
    pub fn from_data(data: Option<&str>) -> Self {
        match data.map(CallbackData::from_str) {
            Some(Ok(v)) => CallbackKind::Known(v),
            _ => CallbackKind::Unknown(data.map(str::to_string)),
        }
    }
}

impl CallbackData {
    /// Target value for the site toggle buttons.
    pub fn site_target(&self) -> Option<bool> {
        match self {
            CallbackData::SiteOn => Some(true),
            CallbackData::SiteOff => Some(false),
            _ => None,
        }
    }

    pub fn site_toggle(currently_active: bool) -> Self {
        if currently_active {
            CallbackData::SiteOff
        } else {
            CallbackData::SiteOn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_identifiers_round_trip_through_display() {
        for data in [
            CallbackData::CheckId,
            CallbackData::TikTokHelp,
            CallbackData::EncodeHelp,
            CallbackData::DecodeHelp,
            CallbackData::ShortHelp,
            CallbackData::SiteOn,
            CallbackData::SiteOff,
            CallbackData::CopyId { id: "42".into() },
        ] {
            assert_eq!(data.to_string().parse::<CallbackData>().unwrap(), data);
        }
    }

    #[test]
    fn copy_id_stops_at_next_separator() {
        assert_eq!(
            "copy_12_3".parse::<CallbackData>().unwrap(),
            CallbackData::CopyId { id: "12".into() }
        );
        assert!("copy_".parse::<CallbackData>().is_err());
    }

    #[test]
    fn unknown_and_missing_data() {
        assert_eq!(
            CallbackKind::from_data(Some("lang_on_ru")),
            CallbackKind::Unknown(Some("lang_on_ru".into()))
        );
        assert_eq!(CallbackKind::from_data(None), CallbackKind::Unknown(None));
        assert_eq!(
            CallbackKind::from_data(Some("site_off")),
            CallbackKind::Known(CallbackData::SiteOff)
        );
    }

    #[test]
    fn toggle_button_offers_the_opposite_state() {
        assert_eq!(CallbackData::site_toggle(true), CallbackData::SiteOff);
        assert_eq!(CallbackData::site_toggle(false), CallbackData::SiteOn);
        assert_eq!(CallbackData::SiteOn.site_target(), Some(true));
        assert_eq!(CallbackData::CheckId.site_target(), None);
    }
}
