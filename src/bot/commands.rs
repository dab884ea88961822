use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^/(?:status|site)(?:\s+(?P<arg>\S+).*)?$")
        .unwrap_or_else(|_| panic!("Broken status command regexp!"))
});

static PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(?P<prefix>encode|decode|short):(?P<rest>.*)$")
        .unwrap_or_else(|_| panic!("Broken prefix command regexp!"))
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusArg {
    On,
    Off,
    Invalid,
}

impl StatusArg {
    pub fn target(&self) -> Option<bool> {
        match self {
            StatusArg::On => Some(true),
            StatusArg::Off => Some(false),
            StatusArg::Invalid => None,
        }
    }
}

/// Command-style messages. Exact commands are tried before prefixed ones and
/// the first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Id,
    Status(StatusArg),
    Encode(String),
    Decode(String),
    Short(String),
}

impl FromStr for Command {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();

        match text {
            "/start" => return Ok(Command::Start),
            "/id" => return Ok(Command::Id),
            _ => (),
        }

        if let Some(caps) = STATUS_RE.captures(text) {
            let arg = match caps.name("arg").map(|m| m.as_str()) {
                Some("on") => StatusArg::On,
                Some("off") => StatusArg::Off,
                _ => StatusArg::Invalid,
            };

            return Ok(Command::Status(arg));
        }

        let caps = match PREFIX_RE.captures(text) {
            Some(v) => v,
            None => return Err(strum::ParseError::VariantNotFound),
        };

        let rest = caps["rest"].trim().to_string();

        match caps["prefix"].to_lowercase().as_str() {
            "encode" => Ok(Command::Encode(rest)),
            "decode" => Ok(Command::Decode(rest)),
            "short" => Ok(Command::Short(rest)),
            _ => Err(strum::ParseError::VariantNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Option<Command> {
        s.parse().ok()
    }

    #[test]
    fn exact_commands() {
        assert_eq!(parse("/start"), Some(Command::Start));
        assert_eq!(parse("  /id "), Some(Command::Id));
        assert_eq!(parse("/start now"), None);
        assert_eq!(parse("/identity"), None);
    }

    #[test]
    fn status_command() {
        assert_eq!(parse("/status on"), Some(Command::Status(StatusArg::On)));
        assert_eq!(parse("/status   off"), Some(Command::Status(StatusArg::Off)));
        assert_eq!(parse("/site off"), Some(Command::Status(StatusArg::Off)));
        assert_eq!(parse("/status"), Some(Command::Status(StatusArg::Invalid)));
        assert_eq!(parse("/status maybe"), Some(Command::Status(StatusArg::Invalid)));
        assert_eq!(parse("/statusbar"), None);
        assert_eq!(parse("/sitemap"), None);
    }

    #[test]
    fn prefix_commands_are_case_insensitive() {
        assert_eq!(parse("encode: hello"), Some(Command::Encode("hello".into())));
        assert_eq!(parse("DECODE:aGk="), Some(Command::Decode("aGk=".into())));
        assert_eq!(
            parse("short: https://example.com"),
            Some(Command::Short("https://example.com".into()))
        );
        assert_eq!(parse("please encode: x"), None);
    }

    #[test]
    fn multiline_prefix_payload() {
        assert_eq!(parse("encode: a\nb"), Some(Command::Encode("a\nb".into())));
    }
}
