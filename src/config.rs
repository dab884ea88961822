use once_cell::sync::Lazy;
use tracing::warn;

const DEFAULT_STATUS_PATH: &str = "site-status.json";
const DEFAULT_GITHUB_API_ROOT: &str = "https://api.github.com";
const DEFAULT_TELEGRAM_BOT_API_ROOT: &str = "https://api.telegram.org";
const DEFAULT_LINK_INFO_API: &str = "https://api.siputzx.my.id/api/d/tiktok?url=";
const DEFAULT_SHORTENER_API: &str = "https://tinyurl.com/api-create.php";
const DEFAULT_WEBHOOK_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteStatusConfig {
    pub api_root: reqwest::Url,
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: Option<String>,
    pub owner_id: Option<String>,

    pub telegram_bot_api: reqwest::Url,

    pub site_active_default: bool,
    pub remote_status: Option<RemoteStatusConfig>,

    pub link_info_api: String,
    pub shortener_api: reqwest::Url,

    pub webhook_port: u16,

    pub sentry_dsn: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_url_or(name: &str, value: Option<String>, default: &str) -> reqwest::Url {
    if let Some(raw) = value {
        match reqwest::Url::parse(&raw) {
            Ok(v) => return v,
            Err(err) => warn!("Cannot parse url from {name} ({err}), using {default}"),
        }
    }

    reqwest::Url::parse(default).unwrap_or_else(|_| panic!("Invalid built-in url {default}"))
}

impl Config {
    pub fn load() -> Config {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(get: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| non_empty(get(name));

        let site_active_default = env("SITE_ACTIVE")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        let remote_status = match (env("GITHUB_TOKEN"), env("OWNER_REPO")) {
            (Some(token), Some(owner_repo)) => match owner_repo.split_once('/') {
                Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                    Some(RemoteStatusConfig {
                        api_root: parse_url_or(
                            "GITHUB_API_ROOT",
                            env("GITHUB_API_ROOT"),
                            DEFAULT_GITHUB_API_ROOT,
                        ),
                        token,
                        owner: owner.to_string(),
                        repo: repo.to_string(),
                        path: env("STATUS_PATH").unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string()),
                    })
                }
                _ => {
                    warn!("OWNER_REPO must look like owner/repo, remote status disabled");
                    None
                }
            },
            _ => None,
        };

        let webhook_port = match env("WEBHOOK_PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Cannot parse WEBHOOK_PORT={raw}, using {DEFAULT_WEBHOOK_PORT}");
                DEFAULT_WEBHOOK_PORT
            }),
            None => DEFAULT_WEBHOOK_PORT,
        };

        Config {
            bot_token: env("BOT_TOKEN"),
            owner_id: env("OWNER_CHAT_ID"),

            telegram_bot_api: parse_url_or(
                "TELEGRAM_BOT_API_ROOT",
                env("TELEGRAM_BOT_API_ROOT"),
                DEFAULT_TELEGRAM_BOT_API_ROOT,
            ),

            site_active_default,
            remote_status,

            link_info_api: env("LINK_INFO_API").unwrap_or_else(|| DEFAULT_LINK_INFO_API.to_string()),
            shortener_api: parse_url_or("SHORTENER_API", env("SHORTENER_API"), DEFAULT_SHORTENER_API),

            webhook_port,

            sentry_dsn: env("SENTRY_DSN"),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);
