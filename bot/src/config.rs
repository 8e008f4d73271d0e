use log::warn;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_WEB_SESSION_TIMEOUT: u64 = 60;
const DEFAULT_LOGIN_TIMEOUT: u64 = 30;

/// Fixed pauses between steps
#[derive(Clone, Debug)]
pub struct Timings {
    /// Wait after a fresh token was written before reading it back
    pub token_settle: Duration,
    /// Pause between two accounts
    pub account_pause: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            token_settle: Duration::from_millis(500),
            account_pause: Duration::from_millis(2500),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub accounts_file: PathBuf,
    pub mafiles_dir: PathBuf,
    pub tokens_dir: PathBuf,
    pub trade_url_file: PathBuf,
    pub login_timeout: Duration,
    pub web_session_timeout: Duration,
    pub timings: Timings,
}

impl Config {
    /// Default layout rooted at `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            accounts_file: dir.join("accounts.txt"),
            mafiles_dir: dir.join("maFiles"),
            tokens_dir: dir.join("tokens"),
            trade_url_file: dir.join("trade.txt"),
            login_timeout: Duration::from_secs(DEFAULT_LOGIN_TIMEOUT),
            web_session_timeout: Duration::from_secs(DEFAULT_WEB_SESSION_TIMEOUT),
            timings: Timings::default(),
        }
    }

    pub fn from_env() -> Self {
        let dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Self {
            accounts_file: env_path(&dir, "ACCOUNTS_FILE", "accounts.txt"),
            mafiles_dir: env_path(&dir, "MAFILES_DIR", "maFiles"),
            tokens_dir: env_path(&dir, "TOKENS_DIR", "tokens"),
            trade_url_file: env_path(&dir, "TRADE_URL_FILE", "trade.txt"),
            login_timeout: env_secs("LOGIN_TIMEOUT_SECS", DEFAULT_LOGIN_TIMEOUT),
            web_session_timeout: env_secs("WEB_SESSION_TIMEOUT_SECS", DEFAULT_WEB_SESSION_TIMEOUT),
            timings: Timings::default(),
        }
    }
}

fn env_path(dir: &Path, var: &str, default: &str) -> PathBuf {
    dir.join(env::var(var).unwrap_or_else(|_| default.to_string()))
}

fn env_secs(var: &str, default: u64) -> Duration {
    let secs = match env::var(var) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("{var}={value} is not a number of seconds, using {default}");
            default
        }),
        Err(_) => default,
    };
    Duration::from_secs(secs)
}
