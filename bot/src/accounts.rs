use crate::{Error, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

const MIN_TRADE_URL_LENGTH: usize = 10;
const MAFILE_EXTENSION: &str = ".mafile";

/// One Steam account and everything learned about it during the run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    pub login: String,
    pub password: Option<String>,
    pub shared_secret: Option<String>,
    pub identity_secret: Option<String>,
    pub device_id: Option<String>,
    pub session_cookies: Option<Vec<String>>,
    pub steam_login_secure: Option<String>,
    pub farmed: bool,
}

impl Account {
    pub fn new(login: impl Into<String>, password: Option<String>) -> Self {
        Self {
            login: login.into(),
            password,
            ..Default::default()
        }
    }

    /// Login and password, if both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match self.password.as_deref() {
            Some(password) if !self.login.is_empty() && !password.is_empty() => {
                Some((self.login.as_str(), password))
            }
            _ => None,
        }
    }
}

/// Accounts keyed by login, iterated in the order they were first read
#[derive(Clone, Debug, Default)]
pub struct Accounts {
    records: Vec<Account>,
}

impl Accounts {
    /// Inserts `account`, replacing an existing record with the same login in place.
    pub fn insert(&mut self, account: Account) {
        match self.get_mut(&account.login) {
            Some(existing) => *existing = account,
            None => self.records.push(account),
        }
    }

    pub fn get(&self, login: &str) -> Option<&Account> {
        self.records.iter().find(|a| a.login == login)
    }

    pub fn get_mut(&mut self, login: &str) -> Option<&mut Account> {
        self.records.iter_mut().find(|a| a.login == login)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses `login:password` lines. A line without `:` gets no password.
pub fn parse_accounts(content: &str) -> Accounts {
    let mut accounts = Accounts::default();

    for line in content.lines().filter(|line| !line.trim().is_empty()) {
        let mut parts = line.split(':');
        let login = parts.next().unwrap_or_default();
        let password = parts.next().map(str::to_string);
        accounts.insert(Account::new(login, password));
    }

    accounts
}

pub async fn read_accounts(path: &Path) -> Result<Accounts> {
    Ok(parse_accounts(&fs::read_to_string(path).await?))
}

#[derive(Deserialize)]
struct MaFile {
    account_name: String,
    shared_secret: Option<String>,
    identity_secret: Option<String>,
    device_id: Option<String>,
}

/// Copies secrets from an authenticator export onto the matching account.
/// Returns whether an account was updated.
fn merge_mafile(accounts: &mut Accounts, content: &str) -> bool {
    let Ok(mafile) = serde_json::from_str::<MaFile>(content) else {
        return false;
    };
    let Some(account) = accounts.get_mut(&mafile.account_name) else {
        return false;
    };

    account.shared_secret = mafile.shared_secret;
    account.identity_secret = mafile.identity_secret;
    account.device_id = mafile.device_id;
    true
}

/// Merges every `*.maFile` in `dir` into `accounts`; unmatched or unreadable exports are skipped.
pub async fn read_mafiles(dir: &Path, accounts: &mut Accounts) -> Result<()> {
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.contains(MAFILE_EXTENSION) {
            continue;
        }

        let content = fs::read_to_string(entry.path()).await?;
        merge_mafile(accounts, &content);
    }

    Ok(())
}

/// Reads the recipient trade url. A missing file or a value too short to be a url is fatal.
pub async fn read_trade_url(path: &Path) -> Result<String> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let trade_url = content.trim();
    if trade_url.len() < MIN_TRADE_URL_LENGTH {
        return Err(Error::MissingTradeUrl(path.display().to_string()));
    }

    Ok(trade_url.to_string())
}
