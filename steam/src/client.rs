use crate::endpoint::Endpoint;
use crate::http::HttpClient;
use crate::schema::{AccessToken, ApiResponse};
use crate::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use log::debug;
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const STEAM_LOGIN_SECURE: &str = "steamLoginSecure";
const SESSION_ID: &str = "sessionid";
const STEAM_ID_SEPARATOR: &str = "%7C%7C";

/// Events announced by a [`Connection`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    LoggedOn { steam_id: u64 },
    WebSession { cookies: Vec<String> },
    Error(String),
}

/// Connection opened from a refresh token, no password involved.
///
/// Logging on runs in the background; progress arrives as [`ConnectionEvent`]s.
pub struct Connection {
    events: UnboundedReceiver<ConnectionEvent>,
}

impl Connection {
    pub fn log_on(refresh_token: String) -> Result<Self> {
        let http = HttpClient::new()?;
        let (sender, events) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            if let Err(e) = announce(&http, &sender, &refresh_token).await {
                sender.send(ConnectionEvent::Error(e.to_string())).ok();
            }
        });

        Ok(Self { events })
    }

    /// Next event, or `None` once the connection has nothing more to say.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }
}

async fn announce(
    http: &HttpClient,
    sender: &UnboundedSender<ConnectionEvent>,
    refresh_token: &str,
) -> Result<()> {
    let steam_id = steam_id_from_token(refresh_token)?;
    let access_token = generate_access_token(http, refresh_token, steam_id).await?;
    sender.send(ConnectionEvent::LoggedOn { steam_id }).ok();

    let cookies = web_cookies(steam_id, &access_token, &generate_session_id());
    sender.send(ConnectionEvent::WebSession { cookies }).ok();

    Ok(())
}

pub(crate) async fn generate_access_token(
    http: &HttpClient,
    refresh_token: &str,
    steam_id: u64,
) -> Result<String> {
    let steam_id = steam_id.to_string();
    let form = [
        ("refresh_token", refresh_token),
        ("steamid", steam_id.as_str()),
    ];

    http.post_form::<ApiResponse<AccessToken>, _>(Endpoint::GenerateAccessToken, &form, None)
        .await?
        .response
        .access_token
        .ok_or_else(|| Error::InvalidToken("no access token issued".into()))
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
}

/// Refresh tokens are JWTs whose subject is the SteamID64.
pub(crate) fn steam_id_from_token(token: &str) -> Result<u64> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::InvalidToken("not a JWT".into()))?;
    let claims: Claims = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?)?;

    claims
        .sub
        .parse()
        .map_err(|_| Error::InvalidToken(format!("bad subject {}", claims.sub)))
}

pub(crate) fn generate_session_id() -> String {
    hex::encode(rand::random::<[u8; 12]>())
}

pub(crate) fn web_cookies(steam_id: u64, access_token: &str, session_id: &str) -> Vec<String> {
    vec![
        format!("{STEAM_LOGIN_SECURE}={steam_id}{STEAM_ID_SEPARATOR}{access_token}"),
        format!("{SESSION_ID}={session_id}"),
    ]
}

fn cookie_value<'a>(cookies: &'a [String], name: &str) -> Option<&'a str> {
    cookies.iter().find_map(|cookie| {
        let (key, rest) = cookie.split_once('=')?;
        (key.trim() == name).then(|| rest.split(';').next().unwrap_or_default())
    })
}

/// Value of the `steamLoginSecure` cookie, if the set carries one.
pub fn steam_login_secure(cookies: &[String]) -> Option<String> {
    cookie_value(cookies, STEAM_LOGIN_SECURE)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Identity extracted from a web cookie set
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SessionCookies {
    pub steam_id: u64,
    pub session_id: String,
}

impl SessionCookies {
    pub(crate) fn parse(cookies: &[String]) -> Result<Self> {
        let login_secure = steam_login_secure(cookies)
            .ok_or_else(|| Error::InvalidCookies(format!("missing {STEAM_LOGIN_SECURE}")))?;
        let steam_id = login_secure
            .split(STEAM_ID_SEPARATOR)
            .next()
            .and_then(|id| id.split("||").next())
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| Error::InvalidCookies(format!("no SteamID in {STEAM_LOGIN_SECURE}")))?;
        let session_id = cookie_value(cookies, SESSION_ID)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::InvalidCookies(format!("missing {SESSION_ID}")))?
            .to_string();

        debug!("Cookies belong to {steam_id}");
        Ok(Self {
            steam_id,
            session_id,
        })
    }
}
