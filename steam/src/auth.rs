use crate::client::{generate_access_token, generate_session_id, web_cookies};
use crate::endpoint::Endpoint;
use crate::http::HttpClient;
use crate::schema::{ApiResponse, BeginAuthSession, PollAuthSession, RsaKey};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPublicKey};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POLL_INTERVAL: f64 = 5.0;

/// Device profile the tokens are issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformType {
    SteamClient,
}

impl PlatformType {
    fn code(self) -> u32 {
        match self {
            PlatformType::SteamClient => 1,
        }
    }

    fn website_id(self) -> &'static str {
        match self {
            PlatformType::SteamClient => "Client",
        }
    }
}

/// Steam Guard actions a pending login may accept
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardType {
    None,
    EmailCode,
    DeviceCode,
    DeviceConfirmation,
    EmailConfirmation,
    MachineToken,
    Unknown(u32),
}

impl From<u32> for GuardType {
    fn from(value: u32) -> Self {
        match value {
            1 => GuardType::None,
            2 => GuardType::EmailCode,
            3 => GuardType::DeviceCode,
            4 => GuardType::DeviceConfirmation,
            5 => GuardType::EmailConfirmation,
            6 => GuardType::MachineToken,
            other => GuardType::Unknown(other),
        }
    }
}

impl GuardType {
    fn code(self) -> Option<u32> {
        match self {
            GuardType::EmailCode => Some(2),
            GuardType::DeviceCode => Some(3),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartResult {
    pub action_required: bool,
    pub valid_actions: Vec<GuardType>,
}

impl StartResult {
    pub(crate) fn from_session(session: &BeginAuthSession) -> Self {
        let valid_actions: Vec<GuardType> = session
            .allowed_confirmations
            .iter()
            .map(|c| GuardType::from(c.confirmation_type))
            .collect();

        Self {
            action_required: valid_actions.iter().any(|&action| action != GuardType::None),
            valid_actions,
        }
    }

    /// The code-based action a guard code is submitted for, device codes first.
    pub fn code_action(&self) -> Option<GuardType> {
        preferred_code_action(&self.valid_actions)
    }
}

fn preferred_code_action(valid_actions: &[GuardType]) -> Option<GuardType> {
    [GuardType::DeviceCode, GuardType::EmailCode]
        .into_iter()
        .find(|action| valid_actions.contains(action))
}

/// How a login attempt settled
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { refresh_token: String },
    TimedOut,
    Errored(String),
}

#[derive(Clone, Debug)]
struct PendingAuth {
    client_id: String,
    request_id: String,
    steam_id: String,
    interval: Duration,
    valid_actions: Vec<GuardType>,
    started: Instant,
}

/// Credential login against `IAuthenticationService`.
///
/// `start_with_credentials` begins the attempt, `submit_steam_guard_code`
/// answers a code challenge and `wait` polls until the attempt settles.
pub struct LoginSession {
    http: HttpClient,
    platform: PlatformType,
    login_timeout: Duration,
    pending: Option<PendingAuth>,
    steam_id: Option<u64>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl LoginSession {
    pub fn new(platform: PlatformType) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            platform,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            pending: None,
            steam_id: None,
            access_token: None,
            refresh_token: None,
        })
    }

    pub fn with_login_timeout(mut self, login_timeout: Duration) -> Self {
        self.login_timeout = login_timeout;
        self
    }

    pub async fn start_with_credentials(
        &mut self,
        account_name: &str,
        password: &str,
    ) -> Result<StartResult> {
        let key = self
            .http
            .get::<ApiResponse<RsaKey>, _>(
                Endpoint::PasswordRsaPublicKey,
                &[("account_name", account_name)],
            )
            .await?
            .response;

        let encrypted_password = encrypt_password(password, &key)?;
        let platform_type = self.platform.code().to_string();
        let form = [
            ("account_name", account_name),
            ("encrypted_password", encrypted_password.as_str()),
            ("encryption_timestamp", key.timestamp.as_str()),
            ("remember_login", "true"),
            ("platform_type", platform_type.as_str()),
            ("persistence", "1"),
            ("website_id", self.platform.website_id()),
        ];

        let session = self
            .http
            .post_form::<ApiResponse<BeginAuthSession>, _>(Endpoint::BeginAuthSession, &form, None)
            .await?
            .response;

        let start = StartResult::from_session(&session);
        let (Some(client_id), Some(request_id), Some(steam_id)) =
            (session.client_id, session.request_id, session.steamid)
        else {
            return Err(Error::Api(
                session
                    .extended_error_message
                    .unwrap_or_else(|| "incomplete auth session response".into()),
            ));
        };

        debug!("Auth session started for {account_name}, actions: {:?}", start.valid_actions);

        self.pending = Some(PendingAuth {
            client_id,
            request_id,
            steam_id,
            interval: poll_interval(session.interval),
            valid_actions: start.valid_actions.clone(),
            started: Instant::now(),
        });

        Ok(start)
    }

    pub async fn submit_steam_guard_code(&mut self, code: &str) -> Result<()> {
        let pending = self.pending.as_ref().ok_or(Error::NoPendingLogin)?;

        let code_type = preferred_code_action(&pending.valid_actions)
            .and_then(GuardType::code)
            .ok_or_else(|| Error::Api("login does not accept a guard code".into()))?
            .to_string();

        let form = [
            ("client_id", pending.client_id.as_str()),
            ("steamid", pending.steam_id.as_str()),
            ("code", code),
            ("code_type", code_type.as_str()),
        ];

        self.http
            .post_form::<ApiResponse<Value>, _>(Endpoint::SubmitGuardCode, &form, None)
            .await?;

        Ok(())
    }

    /// Polls the auth session until it yields tokens, fails, or the login timeout elapses.
    pub async fn wait(&mut self) -> LoginOutcome {
        let Some(mut pending) = self.pending.clone() else {
            return LoginOutcome::Errored(Error::NoPendingLogin.to_string());
        };

        loop {
            if pending.started.elapsed() >= self.login_timeout {
                return LoginOutcome::TimedOut;
            }

            sleep(pending.interval).await;

            match self.poll(&pending).await {
                Ok(status) => {
                    if let Some(new_client_id) = status.new_client_id {
                        pending.client_id = new_client_id;
                    }

                    if let Some(refresh_token) = status.refresh_token {
                        info!(
                            "Authenticated as {}",
                            status.account_name.as_deref().unwrap_or("unknown account")
                        );
                        self.steam_id = pending.steam_id.parse().ok();
                        self.access_token = status.access_token;
                        self.refresh_token = Some(refresh_token.clone());
                        self.pending = None;
                        return LoginOutcome::Authenticated { refresh_token };
                    }
                }
                Err(e) => return LoginOutcome::Errored(e.to_string()),
            }
        }
    }

    async fn poll(&self, pending: &PendingAuth) -> Result<PollAuthSession> {
        let form = [
            ("client_id", pending.client_id.as_str()),
            ("request_id", pending.request_id.as_str()),
        ];

        Ok(self
            .http
            .post_form::<ApiResponse<PollAuthSession>, _>(Endpoint::PollAuthSession, &form, None)
            .await?
            .response)
    }

    /// Cookies for steamcommunity.com, available once the session authenticated.
    pub async fn get_web_cookies(&self) -> Result<Vec<String>> {
        let (Some(steam_id), Some(refresh_token)) = (self.steam_id, self.refresh_token.as_deref())
        else {
            return Err(Error::NoPendingLogin);
        };

        let access_token = match &self.access_token {
            Some(token) => token.clone(),
            None => generate_access_token(&self.http, refresh_token, steam_id).await?,
        };

        Ok(web_cookies(steam_id, &access_token, &generate_session_id()))
    }
}

/// Server supplied poll interval, falling back when it is missing or not a valid duration.
fn poll_interval(seconds: Option<f64>) -> Duration {
    seconds
        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
        .filter(|interval| !interval.is_zero())
        .unwrap_or(Duration::from_secs_f64(DEFAULT_POLL_INTERVAL))
}

fn encrypt_password(password: &str, key: &RsaKey) -> Result<String> {
    let modulus = BigUint::from_bytes_be(&hex::decode(&key.publickey_mod)?);
    let exponent = BigUint::from_bytes_be(&hex::decode(&key.publickey_exp)?);
    let public_key = RsaPublicKey::new(modulus, exponent)?;

    let encrypted = public_key.encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, password.as_bytes())?;
    Ok(STANDARD.encode(encrypted))
}
