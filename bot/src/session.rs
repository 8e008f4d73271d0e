use crate::accounts::Account;
use crate::error::SessionError;
use crate::ports::{ConnectionEvents, LoginHandshake, SteamBackend};
use crate::tokens::TokenStore;
use log::{debug, error, info, warn};
use std::time::Duration;
use steam::totp::{generate_auth_code, unix_time};
use steam::{ConnectionEvent, LoginOutcome, StartResult};
use tokio::time::{sleep, timeout};

type Clock = fn() -> steam::Result<u64>;

/// Turns credentials into a refresh token on disk.
pub struct SessionBootstrapper<'a> {
    backend: &'a dyn SteamBackend,
    tokens: &'a TokenStore,
    clock: Clock,
}

impl<'a> SessionBootstrapper<'a> {
    pub fn new(backend: &'a dyn SteamBackend, tokens: &'a TokenStore) -> Self {
        Self {
            backend,
            tokens,
            clock: unix_time,
        }
    }

    /// Clock used for guard codes, in unix seconds.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Logs in with a password and persists the refresh token. Returns whether a token was written.
    pub async fn create_session(
        &self,
        login: &str,
        password: Option<&str>,
        shared_secret: Option<&str>,
    ) -> bool {
        let Some(password) = password.filter(|p| !login.is_empty() && !p.is_empty()) else {
            warn!("Login and password are needed");
            return false;
        };

        let mut session = match self.backend.login_session() {
            Ok(session) => session,
            Err(e) => {
                error!("ERROR: This login attempt has failed! {e}");
                return false;
            }
        };

        let start = match session.start_with_credentials(login, password).await {
            Ok(start) => start,
            Err(e) => {
                error!("ERROR: This login attempt has failed! {e}");
                return false;
            }
        };

        if start.action_required {
            self.resolve_guard(&mut *session, &start, shared_secret).await;
        }

        match session.wait().await {
            LoginOutcome::Authenticated { refresh_token } => {
                match session.web_cookies().await {
                    Ok(cookies) => debug!("{login} received {} web cookies", cookies.len()),
                    Err(e) => {
                        error!("ERROR: This login attempt has failed! {e}");
                        return false;
                    }
                }

                match self.tokens.write(login, &refresh_token).await {
                    Ok(()) => {
                        info!("{login} session created");
                        true
                    }
                    Err(e) => {
                        error!("ERROR: This login attempt has failed! {e}");
                        false
                    }
                }
            }
            LoginOutcome::TimedOut => {
                warn!("This login attempt has timed out.");
                false
            }
            LoginOutcome::Errored(message) => {
                error!("ERROR: This login attempt has failed! {message}");
                false
            }
        }
    }

    /// Submits a TOTP code when the challenge accepts one and a shared secret is known.
    async fn resolve_guard(
        &self,
        session: &mut dyn LoginHandshake,
        start: &StartResult,
        shared_secret: Option<&str>,
    ) {
        let Some(action) = start.code_action() else {
            debug!("No code based guard action among {:?}", start.valid_actions);
            return;
        };
        let Some(shared_secret) = shared_secret else {
            warn!("Steam Guard {action:?} required but no shared secret is known");
            return;
        };

        let code = match (self.clock)().and_then(|time| generate_auth_code(shared_secret, time)) {
            Ok(code) => code,
            Err(e) => {
                error!("Couldn't generate Steam Guard code: {e}");
                return;
            }
        };

        if let Err(e) = session.submit_steam_guard_code(&code).await {
            error!("Steam Guard code was rejected: {e}");
        }
    }

}

/// Opens refresh-token connections, bootstrapping a token first when none is stored.
pub struct ClientSessionManager<'a> {
    backend: &'a dyn SteamBackend,
    tokens: &'a TokenStore,
    bootstrapper: SessionBootstrapper<'a>,
    token_settle: Duration,
}

impl<'a> ClientSessionManager<'a> {
    pub fn new(backend: &'a dyn SteamBackend, tokens: &'a TokenStore, token_settle: Duration) -> Self {
        Self {
            backend,
            tokens,
            bootstrapper: SessionBootstrapper::new(backend, tokens),
            token_settle,
        }
    }

    pub async fn create_client(&self, account: &Account) -> Option<ClientConnection> {
        let Some((login, password)) = account.credentials() else {
            warn!("Login and password are needed");
            return None;
        };

        if !self.tokens.exists(login).await {
            let created = self
                .bootstrapper
                .create_session(login, Some(password), account.shared_secret.as_deref())
                .await;
            debug!("Session bootstrap for {login} returned {created}");
            sleep(self.token_settle).await;
        }

        let refresh_token = match self.tokens.read(login).await {
            Ok(token) => token,
            Err(e) => {
                error!("Couldn't read refresh token for {login}: {e}");
                return None;
            }
        };

        match self.backend.log_on(refresh_token) {
            Ok(events) => Some(ClientConnection { events }),
            Err(e) => {
                error!("Couldn't log on {login}: {e}");
                None
            }
        }
    }
}

/// A logged-on connection whose web session has not been collected yet
pub struct ClientConnection {
    events: Box<dyn ConnectionEvents>,
}

impl ClientConnection {
    /// Consumes connection events until the web session cookies land on `account`.
    pub async fn wait_for_web_session(
        &mut self,
        account: &mut Account,
        limit: Duration,
    ) -> Result<(), SessionError> {
        let events = &mut self.events;

        timeout(limit, async {
            while let Some(event) = events.next_event().await {
                match event {
                    ConnectionEvent::LoggedOn { steam_id } => {
                        info!("logged");
                        debug!("{} is {steam_id}", account.login);
                    }
                    ConnectionEvent::WebSession { cookies } => {
                        account.steam_login_secure = steam::steam_login_secure(&cookies);
                        account.session_cookies = Some(cookies);

                        if account.steam_login_secure.is_some() {
                            return Ok(());
                        }
                        warn!("Web session for {} has no steamLoginSecure cookie", account.login);
                    }
                    ConnectionEvent::Error(message) => error!("{}: {message}", account.login),
                }
            }

            Err(SessionError::Disconnected)
        })
        .await
        .map_err(|_| SessionError::TimedOut(limit))?
    }
}
