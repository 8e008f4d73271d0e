//! In-memory Steam backend recording every call it receives.
use crate::ports::{ConnectionEvents, LoginHandshake, SteamBackend, TradeApi};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::future;
use std::sync::{Arc, Mutex};
use steam::{
    ConnectionEvent, EconItem, GuardType, LoginOutcome, OfferStatus, SentOffer, StartResult,
    TradeOffer,
};

pub(crate) const TRADE_URL: &str =
    "https://steamcommunity.com/tradeoffer/new/?partner=22202&token=AbCdEfGh";

pub(crate) fn web_session_cookies() -> Vec<String> {
    vec![
        "steamLoginSecure=76561197960287930%7C%7Caccess".to_string(),
        "sessionid=0123456789abcdef01234567".to_string(),
    ]
}

pub(crate) fn web_session() -> ConnectionEvent {
    ConnectionEvent::WebSession {
        cookies: web_session_cookies(),
    }
}

pub(crate) fn items(count: usize) -> Vec<EconItem> {
    (0..count)
        .map(|i| EconItem {
            appid: 753,
            contextid: "6".to_string(),
            assetid: (1000 + i).to_string(),
            classid: "57".to_string(),
            instanceid: "0".to_string(),
            amount: 1,
            name: Some(format!("Card {i}")),
            market_hash_name: None,
            tradable: true,
        })
        .collect()
}

/// Scripted behaviour of the fake Steam
#[derive(Clone, Debug)]
pub(crate) struct FakeSteam {
    pub guard_actions: Vec<GuardType>,
    /// Outcome of `wait`; authenticated with `refresh_token` when `None`
    pub login_outcome: Option<LoginOutcome>,
    pub refresh_token: String,
    pub connection_events: Vec<ConnectionEvent>,
    /// Close the event stream after the scripted events instead of staying silent
    pub hang_up: bool,
    pub reject_cookies: bool,
    pub web_cookies_fail: bool,
    pub inventory: Vec<EconItem>,
    pub inventory_fails: bool,
    pub send_status: OfferStatus,
    pub send_fails: bool,
    pub offer_id: String,
}

impl Default for FakeSteam {
    fn default() -> Self {
        Self {
            guard_actions: Vec::new(),
            login_outcome: None,
            refresh_token: "fresh-refresh-token".to_string(),
            connection_events: vec![web_session()],
            hang_up: false,
            reject_cookies: false,
            web_cookies_fail: false,
            inventory: Vec::new(),
            inventory_fails: false,
            send_status: OfferStatus::Pending,
            send_fails: false,
            offer_id: "6001".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Calls {
    pub logins: Vec<(String, String)>,
    pub guard_codes: Vec<String>,
    pub log_ons: Vec<String>,
    pub trade_apis: Vec<Vec<String>>,
    pub inventory_fetches: Vec<(u32, u64)>,
    pub offers_sent: Vec<TradeOffer>,
    pub confirmations: Vec<(String, String)>,
}

struct State {
    steam: FakeSteam,
    calls: Mutex<Calls>,
}

impl State {
    fn record(&self, f: impl FnOnce(&mut Calls)) {
        f(&mut *self.calls.lock().unwrap());
    }
}

#[derive(Clone)]
pub(crate) struct FakeBackend {
    state: Arc<State>,
}

impl FakeBackend {
    pub(crate) fn new(steam: FakeSteam) -> Self {
        Self {
            state: Arc::new(State {
                steam,
                calls: Mutex::new(Calls::default()),
            }),
        }
    }

    pub(crate) fn calls(&self) -> Calls {
        self.state.calls.lock().unwrap().clone()
    }
}

impl SteamBackend for FakeBackend {
    fn login_session(&self) -> steam::Result<Box<dyn LoginHandshake>> {
        Ok(Box::new(FakeLogin {
            state: self.state.clone(),
        }))
    }

    fn log_on(&self, refresh_token: String) -> steam::Result<Box<dyn ConnectionEvents>> {
        self.state.record(|calls| calls.log_ons.push(refresh_token));

        Ok(Box::new(FakeConnection {
            events: self.state.steam.connection_events.clone().into(),
            hang_up: self.state.steam.hang_up,
        }))
    }

    fn trade_api(
        &self,
        cookies: &[String],
        _device_id: Option<&str>,
    ) -> steam::Result<Box<dyn TradeApi>> {
        if self.state.steam.reject_cookies {
            return Err(steam::Error::InvalidCookies("rejected".into()));
        }

        self.state
            .record(|calls| calls.trade_apis.push(cookies.to_vec()));
        Ok(Box::new(FakeTradeApi {
            state: self.state.clone(),
        }))
    }
}

struct FakeLogin {
    state: Arc<State>,
}

#[async_trait]
impl LoginHandshake for FakeLogin {
    async fn start_with_credentials(
        &mut self,
        account_name: &str,
        password: &str,
    ) -> steam::Result<StartResult> {
        self.state.record(|calls| {
            calls
                .logins
                .push((account_name.to_string(), password.to_string()))
        });

        let valid_actions = self.state.steam.guard_actions.clone();
        Ok(StartResult {
            action_required: !valid_actions.is_empty(),
            valid_actions,
        })
    }

    async fn submit_steam_guard_code(&mut self, code: &str) -> steam::Result<()> {
        self.state
            .record(|calls| calls.guard_codes.push(code.to_string()));
        Ok(())
    }

    async fn wait(&mut self) -> LoginOutcome {
        self.state
            .steam
            .login_outcome
            .clone()
            .unwrap_or_else(|| LoginOutcome::Authenticated {
                refresh_token: self.state.steam.refresh_token.clone(),
            })
    }

    async fn web_cookies(&self) -> steam::Result<Vec<String>> {
        if self.state.steam.web_cookies_fail {
            return Err(steam::Error::InvalidToken("no access token".into()));
        }
        Ok(web_session_cookies())
    }
}

struct FakeConnection {
    events: VecDeque<ConnectionEvent>,
    hang_up: bool,
}

#[async_trait]
impl ConnectionEvents for FakeConnection {
    async fn next_event(&mut self) -> Option<ConnectionEvent> {
        match self.events.pop_front() {
            Some(event) => Some(event),
            None if self.hang_up => None,
            None => future::pending().await,
        }
    }
}

struct FakeTradeApi {
    state: Arc<State>,
}

#[async_trait]
impl TradeApi for FakeTradeApi {
    async fn get_inventory_contents(
        &self,
        app_id: u32,
        context_id: u64,
        _tradable_only: bool,
    ) -> steam::Result<Vec<EconItem>> {
        self.state
            .record(|calls| calls.inventory_fetches.push((app_id, context_id)));

        if self.state.steam.inventory_fails {
            return Err(steam::Error::Api("inventory is private".into()));
        }
        Ok(self.state.steam.inventory.clone())
    }

    fn create_offer(&self, trade_url: &str) -> steam::Result<TradeOffer> {
        Ok(TradeOffer::new(trade_url.parse()?))
    }

    async fn send_offer(&self, offer: &TradeOffer) -> steam::Result<SentOffer> {
        if self.state.steam.send_fails {
            return Err(steam::Error::Api("There was an error sending your trade offer.".into()));
        }

        self.state
            .record(|calls| calls.offers_sent.push(offer.clone()));
        Ok(SentOffer {
            id: self.state.steam.offer_id.clone(),
            status: self.state.steam.send_status,
        })
    }

    async fn accept_confirmation_for_object(
        &self,
        identity_secret: &str,
        object_id: &str,
    ) -> steam::Result<()> {
        self.state.record(|calls| {
            calls
                .confirmations
                .push((identity_secret.to_string(), object_id.to_string()))
        });
        Ok(())
    }
}
