use crate::ports::{ConnectionEvents, LoginHandshake, SteamBackend, TradeApi};
use async_trait::async_trait;
use std::time::Duration;
use steam::{
    Connection, ConnectionEvent, EconItem, LoginOutcome, LoginSession, PlatformType, SentOffer,
    StartResult, SteamCommunity, TradeOffer, TradeOfferManager,
};

/// Backend talking to the real Steam services
pub struct LiveBackend {
    login_timeout: Duration,
}

impl LiveBackend {
    pub fn new(login_timeout: Duration) -> Self {
        Self { login_timeout }
    }
}

impl SteamBackend for LiveBackend {
    fn login_session(&self) -> steam::Result<Box<dyn LoginHandshake>> {
        let session =
            LoginSession::new(PlatformType::SteamClient)?.with_login_timeout(self.login_timeout);
        Ok(Box::new(session))
    }

    fn log_on(&self, refresh_token: String) -> steam::Result<Box<dyn ConnectionEvents>> {
        Ok(Box::new(Connection::log_on(refresh_token)?))
    }

    fn trade_api(
        &self,
        cookies: &[String],
        device_id: Option<&str>,
    ) -> steam::Result<Box<dyn TradeApi>> {
        let mut community = SteamCommunity::set_cookies(cookies)?;
        if let Some(device_id) = device_id {
            community = community.with_device_id(device_id);
        }

        Ok(Box::new(LiveTradeApi {
            manager: TradeOfferManager::set_cookies(cookies)?,
            community,
        }))
    }
}

#[async_trait]
impl LoginHandshake for LoginSession {
    async fn start_with_credentials(
        &mut self,
        account_name: &str,
        password: &str,
    ) -> steam::Result<StartResult> {
        LoginSession::start_with_credentials(self, account_name, password).await
    }

    async fn submit_steam_guard_code(&mut self, code: &str) -> steam::Result<()> {
        LoginSession::submit_steam_guard_code(self, code).await
    }

    async fn wait(&mut self) -> LoginOutcome {
        LoginSession::wait(self).await
    }

    async fn web_cookies(&self) -> steam::Result<Vec<String>> {
        self.get_web_cookies().await
    }
}

#[async_trait]
impl ConnectionEvents for Connection {
    async fn next_event(&mut self) -> Option<ConnectionEvent> {
        Connection::next_event(self).await
    }
}

struct LiveTradeApi {
    manager: TradeOfferManager,
    community: SteamCommunity,
}

#[async_trait]
impl TradeApi for LiveTradeApi {
    async fn get_inventory_contents(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> steam::Result<Vec<EconItem>> {
        self.manager
            .get_inventory_contents(app_id, context_id, tradable_only)
            .await
    }

    fn create_offer(&self, trade_url: &str) -> steam::Result<TradeOffer> {
        self.manager.create_offer(trade_url)
    }

    async fn send_offer(&self, offer: &TradeOffer) -> steam::Result<SentOffer> {
        self.manager.send(offer).await
    }

    async fn accept_confirmation_for_object(
        &self,
        identity_secret: &str,
        object_id: &str,
    ) -> steam::Result<()> {
        self.community
            .accept_confirmation_for_object(identity_secret, object_id)
            .await
    }
}
