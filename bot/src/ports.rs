//! Seams between the account workflow and the Steam client.
//!
//! [`crate::LiveBackend`] wires these to the `steam` crate; tests swap in fakes.
use async_trait::async_trait;
use steam::{ConnectionEvent, EconItem, LoginOutcome, SentOffer, StartResult, TradeOffer};

/// A single credential login attempt
#[async_trait]
pub trait LoginHandshake: Send + Sync {
    async fn start_with_credentials(
        &mut self,
        account_name: &str,
        password: &str,
    ) -> steam::Result<StartResult>;

    async fn submit_steam_guard_code(&mut self, code: &str) -> steam::Result<()>;

    /// Resolves once the attempt authenticated, timed out or failed.
    async fn wait(&mut self) -> LoginOutcome;

    async fn web_cookies(&self) -> steam::Result<Vec<String>>;
}

/// Event stream of a connection opened from a refresh token
#[async_trait]
pub trait ConnectionEvents: Send {
    async fn next_event(&mut self) -> Option<ConnectionEvent>;
}

/// Inventory, offer and confirmation calls bound to one account's cookies
#[async_trait]
pub trait TradeApi: Send + Sync {
    async fn get_inventory_contents(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> steam::Result<Vec<EconItem>>;

    fn create_offer(&self, trade_url: &str) -> steam::Result<TradeOffer>;

    async fn send_offer(&self, offer: &TradeOffer) -> steam::Result<SentOffer>;

    async fn accept_confirmation_for_object(
        &self,
        identity_secret: &str,
        object_id: &str,
    ) -> steam::Result<()>;
}

pub trait SteamBackend: Send + Sync {
    fn login_session(&self) -> steam::Result<Box<dyn LoginHandshake>>;

    fn log_on(&self, refresh_token: String) -> steam::Result<Box<dyn ConnectionEvents>>;

    /// Fresh handles bound to `cookies`. Fails when the cookies can't identify a session.
    fn trade_api(
        &self,
        cookies: &[String],
        device_id: Option<&str>,
    ) -> steam::Result<Box<dyn TradeApi>>;
}
