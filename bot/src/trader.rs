use crate::accounts::Account;
use crate::ports::{SteamBackend, TradeApi};
use crate::{Error, Result};
use log::{error, info, warn};
use steam::{OfferStatus, COMMUNITY_CONTEXT_ID, STEAM_APP_ID};

/// Sends an account's whole community inventory to the recipient trade url.
pub struct TradeDispatcher<'a> {
    backend: &'a dyn SteamBackend,
    trade_url: &'a str,
}

impl<'a> TradeDispatcher<'a> {
    pub fn new(backend: &'a dyn SteamBackend, trade_url: &'a str) -> Self {
        Self { backend, trade_url }
    }

    /// Per-account failures are logged. Only a cookie setup failure is returned,
    /// since no further calls can be made for the account without it.
    pub async fn trade(&self, account: &Account) -> Result<()> {
        let Some((login, _)) = account.credentials() else {
            warn!("Login and password are needed");
            return Ok(());
        };
        let Some(cookies) = account.session_cookies.as_deref() else {
            warn!("{login} has no web session, skipping trade");
            return Ok(());
        };

        let api = self
            .backend
            .trade_api(cookies, account.device_id.as_deref())
            .map_err(|source| Error::CookieSetup {
                login: login.to_string(),
                source,
            })?;

        let inventory = match api
            .get_inventory_contents(STEAM_APP_ID, COMMUNITY_CONTEXT_ID, true)
            .await
        {
            Ok(inventory) => inventory,
            Err(e) => {
                error!("{login}: {e}");
                return Ok(());
            }
        };

        if inventory.is_empty() {
            info!("Steam inventory is empty");
            return Ok(());
        }

        info!("Found {} steam items", inventory.len());

        let mut offer = match api.create_offer(self.trade_url) {
            Ok(offer) => offer,
            Err(e) => {
                error!("{login}: {e}");
                return Ok(());
            }
        };
        offer.add_my_items(inventory);

        let sent = match api.send_offer(&offer).await {
            Ok(sent) => sent,
            Err(e) => {
                error!("{login}: {e}");
                return Ok(());
            }
        };

        match sent.status {
            OfferStatus::Pending => {
                info!("Offer #{} sent, but requires confirmation", sent.id);
                confirm(&*api, account, &sent.id).await;
            }
            OfferStatus::Sent => info!("Offer #{} sent successfully", sent.id),
        }

        Ok(())
    }
}

async fn confirm(api: &dyn TradeApi, account: &Account, offer_id: &str) {
    let Some(identity_secret) = account.identity_secret.as_deref() else {
        error!(
            "{}: no identity secret, offer #{offer_id} stays unconfirmed",
            account.login
        );
        return;
    };

    match api
        .accept_confirmation_for_object(identity_secret, offer_id)
        .await
    {
        Ok(()) => info!("Confirmed"),
        Err(e) => error!("{}: {e}", account.login),
    }
}
