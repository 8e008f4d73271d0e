use crate::client::SessionCookies;
use crate::endpoint::Endpoint;
use crate::http::HttpClient;
use crate::inventory::{EconItem, InventoryPage};
use crate::offer::{OfferStatus, SentOffer, TradeOffer, TradeUrl};
use crate::schema::SendOfferResponse;
use crate::{Error, Result};
use log::debug;

const INVENTORY_PAGE_SIZE: usize = 2000;
const DEFAULT_LANGUAGE: &str = "english";

/// Inventory listing and offer sending for the account owning the cookies.
pub struct TradeOfferManager {
    http: HttpClient,
    steam_id: u64,
    session_id: String,
}

impl TradeOfferManager {
    pub fn set_cookies(cookies: &[String]) -> Result<Self> {
        let session = SessionCookies::parse(cookies)?;

        Ok(Self {
            http: HttpClient::with_cookies(cookies)?,
            steam_id: session.steam_id,
            session_id: session.session_id,
        })
    }

    pub fn steam_id(&self) -> u64 {
        self.steam_id
    }

    /// All items in (`app_id`, `context_id`) with descriptions attached.
    pub async fn get_inventory_contents(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> Result<Vec<EconItem>> {
        let url = format!(
            "{}/{}/{app_id}/{context_id}",
            Endpoint::Inventory.url(),
            self.steam_id
        );

        let mut items = Vec::new();
        let mut start_assetid: Option<String> = None;

        loop {
            let query = inventory_query(start_assetid.as_deref());
            let page = self
                .http
                .get_url::<Option<InventoryPage>, _>(&url, Endpoint::Inventory, &query)
                .await?;

            match collect_page(page, tradable_only, &mut items)? {
                Some(last_assetid) => start_assetid = Some(last_assetid),
                None => break,
            }
        }

        Ok(items)
    }

    pub fn create_offer(&self, trade_url: &str) -> Result<TradeOffer> {
        Ok(TradeOffer::new(trade_url.parse::<TradeUrl>()?))
    }

    pub async fn send(&self, offer: &TradeOffer) -> Result<SentOffer> {
        let partner = offer.partner.partner_steam_id().to_string();
        let json_tradeoffer = offer.json_tradeoffer().to_string();
        let create_params = offer.create_params().to_string();
        let referer = offer.partner.to_string();

        let form = [
            ("sessionid", self.session_id.as_str()),
            ("serverid", "1"),
            ("partner", partner.as_str()),
            ("tradeoffermessage", offer.message.as_str()),
            ("json_tradeoffer", json_tradeoffer.as_str()),
            ("captcha", ""),
            ("trade_offer_create_params", create_params.as_str()),
        ];

        let response: SendOfferResponse = self
            .http
            .post_form(Endpoint::SendOffer, &form, Some(referer.as_str()))
            .await?;

        sent_offer(response)
    }
}

fn inventory_query(start_assetid: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("l", DEFAULT_LANGUAGE.to_string()),
        ("count", INVENTORY_PAGE_SIZE.to_string()),
    ];
    if let Some(start) = start_assetid {
        query.push(("start_assetid", start.to_string()));
    }
    query
}

/// Moves one page into `items` and returns the asset id the next page starts after.
fn collect_page(
    page: Option<InventoryPage>,
    tradable_only: bool,
    items: &mut Vec<EconItem>,
) -> Result<Option<String>> {
    // Steam answers `null` for inventories it has never populated
    let Some(page) = page else {
        return Ok(None);
    };

    if let Some(error) = &page.error {
        return Err(Error::Api(error.clone()));
    }

    debug!(
        "Inventory page: {} assets of {}",
        page.assets.len(),
        page.total_inventory_count.unwrap_or_default()
    );

    let next = page.has_more().then(|| page.last_assetid.clone()).flatten();
    items.extend(page.into_items(tradable_only));
    Ok(next)
}

fn sent_offer(response: SendOfferResponse) -> Result<SentOffer> {
    let id = response.tradeofferid.ok_or_else(|| {
        Error::Api(
            response
                .str_error
                .unwrap_or_else(|| "no trade offer id returned".into()),
        )
    })?;

    let status = if response.needs_mobile_confirmation || response.needs_email_confirmation {
        OfferStatus::Pending
    } else {
        OfferStatus::Sent
    };

    Ok(SentOffer { id, status })
}
