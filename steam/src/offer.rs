use crate::inventory::EconItem;
use crate::{Error, Result};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use url::Url;

const STEAM_ID64_BASE: u64 = 76561197960265728;

/// Parsed `https://steamcommunity.com/tradeoffer/new/?partner=..&token=..` link
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeUrl {
    pub account_id: u32,
    pub token: Option<String>,
}

impl TradeUrl {
    pub fn partner_steam_id(&self) -> u64 {
        STEAM_ID64_BASE + u64::from(self.account_id)
    }
}

impl FromStr for TradeUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let url = Url::parse(s.trim()).map_err(|e| Error::InvalidTradeUrl(format!("{s}: {e}")))?;

        let mut account_id = None;
        let mut token = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "partner" => account_id = value.parse().ok(),
                "token" if !value.is_empty() => token = Some(value.into_owned()),
                _ => {}
            }
        }

        let account_id =
            account_id.ok_or_else(|| Error::InvalidTradeUrl(format!("{s}: missing partner")))?;

        Ok(Self { account_id, token })
    }
}

impl fmt::Display for TradeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "https://steamcommunity.com/tradeoffer/new/?partner={}", self.account_id)?;
        if let Some(token) = &self.token {
            write!(f, "&token={token}")?;
        }
        Ok(())
    }
}

/// Outgoing offer that only gives items
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeOffer {
    pub partner: TradeUrl,
    pub items_to_give: Vec<EconItem>,
    pub message: String,
}

impl TradeOffer {
    pub fn new(partner: TradeUrl) -> Self {
        Self {
            partner,
            items_to_give: Vec::new(),
            message: String::new(),
        }
    }

    pub fn add_my_items(&mut self, items: impl IntoIterator<Item = EconItem>) {
        self.items_to_give.extend(items);
    }

    pub(crate) fn json_tradeoffer(&self) -> Value {
        let assets: Vec<Value> = self
            .items_to_give
            .iter()
            .map(|item| {
                json!({
                    "appid": item.appid,
                    "contextid": item.contextid,
                    "amount": item.amount,
                    "assetid": item.assetid,
                })
            })
            .collect();

        json!({
            "newversion": true,
            "version": self.items_to_give.len() + 1,
            "me": { "assets": assets, "currency": [], "ready": false },
            "them": { "assets": [], "currency": [], "ready": false },
        })
    }

    pub(crate) fn create_params(&self) -> Value {
        match &self.partner.token {
            Some(token) => json!({ "trade_offer_access_token": token }),
            None => json!({}),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfferStatus {
    /// Waiting for a mobile or email confirmation
    Pending,
    Sent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentOffer {
    pub id: String,
    pub status: OfferStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://steamcommunity.com/tradeoffer/new/?partner=22202&token=AbCdEfGh";

    fn item(assetid: &str) -> EconItem {
        EconItem {
            appid: 753,
            contextid: "6".into(),
            assetid: assetid.into(),
            classid: "1".into(),
            instanceid: "0".into(),
            amount: 1,
            name: None,
            market_hash_name: None,
            tradable: true,
        }
    }

    #[test]
    fn trade_url_yields_partner_and_token() {
        let url: TradeUrl = URL.parse().unwrap();
        assert_eq!(url.account_id, 22202);
        assert_eq!(url.partner_steam_id(), 76561197960287930);
        assert_eq!(url.token.as_deref(), Some("AbCdEfGh"));
        assert_eq!(url.to_string(), URL);
    }

    #[test]
    fn trade_url_without_partner_is_invalid() {
        assert!(matches!(
            "https://steamcommunity.com/tradeoffer/new/?token=x".parse::<TradeUrl>(),
            Err(Error::InvalidTradeUrl(_))
        ));
        assert!("not a url at all".parse::<TradeUrl>().is_err());
    }

    #[test]
    fn offer_payload_gives_every_item() {
        let mut offer = TradeOffer::new(URL.parse().unwrap());
        offer.add_my_items([item("1"), item("2")]);

        let payload = offer.json_tradeoffer();
        assert_eq!(payload["version"], 3);
        assert_eq!(payload["me"]["assets"].as_array().unwrap().len(), 2);
        assert_eq!(payload["me"]["assets"][1]["assetid"], "2");
        assert_eq!(payload["me"]["assets"][0]["contextid"], "6");
        assert!(payload["them"]["assets"].as_array().unwrap().is_empty());
        assert_eq!(offer.create_params()["trade_offer_access_token"], "AbCdEfGh");
    }
}
