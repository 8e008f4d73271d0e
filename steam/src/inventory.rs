use serde::Deserialize;
use std::collections::HashMap;

/// One inventory asset joined with its description
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EconItem {
    pub appid: u32,
    pub contextid: String,
    pub assetid: String,
    pub classid: String,
    pub instanceid: String,
    pub amount: u64,
    pub name: Option<String>,
    pub market_hash_name: Option<String>,
    pub tradable: bool,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct InventoryPage {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    pub more_items: Option<u8>,
    pub last_assetid: Option<String>,
    pub total_inventory_count: Option<u32>,
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Asset {
    pub appid: u32,
    pub contextid: String,
    pub assetid: String,
    pub classid: String,
    pub instanceid: String,
    pub amount: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Description {
    pub classid: String,
    pub instanceid: String,
    #[serde(default)]
    pub tradable: u8,
    pub name: Option<String>,
    pub market_hash_name: Option<String>,
}

impl InventoryPage {
    pub(crate) fn has_more(&self) -> bool {
        self.more_items.unwrap_or(0) != 0 && self.last_assetid.is_some()
    }

    /// Joins assets with descriptions on (classid, instanceid).
    pub(crate) fn into_items(self, tradable_only: bool) -> Vec<EconItem> {
        let descriptions: HashMap<(&str, &str), &Description> = self
            .descriptions
            .iter()
            .map(|d| ((d.classid.as_str(), d.instanceid.as_str()), d))
            .collect();

        self.assets
            .iter()
            .map(|asset| {
                let description = descriptions
                    .get(&(asset.classid.as_str(), asset.instanceid.as_str()))
                    .copied();

                EconItem {
                    appid: asset.appid,
                    contextid: asset.contextid.clone(),
                    assetid: asset.assetid.clone(),
                    classid: asset.classid.clone(),
                    instanceid: asset.instanceid.clone(),
                    amount: asset.amount.parse().unwrap_or(1),
                    name: description.and_then(|d| d.name.clone()),
                    market_hash_name: description.and_then(|d| d.market_hash_name.clone()),
                    tradable: description.is_some_and(|d| d.tradable == 1),
                }
            })
            .filter(|item| !tradable_only || item.tradable)
            .collect()
    }
}
