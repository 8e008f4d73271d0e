//! Minimal Steam client used by the bot: login sessions, refresh-token
//! connections, inventories, trade offers and mobile confirmations.
mod auth;
mod client;
mod community;
mod endpoint;
mod error;
mod http;
mod inventory;
mod offer;
mod schema;
mod trade;
pub mod totp;

pub use auth::{GuardType, LoginOutcome, LoginSession, PlatformType, StartResult};
pub use client::{steam_login_secure, Connection, ConnectionEvent};
pub use community::SteamCommunity;
pub use error::Error;
pub use inventory::EconItem;
pub use offer::{OfferStatus, SentOffer, TradeOffer, TradeUrl};
pub use trade::TradeOfferManager;

/// App id of the Steam community inventory (trading cards, backgrounds, emoticons).
pub const STEAM_APP_ID: u32 = 753;
/// Context holding community items inside [`STEAM_APP_ID`].
pub const COMMUNITY_CONTEXT_ID: u64 = 6;

pub type Result<T> = std::result::Result<T, Error>;
