//! Logs a batch of Steam accounts in one after another and hands each
//! account's community inventory to a single recipient.
mod accounts;
mod backend;
mod config;
mod error;
pub mod ports;
mod runner;
mod session;
mod tokens;
mod trader;

#[cfg(test)]
mod fakes;

pub use accounts::{read_accounts, read_mafiles, read_trade_url, Account, Accounts};
pub use backend::LiveBackend;
pub use config::{Config, Timings};
pub use error::{Error, SessionError};
pub use runner::Runner;
pub use session::{ClientConnection, ClientSessionManager, SessionBootstrapper};
pub use tokens::TokenStore;
pub use trader::TradeDispatcher;

pub type Result<T> = std::result::Result<T, Error>;
