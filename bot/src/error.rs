use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Trade url in '{0}' is required")]
    MissingTradeUrl(String),

    #[error("Couldn't set cookies for {login}: {source}")]
    CookieSetup {
        login: String,
        #[source]
        source: steam::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a client never produced a web session
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("no web session after {0:?}")]
    TimedOut(Duration),

    #[error("connection closed before a web session was announced")]
    Disconnected,
}
