use anyhow::Result;
use bot::{Config, Error, LiveBackend, Runner};
use log::{error, info};
use std::process;

#[tokio::main]
async fn main() -> Result<()> {
    common::setup_env();
    start_bot().await
}

async fn start_bot() -> Result<()> {
    let config = Config::from_env();
    let backend = LiveBackend::new(config.login_timeout);

    match Runner::new(config, backend).run().await {
        Ok(accounts) => {
            info!("Processed {} accounts", accounts.len());
            Ok(())
        }
        Err(e @ Error::MissingTradeUrl(_)) => {
            error!("{e}");
            process::exit(-1)
        }
        Err(e @ Error::CookieSetup { .. }) => {
            error!("{e}");
            process::exit(1)
        }
        Err(e) => Err(e.into()),
    }
}
