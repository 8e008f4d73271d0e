use crate::accounts::{read_accounts, read_mafiles, read_trade_url, Account, Accounts};
use crate::config::Config;
use crate::ports::SteamBackend;
use crate::session::ClientSessionManager;
use crate::tokens::TokenStore;
use crate::trader::TradeDispatcher;
use crate::Result;
use log::{error, info};
use tokio::time::sleep;

/// Drives every account through login, web session and trade, one at a time.
pub struct Runner<B> {
    config: Config,
    backend: B,
}

impl<B: SteamBackend> Runner<B> {
    pub fn new(config: Config, backend: B) -> Self {
        Self { config, backend }
    }

    /// Processes all accounts and returns them with whatever state they reached.
    pub async fn run(&self) -> Result<Accounts> {
        let trade_url = read_trade_url(&self.config.trade_url_file).await?;
        let mut accounts = read_accounts(&self.config.accounts_file).await?;
        read_mafiles(&self.config.mafiles_dir, &mut accounts).await?;
        info!("Loaded {} accounts", accounts.len());

        let tokens = TokenStore::new(&self.config.tokens_dir);
        let clients =
            ClientSessionManager::new(&self.backend, &tokens, self.config.timings.token_settle);
        let dispatcher = TradeDispatcher::new(&self.backend, &trade_url);

        for account in accounts.iter_mut() {
            info!("{}", account.login);
            self.process_account(&clients, &dispatcher, account).await?;
            sleep(self.config.timings.account_pause).await;
        }

        Ok(accounts)
    }

    async fn process_account(
        &self,
        clients: &ClientSessionManager<'_>,
        dispatcher: &TradeDispatcher<'_>,
        account: &mut Account,
    ) -> Result<()> {
        let Some(mut client) = clients.create_client(account).await else {
            return Ok(());
        };

        if let Err(e) = client
            .wait_for_web_session(account, self.config.web_session_timeout)
            .await
        {
            error!("{}: {e}, skipping", account.login);
            return Ok(());
        }

        dispatcher.trade(account).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timings;
    use crate::fakes::{items, FakeBackend, FakeSteam, TRADE_URL};
    use crate::Error;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use steam::{ConnectionEvent, GuardType};
    use tempfile::tempdir;

    fn config(dir: &Path) -> Config {
        Config {
            web_session_timeout: Duration::from_millis(100),
            timings: Timings {
                token_settle: Duration::ZERO,
                account_pause: Duration::ZERO,
            },
            ..Config::in_dir(dir)
        }
    }

    fn seed(dir: &Path, accounts: &str, trade_url: &str) {
        fs::write(dir.join("accounts.txt"), accounts).unwrap();
        fs::write(dir.join("trade.txt"), trade_url).unwrap();
        fs::create_dir(dir.join("maFiles")).unwrap();
        fs::write(
            dir.join("maFiles").join("alice.maFile"),
            r#"{"account_name": "alice", "shared_secret": "ABCD1234", "identity_secret": "c2VjcmV0"}"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn alice_is_bootstrapped_and_trades_everything() {
        let dir = tempdir().unwrap();
        seed(dir.path(), "alice:pw1\r\n", TRADE_URL);
        let backend = FakeBackend::new(FakeSteam {
            guard_actions: vec![GuardType::DeviceCode],
            inventory: items(3),
            ..FakeSteam::default()
        });

        let accounts = Runner::new(config(dir.path()), backend.clone())
            .run()
            .await
            .unwrap();

        let token_file = dir.path().join("tokens").join("alice.bin");
        assert_eq!(fs::read_to_string(token_file).unwrap(), "fresh-refresh-token");

        let calls = backend.calls();
        assert_eq!(calls.logins, [("alice".to_string(), "pw1".to_string())]);
        assert_eq!(calls.guard_codes.len(), 1);
        assert_eq!(calls.log_ons, ["fresh-refresh-token"]);
        assert_eq!(calls.offers_sent.len(), 1);
        assert_eq!(calls.offers_sent[0].items_to_give.len(), 3);
        assert_eq!(calls.confirmations, [("c2VjcmV0".to_string(), "6001".to_string())]);

        let alice = accounts.get("alice").unwrap();
        assert!(alice.steam_login_secure.is_some());
        assert_eq!(alice.shared_secret.as_deref(), Some("ABCD1234"));
    }

    #[tokio::test]
    async fn empty_trade_url_stops_before_any_account() {
        let dir = tempdir().unwrap();
        seed(dir.path(), "alice:pw1\nbob:pw2\n", "");
        let backend = FakeBackend::new(FakeSteam::default());

        let result = Runner::new(config(dir.path()), backend.clone()).run().await;

        assert!(matches!(result, Err(Error::MissingTradeUrl(_))));
        let calls = backend.calls();
        assert!(calls.logins.is_empty());
        assert!(calls.log_ons.is_empty());
        assert!(!dir.path().join("tokens").exists());
    }

    #[tokio::test]
    async fn stalled_account_does_not_block_the_next_one() {
        let dir = tempdir().unwrap();
        seed(dir.path(), "alice:pw1\nbob\ncarol:pw3\n", TRADE_URL);
        let tokens = TokenStore::new(dir.path().join("tokens"));
        tokens.write("alice", "alice-token").await.unwrap();
        tokens.write("carol", "carol-token").await.unwrap();
        let backend = FakeBackend::new(FakeSteam {
            connection_events: vec![ConnectionEvent::Error("LoggedInElsewhere".into())],
            inventory: items(1),
            ..FakeSteam::default()
        });

        let accounts = Runner::new(config(dir.path()), backend.clone())
            .run()
            .await
            .unwrap();

        let calls = backend.calls();
        assert!(calls.logins.is_empty());
        assert_eq!(calls.log_ons, ["alice-token", "carol-token"]);
        assert!(calls.offers_sent.is_empty());
        assert_eq!(accounts.len(), 3);
        assert!(accounts.iter().all(|a| a.session_cookies.is_none()));
    }

    #[tokio::test]
    async fn cookie_failure_aborts_the_batch() {
        let dir = tempdir().unwrap();
        seed(dir.path(), "alice:pw1\nbob:pw2\n", TRADE_URL);
        let backend = FakeBackend::new(FakeSteam {
            reject_cookies: true,
            ..FakeSteam::default()
        });

        let result = Runner::new(config(dir.path()), backend.clone()).run().await;

        assert!(matches!(result, Err(Error::CookieSetup { .. })));
        assert_eq!(backend.calls().log_ons.len(), 1);
    }
}
