use crate::client::SessionCookies;
use crate::endpoint::Endpoint;
use crate::http::HttpClient;
use crate::schema::{Confirmation, ConfirmationList, ConfirmationOp};
use crate::totp::{device_id, generate_confirmation_key, unix_time};
use crate::{Error, Result};
use log::debug;

const TAG_LIST: &str = "list";
const TAG_ALLOW: &str = "allow";

/// Mobile confirmations, signed with the account's identity secret.
pub struct SteamCommunity {
    http: HttpClient,
    steam_id: u64,
    device_id: String,
}

impl SteamCommunity {
    pub fn set_cookies(cookies: &[String]) -> Result<Self> {
        let session = SessionCookies::parse(cookies)?;

        Ok(Self {
            http: HttpClient::with_cookies(cookies)?,
            steam_id: session.steam_id,
            device_id: device_id(session.steam_id),
        })
    }

    /// Use the device id from the authenticator export instead of the derived one.
    pub fn with_device_id(mut self, device_id: &str) -> Self {
        self.device_id = device_id.to_string();
        self
    }

    /// Accepts the confirmation created for `object_id` (a trade offer id).
    pub async fn accept_confirmation_for_object(
        &self,
        identity_secret: &str,
        object_id: &str,
    ) -> Result<()> {
        let confirmations = self.get_confirmations(identity_secret).await?;
        let confirmation = confirmation_for_object(confirmations, object_id)?;

        debug!(
            "Accepting confirmation {} ({})",
            confirmation.id,
            confirmation.type_name.as_deref().unwrap_or("unknown")
        );

        self.respond_to_confirmation(identity_secret, &confirmation, TAG_ALLOW)
            .await
    }

    async fn get_confirmations(&self, identity_secret: &str) -> Result<Vec<Confirmation>> {
        let query = self.signed_query(identity_secret, TAG_LIST)?;
        let list: ConfirmationList = self.http.get(Endpoint::ConfirmationList, &query).await?;

        if !list.success {
            return Err(Error::Api(
                list.message
                    .unwrap_or_else(|| "failed to load confirmations".into()),
            ));
        }

        Ok(list.conf)
    }

    async fn respond_to_confirmation(
        &self,
        identity_secret: &str,
        confirmation: &Confirmation,
        op: &str,
    ) -> Result<()> {
        let mut query = self.signed_query(identity_secret, op)?;
        query.push(("op", op.to_string()));
        query.push(("cid", confirmation.id.clone()));
        query.push(("ck", confirmation.nonce.clone()));

        let response: ConfirmationOp = self.http.get(Endpoint::ConfirmationOp, &query).await?;

        if response.success {
            Ok(())
        } else {
            Err(Error::Api(response.message.unwrap_or_else(|| {
                format!("confirmation {} was not accepted", confirmation.id)
            })))
        }
    }

    fn signed_query(&self, identity_secret: &str, tag: &str) -> Result<Vec<(&'static str, String)>> {
        let time = unix_time()?;

        Ok(vec![
            ("p", self.device_id.clone()),
            ("a", self.steam_id.to_string()),
            ("k", generate_confirmation_key(identity_secret, time, tag)?),
            ("t", time.to_string()),
            ("m", "react".to_string()),
            ("tag", tag.to_string()),
        ])
    }
}

fn confirmation_for_object(confirmations: Vec<Confirmation>, object_id: &str) -> Result<Confirmation> {
    confirmations
        .into_iter()
        .find(|conf| conf.creator_id == object_id)
        .ok_or_else(|| Error::NotFound(format!("Could not find confirmation for object {object_id}")))
}
