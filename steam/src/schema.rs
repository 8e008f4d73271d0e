use serde::Deserialize;

/// WebAPI service methods wrap their payload in `{"response": ...}`
#[derive(Deserialize, Debug)]
pub(crate) struct ApiResponse<T> {
    pub response: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RsaKey {
    pub publickey_mod: String,
    pub publickey_exp: String,
    pub timestamp: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct BeginAuthSession {
    pub client_id: Option<String>,
    pub request_id: Option<String>,
    pub interval: Option<f64>,
    #[serde(default)]
    pub allowed_confirmations: Vec<AllowedConfirmation>,
    pub steamid: Option<String>,
    pub extended_error_message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AllowedConfirmation {
    pub confirmation_type: u32,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct PollAuthSession {
    pub new_client_id: Option<String>,
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
    pub account_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct AccessToken {
    pub access_token: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SendOfferResponse {
    pub tradeofferid: Option<String>,
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    #[serde(default)]
    pub needs_email_confirmation: bool,
    #[serde(rename = "strError")]
    pub str_error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConfirmationList {
    pub success: bool,
    #[serde(default)]
    pub conf: Vec<Confirmation>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Confirmation {
    pub id: String,
    pub nonce: String,
    pub creator_id: String,
    pub type_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConfirmationOp {
    pub success: bool,
    pub message: Option<String>,
}
