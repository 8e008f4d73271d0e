use strum_macros::Display;

const API_BASE_URL: &str = "https://api.steampowered.com";
const COMMUNITY_BASE_URL: &str = "https://steamcommunity.com";

/// Enum for all Steam endpoints the client talks to
#[derive(Display, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    #[strum(serialize = "/IAuthenticationService/GetPasswordRSAPublicKey/v1")]
    PasswordRsaPublicKey,
    #[strum(serialize = "/IAuthenticationService/BeginAuthSessionViaCredentials/v1")]
    BeginAuthSession,
    #[strum(serialize = "/IAuthenticationService/UpdateAuthSessionWithSteamGuardCode/v1")]
    SubmitGuardCode,
    #[strum(serialize = "/IAuthenticationService/PollAuthSessionStatus/v1")]
    PollAuthSession,
    #[strum(serialize = "/IAuthenticationService/GenerateAccessTokenForApp/v1")]
    GenerateAccessToken,
    #[strum(serialize = "/inventory")]
    Inventory,
    #[strum(serialize = "/tradeoffer/new/send")]
    SendOffer,
    #[strum(serialize = "/mobileconf/getlist")]
    ConfirmationList,
    #[strum(serialize = "/mobileconf/ajaxop")]
    ConfirmationOp,
}

impl Endpoint {
    /// WebAPI service methods report failures through the `x-eresult` header.
    pub(crate) fn is_webapi(self) -> bool {
        matches!(
            self,
            Endpoint::PasswordRsaPublicKey
                | Endpoint::BeginAuthSession
                | Endpoint::SubmitGuardCode
                | Endpoint::PollAuthSession
                | Endpoint::GenerateAccessToken
        )
    }

    pub(crate) fn url(self) -> String {
        let base = if self.is_webapi() {
            API_BASE_URL
        } else {
            COMMUNITY_BASE_URL
        };
        format!("{base}{self}")
    }
}

pub(crate) fn community_url() -> &'static str {
    COMMUNITY_BASE_URL
}
