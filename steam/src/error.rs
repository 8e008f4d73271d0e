use crate::endpoint::Endpoint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to deserialize response: {0}")]
    Deserialize(String),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Response(reqwest::StatusCode, String),

    #[error("Steam returned EResult {1} for {0}")]
    EResult(Endpoint, i32),

    #[error("Steam API error: {0}")]
    Api(String),

    #[error("Failed to generate timestamp")]
    Timestamp(#[from] std::time::SystemTimeError),

    #[error("Failed to decode base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decode hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid trade url: {0}")]
    InvalidTradeUrl(String),

    #[error("Invalid cookies: {0}")]
    InvalidCookies(String),

    #[error("Invalid refresh token: {0}")]
    InvalidToken(String),

    #[error("Login session has not been started")]
    NoPendingLogin,

    #[error("Resource not found: {0}")]
    NotFound(String),
}
