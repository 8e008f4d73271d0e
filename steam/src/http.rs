use crate::endpoint::{community_url, Endpoint};
use crate::{Error, Result};
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

const ERESULT_HEADER: &str = "x-eresult";
const ERESULT_OK: i32 = 1;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .build()?;

        Ok(Self { client, jar })
    }

    /// Client whose cookie jar carries the given `name=value` cookies for steamcommunity.com.
    pub fn with_cookies(cookies: &[String]) -> Result<Self> {
        let http = Self::new()?;
        let url = Url::parse(community_url())
            .map_err(|e| Error::InvalidCookies(format!("bad community url: {e}")))?;

        for cookie in cookies {
            http.jar.add_cookie_str(cookie, &url);
        }

        Ok(http)
    }

    async fn process_request(&self, builder: RequestBuilder, endpoint: Endpoint) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Response(status, response.text().await?));
        }

        if endpoint.is_webapi() {
            let eresult = response
                .headers()
                .get(ERESULT_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<i32>().ok());

            if let Some(eresult) = eresult.filter(|&code| code != ERESULT_OK) {
                return Err(Error::EResult(endpoint, eresult));
            }
        }

        Ok(response)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: Endpoint,
    ) -> Result<T> {
        let response = self.process_request(builder, endpoint).await?;
        let text = response.text().await?;
        log::debug!("{endpoint} responded with {} bytes", text.len());
        serde_json::from_str(&text).map_err(|_| Error::Deserialize(text))
    }

    pub(crate) async fn get<T, Q>(&self, endpoint: Endpoint, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.get_url(&endpoint.url(), endpoint, query).await
    }

    /// GET against a url built from `endpoint` plus path segments.
    pub(crate) async fn get_url<T, Q>(&self, url: &str, endpoint: Endpoint, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.client.get(url).query(query);
        self.request(builder, endpoint).await
    }

    pub(crate) async fn post_form<T, F>(
        &self,
        endpoint: Endpoint,
        form: &F,
        referer: Option<&str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let mut builder = self.client.post(endpoint.url()).form(form);

        if let Some(referer) = referer {
            builder = builder.header(REFERER, referer);
        }

        self.request(builder, endpoint).await
    }
}
