use oauth2::url::Url;
use oauth2::{AccessToken, TokenUrl};
use reqwest::blocking::Client;
use tracing::{debug, warn};

pub mod api;
pub mod auth;
pub mod cache;
mod config;
pub mod credentials;
mod error;

use api::customer::{CustomerRequest, CustomerRequestSender, RequestOutcome};
use api::ApiResponse;
use auth::TokenAcquirer;
use cache::{CacheLookup, TokenStore};
use credentials::Credentials;

pub use config::Config;
pub use error::Error;

pub trait ApiClient {
    /// POSTs `body` as JSON to `path`, relative to the API base url.
    fn http_post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, Error>;
}

/// Where the token used for the current run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cached,
    Acquired,
}

#[derive(Debug)]
pub struct AivaApi {
    http: Client,
    base_url: Url,
    acquirer: TokenAcquirer,

    token: Option<AccessToken>,
}

impl AivaApi {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url).map_err(|source| Error::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let token_url = TokenUrl::new(config.token_url.clone()).map_err(|source| {
            Error::InvalidUrl {
                url: config.token_url.clone(),
                source,
            }
        })?;
        let http = Client::builder().build().map_err(Error::HttpClient)?;

        Ok(AivaApi {
            acquirer: TokenAcquirer::new(http.clone(), token_url, config.audience.clone()),
            http,
            base_url,
            token: None,
        })
    }

    /// Resolves the bearer token for this run: the cached one if it is still
    /// valid, otherwise a freshly acquired one which is written back to `store`.
    pub fn authenticate(
        &mut self,
        credentials: &Credentials,
        store: &mut dyn TokenStore,
    ) -> Result<TokenSource, Error> {
        match store.read() {
            CacheLookup::Found(token) => {
                debug!("using cached access token");
                self.token = Some(token);
                return Ok(TokenSource::Cached);
            }
            CacheLookup::Expired => debug!("cached access token has expired"),
            CacheLookup::NotFound => debug!("no cached access token"),
            CacheLookup::Malformed(err) => warn!(error = %err, "ignoring unusable token cache"),
        }

        let token = self.acquirer.acquire(credentials, store)?;
        self.token = Some(token);

        Ok(TokenSource::Acquired)
    }

    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref().map(AccessToken::secret)
    }
}

impl ApiClient for AivaApi {
    fn http_post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse, Error> {
        let token = self.token.as_ref().ok_or(Error::NotAuthenticated)?;
        let url = self.base_url.join(path).map_err(|source| Error::InvalidUrl {
            url: path.to_string(),
            source,
        })?;

        debug!(%url, "sending request");
        let response = self
            .http
            .post(url.as_str())
            .json(body)
            .bearer_auth(token.secret())
            .send()
            .map_err(|source| Error::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let version = response.version();
        let body = response.text().map_err(|source| Error::Http {
            url: url.to_string(),
            source,
        })?;
        debug!(%status, "response received");

        Ok(ApiResponse {
            status,
            version,
            body,
        })
    }
}

/// Runs the whole flow once: resolve a token through `store`, then send the
/// default customer request.
pub fn run(
    config: &Config,
    credentials: &Credentials,
    store: &mut dyn TokenStore,
) -> Result<RequestOutcome, Error> {
    let mut api = AivaApi::new(config)?;
    api.authenticate(credentials, store)?;

    CustomerRequestSender::new(&api).send(&CustomerRequest::default())
}
