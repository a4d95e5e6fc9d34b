//! OAuth2 client-credentials exchange against the auth0 token endpoint.
//!
//! auth0 expects the grant as a JSON body carrying the audience, so the
//! request is built here rather than through a form-encoded OAuth2 client.

use oauth2::{AccessToken, TokenUrl};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{CacheError, TokenStore};
use crate::credentials::Credentials;

const GRANT_TYPE: &str = "client_credentials";
const CLIENT_CREDENTIALS: &str = "ClientId";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status without a usable token in the body
    #[error("token endpoint answered {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    #[error("malformed provider response: {body}")]
    MalformedResponse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not cache the new token")]
    Cache(#[from] CacheError),
}

#[derive(Serialize, Debug)]
struct ClientCredentialsRequest<'a> {
    audience: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    client_credentials: &'a str,
    grant_type: &'a str,
}

/// The parts of the token endpoint's answer that are used. Both are required.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProviderTokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
pub struct TokenAcquirer {
    http: Client,
    token_url: TokenUrl,
    audience: String,
}

impl TokenAcquirer {
    pub fn new(http: Client, token_url: TokenUrl, audience: impl Into<String>) -> Self {
        TokenAcquirer {
            http,
            token_url,
            audience: audience.into(),
        }
    }

    /// Performs the exchange. Nothing is cached.
    pub fn request_token(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderTokenResponse, TokenError> {
        let url = self.token_url.url().as_str();
        let body = ClientCredentialsRequest {
            audience: &self.audience,
            client_id: credentials.client_id().as_str(),
            client_secret: credentials.client_secret().secret(),
            client_credentials: CLIENT_CREDENTIALS,
            grant_type: GRANT_TYPE,
        };

        debug!(url, client_id = body.client_id, "requesting access token");
        let transport = |source| TokenError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.http.post(url).json(&body).send().map_err(transport)?;

        let status = response.status();
        let text = response.text().map_err(transport)?;

        match serde_json::from_str(&text) {
            Ok(token) => Ok(token),
            Err(_) if !status.is_success() => Err(TokenError::Rejected { status, body: text }),
            Err(source) => Err(TokenError::MalformedResponse { body: text, source }),
        }
    }

    /// Performs the exchange and writes the new token through `store`.
    pub fn acquire(
        &self,
        credentials: &Credentials,
        store: &mut dyn TokenStore,
    ) -> Result<AccessToken, TokenError> {
        let response = self.request_token(credentials)?;
        store.write(&response.access_token, response.expires_in)?;
        info!(expires_in = response.expires_in, "acquired a new access token");

        Ok(AccessToken::new(response.access_token))
    }
}
