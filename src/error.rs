use oauth2::url::ParseError;
use thiserror::Error;

use crate::auth::TokenError;
use crate::credentials::EnvVar;

#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable is unset
    #[error("Missing {}", .0.description())]
    MissingEnv(EnvVar),

    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: ParseError,
    },

    #[error("could not build the http client")]
    HttpClient(#[source] reqwest::Error),

    #[error("was not able to get a valid auth token")]
    Token(#[from] TokenError),

    /// A request was attempted before `authenticate` resolved a token
    #[error("no access token available")]
    NotAuthenticated,

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not encode request body")]
    Encode(#[source] serde_json::Error),
}
