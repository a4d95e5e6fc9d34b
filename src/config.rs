use std::path::PathBuf;

const PRODUCTION_BASE_URL: &str = "http://federated.aivadev.com";
const TOKEN_URL: &str = "https://aiva.auth0.com/oauth/token";
const AUDIENCE: &str = "https://aivahealth.com/api/v1";
const CACHE_FILE: &str = "aiva-jwt.properties";

/// Endpoints and file locations used for a run.
///
/// The binary always runs with [`Config::default`]; the fields are public so
/// that tests can point the client at local servers.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base url of the federated API.
    pub base_url: String,
    /// auth0 token endpoint.
    pub token_url: String,
    /// Audience requested for the client-credentials grant.
    pub audience: String,
    /// Token cache, relative to the working directory unless absolute.
    pub cache_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: PRODUCTION_BASE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            audience: AUDIENCE.to_string(),
            cache_file: PathBuf::from(CACHE_FILE),
        }
    }
}
