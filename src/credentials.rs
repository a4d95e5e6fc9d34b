use std::fmt;

use oauth2::{ClientId, ClientSecret};

use crate::Error;

/// Environment variables holding the auth0 client credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVar {
    ClientSecret,
    ClientId,
}

impl EnvVar {
    pub fn name(&self) -> &'static str {
        match self {
            EnvVar::ClientSecret => "CLIENT_SECRET",
            EnvVar::ClientId => "CLIENT_ID",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EnvVar::ClientSecret => "client secret",
            EnvVar::ClientId => "client ID",
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// auth0 client id and secret. The secret is redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: ClientId,
    client_secret: ClientSecret,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials {
            client_id: ClientId::new(client_id.into()),
            client_secret: ClientSecret::new(client_secret.into()),
        }
    }

    /// Reads `CLIENT_SECRET` then `CLIENT_ID` from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Credentials::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let read = |var: EnvVar| lookup(var.name()).ok_or(Error::MissingEnv(var));

        let client_secret = read(EnvVar::ClientSecret)?;
        let client_id = read(EnvVar::ClientId)?;

        Ok(Credentials::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }
}
