//! Authentication handling for the workspace backend.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Authentication method for backend requests.
#[derive(Debug, Default)]
pub enum Auth {
    /// Send no credentials (local backends).
    #[default]
    None,

    /// Read the token from an environment variable.
    EnvVar(String),

    /// Use a specific token.
    Token(SecretString),
}

impl Auth {
    /// Build auth from an optional variable name.
    #[must_use]
    pub fn from_env_name(var: Option<&str>) -> Self {
        var.map_or(Self::None, |name| Self::EnvVar(name.to_string()))
    }

    /// Resolve the authentication to a token, if any.
    ///
    /// # Errors
    /// Returns error if a configured variable is unset or empty.
    pub fn resolve(&self) -> Result<Option<SecretString>> {
        match self {
            Self::None => Ok(None),
            Self::EnvVar(var) => {
                let token = std::env::var(var).map_err(|_| Error::NoToken)?;
                if token.trim().is_empty() {
                    return Err(Error::NoToken);
                }
                Ok(Some(SecretString::from(token)))
            }
            Self::Token(t) => Ok(Some(SecretString::from(t.expose_secret().to_owned()))),
        }
    }
}
