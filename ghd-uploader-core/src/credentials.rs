//! Credential resolution: picks exactly one authentication mode from the
//! optional values configured on an invocation, in a fixed precedence order.

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use tracing::debug;

use crate::error::Error;

/// One usable client authentication, produced by [`AuthConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    OAuth2(String),
}

/// Credentials held by a named server entry in an external store.
#[derive(Debug, Clone, Default)]
pub struct StoredCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Lookup of named server credentials (settings file, environment, ...).
/// Implemented by the binary crate and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait CredentialStore {
    fn lookup(&self, server_id: &str) -> Option<StoredCredentials>;
}

/// Optional authentication inputs as configured on one invocation.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub oauth2_token: Option<String>,
    /// Id of a named server entry to resolve through a [`CredentialStore`].
    pub server: Option<String>,
}

impl AuthConfig {
    /// Pick exactly one authentication mode: explicit username/password,
    /// else explicit OAuth2 token, else the named server entry. A server
    /// password without a username is assumed to be an OAuth2 token.
    ///
    /// Fails with a configuration error when none of the three produce a
    /// usable credential, before any network call is made.
    pub fn resolve(&self, store: &dyn CredentialStore) -> Result<Credentials, Error> {
        if let Some(credentials) =
            from_username_password(self.username.as_deref(), self.password.as_deref())
        {
            return Ok(credentials);
        }
        if let Some(credentials) = from_oauth2_token(self.oauth2_token.as_deref()) {
            return Ok(credentials);
        }
        if let Some(server_id) = non_empty(self.server.as_deref()) {
            if let Some(stored) = store.lookup(server_id) {
                if let Some(credentials) =
                    from_username_password(stored.username.as_deref(), stored.password.as_deref())
                {
                    return Ok(credentials);
                }
                if let Some(credentials) = from_oauth2_token(stored.password.as_deref()) {
                    return Ok(credentials);
                }
            }
            debug!(
                server = server_id,
                "Server entry is missing username/password credentials"
            );
        }
        Err(Error::Configuration(
            "No authentication credentials configured".to_string(),
        ))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn from_username_password(username: Option<&str>, password: Option<&str>) -> Option<Credentials> {
    let username = non_empty(username)?;
    let password = non_empty(password)?;
    debug!(username, "Using basic authentication with username");
    Some(Credentials::Basic {
        username: username.to_string(),
        password: password.to_string(),
    })
}

fn from_oauth2_token(token: Option<&str>) -> Option<Credentials> {
    let token = non_empty(token)?;
    debug!("Using OAuth2 access token authentication");
    Some(Credentials::OAuth2(token.to_string()))
}
