use ghd_uploader_core::credentials::{CredentialStore, StoredCredentials};

/// Named server credentials resolved from the process environment, the CLI
/// equivalent of a build tool's settings file: `GHD_SERVER_<ID>_USERNAME`
/// and `GHD_SERVER_<ID>_PASSWORD`, with the id uppercased and dashes
/// replaced by underscores.
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn lookup(&self, server_id: &str) -> Option<StoredCredentials> {
        let key = server_id.to_uppercase().replace('-', "_");
        let username = std::env::var(format!("GHD_SERVER_{key}_USERNAME")).ok();
        let password = std::env::var(format!("GHD_SERVER_{key}_PASSWORD")).ok();
        if username.is_none() && password.is_none() {
            return None;
        }
        Some(StoredCredentials { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn resolves_and_normalises_the_server_id() {
        std::env::set_var("GHD_SERVER_MY_GITHUB_USERNAME", "user");
        std::env::set_var("GHD_SERVER_MY_GITHUB_PASSWORD", "secret");
        let stored = EnvCredentialStore.lookup("my-github").unwrap();
        assert_eq!(stored.username.as_deref(), Some("user"));
        assert_eq!(stored.password.as_deref(), Some("secret"));
        std::env::remove_var("GHD_SERVER_MY_GITHUB_USERNAME");
        std::env::remove_var("GHD_SERVER_MY_GITHUB_PASSWORD");
    }

    #[test]
    #[serial]
    fn unknown_server_ids_resolve_to_nothing() {
        assert!(EnvCredentialStore.lookup("does-not-exist").is_none());
    }
}
