use crate::app_lib::AppConfig;
use secrecy::SecretString;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: Option<String>) -> Self {
        Self {
            api_url,
            email: None,
            password: None,
        }
    }

    pub fn set_credentials(&mut self, email: Option<String>, password: Option<SecretString>) {
        self.email = email;
        self.password = password;
    }

    /// Environment configuration with the `--api-url` override applied.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        let config = AppConfig::load();
        match &self.api_url {
            Some(url) => config.with_api_base_url(url.clone()),
            None => config,
        }
    }
}
