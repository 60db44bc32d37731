//! Server configuration.

use xchange_fx::{MarketConfig, MutationOrdering, DEFAULT_CURRENCIES};

use crate::auth::{Credentials, Role};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Accounts allowed to authenticate.
    pub users: Vec<Credentials>,
    /// Currencies added at startup. Empty disables seeding.
    pub seed_currencies: Vec<String>,
    /// Fixed seed for rate generation.
    pub rate_seed: Option<u64>,
    /// Serialize registry mutations.
    pub serialize_mutations: bool,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            users: vec![
                Credentials::new("admin", "admin", Role::Admin),
                Credentials::new("user", "user", Role::User),
            ],
            seed_currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            rate_seed: None,
            serialize_mutations: false,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("XCHANGE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Ok(port) = std::env::var("XCHANGE_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Ok(user) = std::env::var("XCHANGE_ADMIN_USER") {
            config.users[0].username = user;
        }
        if let Ok(password) = std::env::var("XCHANGE_ADMIN_PASSWORD") {
            config.users[0].password = password;
        }
        if let Ok(user) = std::env::var("XCHANGE_USER") {
            config.users[1].username = user;
        }
        if let Ok(password) = std::env::var("XCHANGE_USER_PASSWORD") {
            config.users[1].password = password;
        }

        if let Ok(list) = std::env::var("XCHANGE_SEED_CURRENCIES") {
            config.seed_currencies = parse_list(&list);
        }

        if let Ok(seed) = std::env::var("XCHANGE_RATE_SEED") {
            config.rate_seed = seed.parse().ok();
        }

        if let Ok(flag) = std::env::var("XCHANGE_SERIALIZE_MUTATIONS") {
            config.serialize_mutations = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Ok(format) = std::env::var("XCHANGE_LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                config.log_format = LogFormat::Json;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self
            .users
            .iter()
            .any(|u| u.username.is_empty() || u.password.is_empty())
        {
            return Err("Usernames and passwords cannot be empty".to_string());
        }

        Ok(())
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }

    /// Market configuration derived from this config.
    pub fn market_config(&self) -> MarketConfig {
        MarketConfig {
            seed: self.rate_seed,
            ordering: if self.serialize_mutations {
                MutationOrdering::Serialized
            } else {
                MutationOrdering::Relaxed
            },
            default_currencies: self.seed_currencies.clone(),
            ..Default::default()
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
