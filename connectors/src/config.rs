use common::{
    models::{DataSource, ExchangeName},
    Error, Result,
};

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a single exchange connector
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub name: ExchangeName,
    pub api_key: String,
    pub api_secret: String,
    /// Trading password some exchanges require for orders and withdrawals
    pub trade_password: Option<String>,
    pub source: DataSource,
    /// Constraint snapshot path, required when `source` is `JsonFile`
    pub source_uri: Option<String>,
    /// Overrides the exchange's public API URL
    pub base_url: Option<String>,
    pub proxy: Option<String>,
    /// Reported on order book snapshots
    pub worker_ip: Option<String>,
    pub timeout_secs: u64,
}

impl ExchangeConfig {
    /// Public-data-only configuration with default settings
    pub fn new(name: ExchangeName) -> Self {
        Self {
            name,
            api_key: String::new(),
            api_secret: String::new(),
            trade_password: None,
            source: DataSource::ExchangeApi,
            source_uri: None,
            base_url: None,
            proxy: None,
            worker_ip: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.api_secret = api_secret.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Create a connector configuration from `<NAME>_*` environment variables
    pub fn from_env(name: ExchangeName) -> Result<Self> {
        let prefix = name.to_string().to_uppercase();
        let var = |suffix: &str| {
            std::env::var(format!("{}_{}", prefix, suffix))
                .ok()
                .filter(|value| !value.trim().is_empty())
        };

        let source = match var("SOURCE").as_deref() {
            None | Some("api") => DataSource::ExchangeApi,
            Some("json") => DataSource::JsonFile,
            Some(other) => {
                return Err(Error::ConfigError(format!(
                    "{}_SOURCE must be 'api' or 'json', got '{}'",
                    prefix, other
                )))
            }
        };

        let timeout_secs = match var("TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| {
                Error::ConfigError(format!("{}_TIMEOUT_SECS is not a number: {}", prefix, value))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let config = Self {
            name,
            api_key: var("API_KEY").unwrap_or_default(),
            api_secret: var("API_SECRET").unwrap_or_default(),
            trade_password: var("TRADE_PASSWORD"),
            source,
            source_uri: var("SOURCE_URI"),
            base_url: var("BASE_URL"),
            proxy: var("PROXY"),
            worker_ip: std::env::var("WORKER_IP")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source == DataSource::JsonFile && self.source_uri.is_none() {
            return Err(Error::ConfigError(format!(
                "{} uses a JSON constraint file but no source URI is set",
                self.name
            )));
        }
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below share the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_vars(prefix: &str, vars: &[(&str, &str)]) {
        let suffixes = [
            "API_KEY",
            "API_SECRET",
            "TRADE_PASSWORD",
            "SOURCE",
            "SOURCE_URI",
            "BASE_URL",
            "PROXY",
            "TIMEOUT_SECS",
        ];
        for suffix in suffixes {
            std::env::remove_var(format!("{}_{}", prefix, suffix));
        }
        for (suffix, value) in vars {
            std::env::set_var(format!("{}_{}", prefix, suffix), value);
        }
    }

    #[test]
    fn from_env_reads_prefixed_vars() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        set_vars(
            "BTSE",
            &[
                ("API_KEY", "key"),
                ("API_SECRET", "secret"),
                ("SOURCE", "json"),
                ("SOURCE_URI", "/tmp/btse.json"),
                ("BASE_URL", "http://127.0.0.1:9000/spot"),
                ("PROXY", "  "),
                ("TIMEOUT_SECS", "3"),
            ],
        );
        std::env::set_var("WORKER_IP", "10.0.0.7");

        let config = ExchangeConfig::from_env(ExchangeName::Btse).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.api_secret, "secret");
        assert_eq!(config.source, DataSource::JsonFile);
        assert_eq!(config.source_uri.as_deref(), Some("/tmp/btse.json"));
        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:9000/spot"));
        assert_eq!(config.proxy, None);
        assert_eq!(config.trade_password, None);
        assert_eq!(config.worker_ip.as_deref(), Some("10.0.0.7"));
        assert_eq!(config.timeout_secs, 3);

        std::env::set_var("WORKER_IP", " ");
        set_vars("BTSE", &[]);
        let config = ExchangeConfig::from_env(ExchangeName::Btse).unwrap();
        assert_eq!(config.worker_ip, None);
        assert_eq!(config.source, DataSource::ExchangeApi);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.has_credentials());
        std::env::remove_var("WORKER_IP");
    }

    #[test]
    fn from_env_rejects_bad_source_and_timeout() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());

        set_vars("BITZ", &[("SOURCE", "xml")]);
        assert!(matches!(
            ExchangeConfig::from_env(ExchangeName::Bitz),
            Err(Error::ConfigError(msg)) if msg.contains("BITZ_SOURCE")
        ));

        set_vars("BITZ", &[("TIMEOUT_SECS", "abc")]);
        assert!(matches!(
            ExchangeConfig::from_env(ExchangeName::Bitz),
            Err(Error::ConfigError(msg)) if msg.contains("BITZ_TIMEOUT_SECS")
        ));

        set_vars("BITZ", &[("SOURCE", "json")]);
        assert!(matches!(
            ExchangeConfig::from_env(ExchangeName::Bitz),
            Err(Error::ConfigError(_))
        ));
        set_vars("BITZ", &[]);
    }

    #[test]
    fn json_source_requires_uri() {
        let mut config = ExchangeConfig::new(ExchangeName::Btse);
        config.source = DataSource::JsonFile;
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        config.source_uri = Some("btse.json".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn credentials_need_both_halves() {
        let config = ExchangeConfig::new(ExchangeName::Bitz).with_credentials("key", "");
        assert!(!config.has_credentials());
        let config = config.with_credentials("key", "secret");
        assert!(config.has_credentials());
    }
}
