use common::{models::ExchangeName, Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Connectors to start, in the order given
    pub exchanges: Vec<ExchangeName>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            exchanges: ExchangeName::ALL.to_vec(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let host = std::env::var("API_HOST").unwrap_or(defaults.host);
        let port = match std::env::var("API_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| Error::ConfigError(format!("API_PORT is not a port: {}", port)))?,
            Err(_) => defaults.port,
        };
        let exchanges = match std::env::var("EXCHANGES") {
            Ok(list) => parse_exchanges(&list)?,
            Err(_) => defaults.exchanges,
        };

        Ok(Self {
            host,
            port,
            exchanges,
        })
    }

    /// `host:port`, where the host may be a name or an IP literal
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve `API_HOST` to the socket address to bind
    pub async fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = self.addr();
        let resolved = tokio::net::lookup_host(&addr)
            .await
            .map_err(|e| Error::ConfigError(format!("Failed to resolve {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| Error::ConfigError(format!("No address found for {}", addr)));
        resolved
    }
}

/// Parse a comma separated exchange list, dropping blanks and duplicates
fn parse_exchanges(list: &str) -> Result<Vec<ExchangeName>> {
    let mut exchanges = Vec::new();
    for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let exchange: ExchangeName = name.parse()?;
        if !exchanges.contains(&exchange) {
            exchanges.push(exchange);
        }
    }
    Ok(exchanges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_list_is_trimmed_and_deduplicated() {
        let exchanges = parse_exchanges(" btse, BITZ ,,btse").unwrap();
        assert_eq!(exchanges, vec![ExchangeName::Btse, ExchangeName::Bitz]);
    }

    #[test]
    fn unknown_exchange_is_rejected() {
        assert!(matches!(
            parse_exchanges("bitz,kraken"),
            Err(Error::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn host_names_resolve_to_a_listen_address() {
        let config = ApiConfig {
            host: "localhost".to_string(),
            port: 3000,
            exchanges: vec![],
        };
        let addr = config.listen_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn defaults_serve_every_exchange() {
        let config = ApiConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.exchanges, ExchangeName::ALL.to_vec());
    }
}
