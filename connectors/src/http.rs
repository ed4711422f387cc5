use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::signing::{map_to_url_query, Params};
use common::{Error, Result};
use std::time::Duration;
use tracing::{debug, error};

/// Build the HTTP client a connector uses for all of its calls
pub fn build_client(timeout_secs: u64, proxy: Option<&str>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs.max(1)));
    if let Some(proxy) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }
    Ok(builder.build()?)
}

/// A public GET request
#[derive(Debug, Clone, Default)]
pub struct HttpGet {
    pub uri: String,
    pub params: Params,
    /// Route only this request through the given proxy
    pub proxy: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl HttpGet {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Full URL including the query string
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            self.uri.clone()
        } else {
            format!("{}?{}", self.uri, map_to_url_query(&self.params))
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub uri: String,
    pub status: u16,
    pub body: String,
}

pub async fn http_get_request(client: &reqwest::Client, get: &HttpGet) -> Result<HttpResponse> {
    let url = get.url();
    debug!("GET {}", url);

    let timeout_secs = get.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let response = match &get.proxy {
        Some(proxy) => {
            let proxied = build_client(timeout_secs, Some(proxy))?;
            proxied.get(&url).send().await?
        }
        None => {
            client
                .get(&url)
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .send()
                .await?
        }
    };

    read_response(url, response).await
}

/// Read the body of a response, turning non-2xx statuses into errors
pub async fn read_response(uri: String, response: reqwest::Response) -> Result<HttpResponse> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("API error from {}: {} - {}", uri, status, body);
        return Err(Error::ExchangeError(format!("{} - {}", status, body)));
    }

    Ok(HttpResponse {
        uri,
        status: status.as_u16(),
        body,
    })
}
