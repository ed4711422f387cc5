//! BTSE spot connector.
//!
//! Private requests carry a `signature` parameter (HMAC-SHA256 over the
//! sorted query) plus `btse-api`, `btse-nonce` and `btse-sign` headers, where
//! `btse-sign` is HMAC-SHA384 over `path + api_key + body`.

mod model;
mod private;
mod public;

use self::model::{MarketSummary, OrderBook, WalletBalance};
use self::private::{decode_envelope, map_status, parse_place_order, side_label};
use self::public::{parse_trade_history, positive_or, to_levels};
use crate::config::ExchangeConfig;
use crate::core::ExchangeCore;
use crate::http::{build_client, http_get_request, read_response, HttpGet, HttpResponse};
use crate::signing::{hmac_sha256_hex, hmac_sha384_hex, map_to_url_query, Params};
use crate::ExchangeConnector;
use async_trait::async_trait;
use chrono::Utc;
use common::{
    models::{
        ChainType, Coin, CoinConstraint, DataSource, ExchangeName, Maker, Order, OrderSide,
        OrderStatus, Pair, PairConstraint, PublicOperation, PublicOperationKind,
    },
    Error, Registry, Result,
};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

const BTSE_API_URL: &str = "https://api.btse.com/spot";

const DEFAULT_TXFEE: f64 = 0.0;
const DEFAULT_WITHDRAW: bool = true;
const DEFAULT_DEPOSIT: bool = true;
const DEFAULT_CONFIRMATION: u32 = 6;
const DEFAULT_LISTED: bool = true;
const DEFAULT_MAKER_FEE: f64 = 0.001;
const DEFAULT_TAKER_FEE: f64 = 0.002;
const DEFAULT_LOT_SIZE: f64 = 0.00000001;
const DEFAULT_PRICE_FILTER: f64 = 0.00000001;

pub struct BtseConnector {
    core: ExchangeCore,
    client: reqwest::Client,
    base_url: String,
}

impl BtseConnector {
    pub fn new(config: ExchangeConfig, registry: Arc<Registry>) -> Result<Self> {
        let client = build_client(config.timeout_secs, config.proxy.as_deref())?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| BTSE_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            core: ExchangeCore::new(config, registry),
            client,
            base_url,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Add the `signature` parameter computed over the sorted query string
    pub(crate) fn sign_params(&self, mut params: Params) -> Result<Params> {
        let signature = hmac_sha256_hex(&self.core.config().api_secret, &map_to_url_query(&params))?;
        params.insert("signature".to_string(), signature);
        Ok(params)
    }

    /// Value of the `btse-sign` header
    pub(crate) fn header_sign(&self, path: &str, body: &str) -> Result<String> {
        let config = self.core.config();
        hmac_sha384_hex(&config.api_secret, &format!("{}{}{}", path, config.api_key, body))
    }

    fn authed(&self, builder: reqwest::RequestBuilder, path: &str, body: &str) -> Result<reqwest::RequestBuilder> {
        let config = self.core.config();
        Ok(builder
            .header("Content-Type", "application/json; charset=utf-8")
            .header("btse-api", config.api_key.as_str())
            .header("btse-nonce", Utc::now().timestamp().to_string())
            .header("btse-sign", self.header_sign(path, body)?))
    }

    /// Signed GET; parameters travel in the query string
    pub(crate) async fn api_key_get(&self, path: &str, params: Params) -> Result<HttpResponse> {
        self.core.require_credentials()?;

        let params = self.sign_params(params)?;
        let url = format!("{}?{}", self.url(path), map_to_url_query(&params));
        debug!("GET {}", url);

        let response = self.authed(self.client.get(&url), path, "")?.send().await?;
        read_response(url, response).await
    }

    /// Signed request with the parameters sent as a JSON object body
    pub(crate) async fn api_key_request(
        &self,
        method: Method,
        path: &str,
        params: Params,
    ) -> Result<HttpResponse> {
        self.core.require_credentials()?;

        let params = self.sign_params(params)?;
        let body = serde_json::to_string(&params)?;
        let url = self.url(path);
        debug!("{} {}", method, url);

        let response = self
            .authed(self.client.request(method, &url), path, &body)?
            .body(body)
            .send()
            .await?;
        read_response(url, response).await
    }

    async fn fetch_market_summary(&self) -> Result<Vec<MarketSummary>> {
        let get = HttpGet::new(self.url("/api/v3.1/market_summary")).timeout(self.core.config().timeout_secs);
        let response = http_get_request(&self.client, &get).await?;
        serde_json::from_str(&response.body).map_err(|e| {
            Error::ParseError(format!("BTSE market summary unmarshal failed: {} {}", e, response.body))
        })
    }

    async fn do_trade_history(&self, operation: &mut PublicOperation) -> Result<()> {
        let symbol = self.symbol_for(&operation.pair)?;
        let get = HttpGet::new(self.url("/api/v3.1/trades"))
            .param("symbol", symbol)
            .proxy(operation.proxy.clone())
            .timeout(self.core.config().timeout_secs);

        let response = http_get_request(&self.client, &get).await.map_err(|e| {
            warn!("BTSE trade history request failed: {}", e);
            e
        })?;

        if operation.debug_mode {
            operation.request_uri = response.uri.clone();
            operation.call_response = response.body.clone();
        }

        operation.trade_history = parse_trade_history(&response.body)?;
        debug!(
            "BTSE returned {} trades for {}",
            operation.trade_history.len(),
            operation.pair.name
        );
        Ok(())
    }

    async fn place_order(&self, pair: &Pair, side: OrderSide, quantity: f64, rate: f64) -> Result<Order> {
        self.core.require_credentials()?;

        let mut params = Params::new();
        params.insert("symbol".to_string(), self.symbol_for(pair)?);
        params.insert("side".to_string(), side_label(side).to_string());
        params.insert("type".to_string(), "LIMIT".to_string());
        params.insert("price".to_string(), rate.to_string());
        params.insert("size".to_string(), quantity.to_string());

        let response = self.api_key_request(Method::POST, "/api/v3.1/order", params).await?;
        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            Error::ParseError(format!("BTSE {} Json Unmarshal Err: {} {}", side_label(side), e, response.body))
        })?;
        let placed = parse_place_order(value)?;
        if placed.order_id.is_empty() {
            return Err(Error::ParseError(format!(
                "BTSE {} returned no order id: {}",
                side_label(side),
                response.body
            )));
        }
        debug!("BTSE placed {} order {} on {}", side, placed.order_id, pair.name);

        let mut order = Order::new(pair.clone(), placed.order_id, side, quantity, rate);
        order.json_response = response.body;
        Ok(order)
    }

    fn symbol_for(&self, pair: &Pair) -> Result<String> {
        let symbol = self.core.get_symbol_by_pair(pair);
        if symbol.is_empty() {
            return Err(Error::NotFound(format!("BTSE does not list pair {}", pair.name)));
        }
        Ok(symbol)
    }
}

#[async_trait]
impl ExchangeConnector for BtseConnector {
    fn name(&self) -> ExchangeName {
        ExchangeName::Btse
    }

    fn core(&self) -> &ExchangeCore {
        &self.core
    }

    async fn get_coins_data(&self) -> Result<()> {
        let markets = self.fetch_market_summary().await?;
        let registry = self.core.registry();

        for market in markets {
            let symbol = market.base;
            let coin = match self.core.source() {
                DataSource::ExchangeApi => Some(registry.get_or_add_coin(&symbol)),
                DataSource::JsonFile => self.core.get_coin_by_symbol(&symbol),
            };
            let Some(coin) = coin else { continue };

            let constraint = match self.core.get_coin_constraint(&coin) {
                Some(mut existing) => {
                    existing.ex_symbol = symbol;
                    existing
                }
                None => CoinConstraint {
                    coin_id: coin.id,
                    coin,
                    ex_symbol: symbol,
                    chain_type: ChainType::Mainnet,
                    tx_fee: DEFAULT_TXFEE,
                    withdraw: DEFAULT_WITHDRAW,
                    deposit: DEFAULT_DEPOSIT,
                    confirmation: DEFAULT_CONFIRMATION,
                    listed: DEFAULT_LISTED,
                },
            };
            self.core.set_coin_constraint(constraint);
        }
        Ok(())
    }

    async fn get_pairs_data(&self) -> Result<()> {
        let markets = self.fetch_market_summary().await?;
        let registry = self.core.registry();

        for market in markets {
            let pair = match self.core.source() {
                // Quote currencies have no coin constraint but still need a registry id
                DataSource::ExchangeApi => registry.get_pair(
                    &registry.get_or_add_coin(&market.quote),
                    &registry.get_or_add_coin(&market.base),
                ),
                DataSource::JsonFile => self.core.get_pair_by_symbol(&market.symbol),
            };
            let Some(pair) = pair else { continue };

            let constraint = match self.core.get_pair_constraint(&pair) {
                Some(mut existing) => {
                    existing.ex_symbol = market.symbol;
                    existing
                }
                None => PairConstraint {
                    pair_id: pair.id,
                    pair,
                    ex_symbol: market.symbol,
                    maker_fee: DEFAULT_MAKER_FEE,
                    taker_fee: DEFAULT_TAKER_FEE,
                    lot_size: positive_or(market.min_size_increment, DEFAULT_LOT_SIZE),
                    price_filter: positive_or(market.min_price_increment, DEFAULT_PRICE_FILTER),
                    listed: market.active,
                },
            };
            self.core.set_pair_constraint(constraint);
        }
        Ok(())
    }

    async fn order_book(&self, pair: &Pair) -> Result<Maker> {
        let symbol = self.symbol_for(pair)?;
        let get = HttpGet::new(self.url("/api/v3.1/orderbook"))
            .param("symbol", symbol)
            .timeout(self.core.config().timeout_secs);

        let before_timestamp = Utc::now().timestamp_millis();
        let response = http_get_request(&self.client, &get).await?;
        let book: OrderBook = serde_json::from_str(&response.body).map_err(|e| {
            Error::ParseError(format!("BTSE orderbook unmarshal failed: {} {}", e, response.body))
        })?;
        let after_timestamp = Utc::now().timestamp_millis();

        Ok(Maker {
            worker_ip: self.core.config().worker_ip.clone(),
            source: DataSource::ExchangeApi,
            before_timestamp,
            after_timestamp,
            bids: to_levels(&book.buy_quote),
            asks: to_levels(&book.sell_quote),
        })
    }

    async fn load_public_data(&self, operation: &mut PublicOperation) -> Result<()> {
        match operation.kind {
            PublicOperationKind::TradeHistory => self.do_trade_history(operation).await,
            other => Err(Error::UnsupportedOperation(format!(
                "BTSE LoadPublicData does not serve {}",
                other
            ))),
        }
    }

    async fn update_all_balances(&self) -> Result<()> {
        self.core.require_credentials()?;

        let response = self.api_key_get("/api/v3.1/user/wallet", Params::new()).await?;
        let balances: Vec<WalletBalance> = serde_json::from_str(&response.body).map_err(|e| {
            Error::ParseError(format!("BTSE wallet unmarshal failed: {} {}", e, response.body))
        })?;

        for balance in balances {
            if let Some(coin) = self.core.get_coin_by_symbol(&balance.currency) {
                self.core.set_balance(&coin, balance.available);
            }
        }
        Ok(())
    }

    async fn withdraw(&self, coin: &Coin, quantity: f64, address: &str, tag: &str) -> Result<()> {
        self.core.require_credentials()?;

        let symbol = self.core.get_symbol_by_coin(coin);
        if symbol.is_empty() {
            return Err(Error::NotFound(format!("BTSE does not list coin {}", coin.code)));
        }

        let mut params = Params::new();
        params.insert("currency".to_string(), symbol);
        params.insert("address".to_string(), address.to_string());
        params.insert("amount".to_string(), quantity.to_string());
        params.insert("timestamp".to_string(), Utc::now().timestamp_millis().to_string());
        if !tag.is_empty() {
            params.insert("tag".to_string(), tag.to_string());
        }

        let response = self
            .api_key_request(Method::POST, "/api/v3.1/user/wallet/withdraw", params)
            .await?;
        decode_envelope(&response.body, "Withdraw")?;
        info!("BTSE withdrawal of {} {} submitted", quantity, coin.code);
        Ok(())
    }

    async fn limit_buy(&self, pair: &Pair, quantity: f64, rate: f64) -> Result<Order> {
        self.place_order(pair, OrderSide::Buy, quantity, rate).await
    }

    async fn limit_sell(&self, pair: &Pair, quantity: f64, rate: f64) -> Result<Order> {
        self.place_order(pair, OrderSide::Sell, quantity, rate).await
    }

    async fn order_status(&self, order: &mut Order) -> Result<()> {
        self.core.require_credentials()?;

        let mut params = Params::new();
        params.insert("symbol".to_string(), self.symbol_for(&order.pair)?);
        params.insert("orderID".to_string(), order.order_id.clone());

        let response = self.api_key_get("/api/v3.1/order", params).await?;
        let data = decode_envelope(&response.body, "OrderStatus")?;
        let status = parse_place_order(data)?;

        order.status = map_status(&status.status);
        order.deal_rate = status.average_fill_price;
        order.deal_quantity = status.fill_size;
        Ok(())
    }

    async fn cancel_order(&self, order: &mut Order) -> Result<()> {
        self.core.require_credentials()?;

        let mut params = Params::new();
        params.insert("symbol".to_string(), self.symbol_for(&order.pair)?);
        params.insert("orderID".to_string(), order.order_id.clone());

        let response = self
            .api_key_request(Method::DELETE, "/api/v3.1/order", params)
            .await?;
        decode_envelope(&response.body, "CancelOrder")?;

        order.status = OrderStatus::Canceling;
        order.cancel_status = response.body;
        Ok(())
    }
}
