//! Bit-Z spot connector.
//!
//! Public endpoints are plain GETs. Private endpoints are form POSTs carrying
//! `apiKey`, `timeStamp`, `nonce` and an MD5 `sign` over the sorted parameters
//! followed by the API secret.

mod model;
mod private;
mod public;

use self::model::{decode, CoinOut, Depth, EntrustSheet, SymbolList, UserAssets};
use self::private::{map_status, optional_f64, side_code};
use self::public::{parse_levels, parse_trade_history, precision_step};
use crate::config::ExchangeConfig;
use crate::core::ExchangeCore;
use crate::http::{build_client, http_get_request, read_response, HttpGet, HttpResponse};
use crate::json::value_to_string;
use crate::signing::{map_to_url_query, md5_hex, Params};
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
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

const BITZ_API_URL: &str = "https://apiv2.bitz.com";

const DEFAULT_TXFEE: f64 = 0.0;
const DEFAULT_WITHDRAW: bool = true;
const DEFAULT_DEPOSIT: bool = true;
const DEFAULT_CONFIRMATION: u32 = 12;
const DEFAULT_LISTED: bool = true;
const DEFAULT_MAKER_FEE: f64 = 0.002;
const DEFAULT_TAKER_FEE: f64 = 0.002;

pub struct BitzConnector {
    core: ExchangeCore,
    client: reqwest::Client,
    base_url: String,
}

impl BitzConnector {
    pub fn new(config: ExchangeConfig, registry: Arc<Registry>) -> Result<Self> {
        let client = build_client(config.timeout_secs, config.proxy.as_deref())?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| BITZ_API_URL.to_string())
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

    /// Add the authentication fields and the MD5 signature to `params`
    pub(crate) fn sign_params(&self, params: &mut Params, timestamp: i64, nonce: &str) {
        let config = self.core.config();
        params.insert("apiKey".to_string(), config.api_key.clone());
        params.insert("timeStamp".to_string(), timestamp.to_string());
        params.insert("nonce".to_string(), nonce.to_string());
        let payload = format!("{}{}", map_to_url_query(params), config.api_secret);
        params.insert("sign".to_string(), md5_hex(&payload));
    }

    /// Signed form POST to a private endpoint
    pub(crate) async fn api_key_post(&self, path: &str, mut params: Params) -> Result<HttpResponse> {
        self.core.require_credentials()?;

        let now = Utc::now();
        let nonce = format!("{:06}", now.timestamp_subsec_micros() % 1_000_000);
        self.sign_params(&mut params, now.timestamp(), &nonce);

        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).form(&params).send().await?;
        read_response(url, response).await
    }

    fn trade_password(&self) -> String {
        self.core.config().trade_password.clone().unwrap_or_default()
    }

    async fn fetch_symbol_list(&self) -> Result<SymbolList> {
        let get = HttpGet::new(self.url("/Market/symbolList")).timeout(self.core.config().timeout_secs);
        let response = http_get_request(&self.client, &get).await?;
        decode(&response.body)
    }

    async fn do_trade_history(&self, operation: &mut PublicOperation) -> Result<()> {
        let symbol = self.symbol_for(&operation.pair)?;
        let get = HttpGet::new(self.url("/Market/order"))
            .param("symbol", symbol)
            .proxy(operation.proxy.clone())
            .timeout(self.core.config().timeout_secs);

        let response = http_get_request(&self.client, &get).await.map_err(|e| {
            warn!("Bitz trade history request failed: {}", e);
            e
        })?;

        if operation.debug_mode {
            operation.request_uri = response.uri.clone();
            operation.call_response = response.body.clone();
        }

        operation.trade_history = parse_trade_history(&response.body)?;
        debug!(
            "Bitz returned {} trades for {}",
            operation.trade_history.len(),
            operation.pair.name
        );
        Ok(())
    }

    async fn place_order(&self, pair: &Pair, side: OrderSide, quantity: f64, rate: f64) -> Result<Order> {
        self.core.require_credentials()?;

        let mut params = Params::new();
        params.insert("symbol".to_string(), self.symbol_for(pair)?);
        params.insert("type".to_string(), side_code(side).to_string());
        params.insert("price".to_string(), rate.to_string());
        params.insert("number".to_string(), quantity.to_string());
        params.insert("tradePwd".to_string(), self.trade_password());

        let response = self.api_key_post("/Trade/addEntrustSheet", params).await?;
        let sheet: EntrustSheet = decode(&response.body)?;
        debug!("Bitz placed {} order {} on {}", side, sheet.id, pair.name);

        let mut order = Order::new(pair.clone(), sheet.id, side, quantity, rate);
        order.json_response = response.body;
        Ok(order)
    }

    fn symbol_for(&self, pair: &Pair) -> Result<String> {
        let symbol = self.core.get_symbol_by_pair(pair);
        if symbol.is_empty() {
            return Err(Error::NotFound(format!("Bitz does not list pair {}", pair.name)));
        }
        Ok(symbol)
    }
}

#[async_trait]
impl ExchangeConnector for BitzConnector {
    fn name(&self) -> ExchangeName {
        ExchangeName::Bitz
    }

    fn core(&self) -> &ExchangeCore {
        &self.core
    }

    async fn get_coins_data(&self) -> Result<()> {
        let symbols = self.fetch_symbol_list().await?;

        let mut codes = BTreeSet::new();
        for info in symbols.values() {
            codes.insert(info.coin_from.to_lowercase());
            codes.insert(info.coin_to.to_lowercase());
        }

        let registry = self.core.registry();
        for symbol in codes {
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
        let symbols = self.fetch_symbol_list().await?;
        let registry = self.core.registry();

        for info in symbols.values() {
            let pair = match self.core.source() {
                DataSource::ExchangeApi => {
                    match (registry.get_coin(&info.coin_to), registry.get_coin(&info.coin_from)) {
                        (Some(base), Some(target)) => registry.get_pair(&base, &target),
                        _ => None,
                    }
                }
                DataSource::JsonFile => self.core.get_pair_by_symbol(&info.name),
            };
            let Some(pair) = pair else { continue };

            let constraint = match self.core.get_pair_constraint(&pair) {
                Some(mut existing) => {
                    existing.ex_symbol = info.name.clone();
                    existing
                }
                None => PairConstraint {
                    pair_id: pair.id,
                    pair,
                    ex_symbol: info.name.clone(),
                    maker_fee: DEFAULT_MAKER_FEE,
                    taker_fee: DEFAULT_TAKER_FEE,
                    lot_size: precision_step(info.number_float),
                    price_filter: precision_step(info.price_float),
                    listed: info.status == "1",
                },
            };
            self.core.set_pair_constraint(constraint);
        }
        Ok(())
    }

    async fn order_book(&self, pair: &Pair) -> Result<Maker> {
        let symbol = self.symbol_for(pair)?;
        let get = HttpGet::new(self.url("/Market/depth"))
            .param("symbol", symbol)
            .timeout(self.core.config().timeout_secs);

        let before_timestamp = Utc::now().timestamp_millis();
        let response = http_get_request(&self.client, &get).await?;
        let depth: Depth = decode(&response.body)?;
        let after_timestamp = Utc::now().timestamp_millis();

        Ok(Maker {
            worker_ip: self.core.config().worker_ip.clone(),
            source: DataSource::ExchangeApi,
            before_timestamp,
            after_timestamp,
            bids: parse_levels(&depth.bids)?,
            asks: parse_levels(&depth.asks)?,
        })
    }

    async fn load_public_data(&self, operation: &mut PublicOperation) -> Result<()> {
        match operation.kind {
            PublicOperationKind::TradeHistory => self.do_trade_history(operation).await,
            other => Err(Error::UnsupportedOperation(format!(
                "Bitz LoadPublicData does not serve {}",
                other
            ))),
        }
    }

    async fn update_all_balances(&self) -> Result<()> {
        self.core.require_credentials()?;

        let response = self.api_key_post("/Assets/getUserAssets", Params::new()).await?;
        let assets: UserAssets = decode(&response.body)?;

        for asset in assets.info {
            if let Some(coin) = self.core.get_coin_by_symbol(&asset.name) {
                self.core.set_balance(&coin, asset.over);
            }
        }
        Ok(())
    }

    async fn withdraw(&self, coin: &Coin, quantity: f64, address: &str, tag: &str) -> Result<()> {
        self.core.require_credentials()?;

        let symbol = self.core.get_symbol_by_coin(coin);
        if symbol.is_empty() {
            return Err(Error::NotFound(format!("Bitz does not list coin {}", coin.code)));
        }

        let mut params = Params::new();
        params.insert("coin".to_string(), symbol);
        params.insert("number".to_string(), quantity.to_string());
        params.insert("address".to_string(), address.to_string());
        params.insert("tradePwd".to_string(), self.trade_password());
        if !tag.is_empty() {
            params.insert("addressMark".to_string(), tag.to_string());
        }

        let response = self.api_key_post("/Trade/coinOut", params).await?;
        let withdrawal: CoinOut = decode(&response.body)?;
        info!("Bitz withdrawal {} of {} {} submitted", withdrawal.id, quantity, coin.code);
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
        params.insert("entrustSheetId".to_string(), order.order_id.clone());

        let response = self.api_key_post("/Trade/getEntrustSheetInfo", params).await?;
        let sheet: EntrustSheet = decode(&response.body)?;

        order.status = sheet
            .status
            .as_ref()
            .map(value_to_string)
            .map(|code| map_status(&code))
            .unwrap_or(OrderStatus::Other);
        order.deal_quantity = match optional_f64(sheet.number_deal.as_ref())? {
            Some(filled) => filled,
            None => sheet.number - sheet.number_over,
        };
        order.deal_rate = optional_f64(sheet.average_price.as_ref())?
            .filter(|price| *price > 0.0)
            .unwrap_or(sheet.price);
        Ok(())
    }

    async fn cancel_order(&self, order: &mut Order) -> Result<()> {
        self.core.require_credentials()?;

        let mut params = Params::new();
        params.insert("entrustSheetId".to_string(), order.order_id.clone());

        let response = self.api_key_post("/Trade/cancelEntrustSheet", params).await?;
        decode::<Value>(&response.body)?;

        order.status = OrderStatus::Canceling;
        order.cancel_status = response.body;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_md5_of_sorted_query_plus_secret() {
        let config = ExchangeConfig::new(ExchangeName::Bitz).with_credentials("k1", "s3cret");
        let connector = BitzConnector::new(config, Arc::new(Registry::new())).unwrap();

        let mut params = Params::new();
        params.insert("symbol".to_string(), "eth_btc".to_string());
        connector.sign_params(&mut params, 1_533_000_000, "000123");

        let expected = md5_hex("apiKey=k1&nonce=000123&symbol=eth_btc&timeStamp=1533000000s3cret");
        assert_eq!(params.get("sign"), Some(&expected));
        assert_eq!(params.get("timeStamp").map(String::as_str), Some("1533000000"));
    }
}
