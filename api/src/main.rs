mod config;
mod handler;
mod service;

use axum::{routing::get, Router};
use common::Registry;
use config::ApiConfig;
use connectors::{build_connector, ExchangeConfig};
use service::GatewayService;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting exchange gateway");

    let api_config = ApiConfig::from_env()
        .map_err(|e| format!("Failed to load API configuration: {}", e))?;

    let registry = Arc::new(Registry::new());
    let mut service = GatewayService::new(registry.clone());

    for exchange in &api_config.exchanges {
        let config = ExchangeConfig::from_env(*exchange)
            .map_err(|e| format!("Failed to load {} configuration: {}", exchange, e))?;
        let connector = build_connector(config, registry.clone())
            .map_err(|e| format!("Failed to create {} connector: {}", exchange, e))?;

        // A failed load keeps the connector with whatever constraints it has
        if let Err(e) = connector.init_data().await {
            error!("{} init data failed: {}", exchange, e);
        }
        service.add_connector(connector);
    }

    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/v1/exchanges", get(handler::list_exchanges))
        .route("/api/v1/:exchange/coins", get(handler::list_coins))
        .route("/api/v1/:exchange/pairs", get(handler::list_pairs))
        .route("/api/v1/:exchange/orderbook/:pair", get(handler::get_order_book))
        .route("/api/v1/:exchange/trades/:pair", get(handler::get_trades))
        .route("/api/v1/:exchange/balances", get(handler::get_balances))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(service));

    let addr = api_config
        .listen_addr()
        .await
        .map_err(|e| format!("Invalid listen address: {}", e))?;
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
