use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    models::{CoinConstraint, Maker, PairConstraint, TradeDetail},
    Error as CommonError,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

use crate::service::{ExchangeSummary, GatewayService};

pub type SharedService = Arc<GatewayService>;

pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            CommonError::NotFound(_) => StatusCode::NOT_FOUND,
            CommonError::ParseError(_) | CommonError::UnsupportedOperation(_) => {
                StatusCode::BAD_REQUEST
            }
            CommonError::MissingCredentials(_) => StatusCode::UNAUTHORIZED,
            CommonError::ExchangeError(_) | CommonError::HttpError(_) => StatusCode::BAD_GATEWAY,
            CommonError::ConfigError(_)
            | CommonError::SigningError(_)
            | CommonError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub async fn list_exchanges(State(service): State<SharedService>) -> Json<Vec<ExchangeSummary>> {
    Json(service.exchanges())
}

pub async fn list_coins(
    State(service): State<SharedService>,
    Path(exchange): Path<String>,
) -> Result<Json<Vec<CoinConstraint>>, ApiError> {
    Ok(Json(service.coins(&exchange)?))
}

pub async fn list_pairs(
    State(service): State<SharedService>,
    Path(exchange): Path<String>,
) -> Result<Json<Vec<PairConstraint>>, ApiError> {
    Ok(Json(service.pairs(&exchange)?))
}

pub async fn get_order_book(
    State(service): State<SharedService>,
    Path((exchange, pair)): Path<(String, String)>,
) -> Result<Json<Maker>, ApiError> {
    Ok(Json(service.order_book(&exchange, &pair).await?))
}

pub async fn get_trades(
    State(service): State<SharedService>,
    Path((exchange, pair)): Path<(String, String)>,
) -> Result<Json<Vec<TradeDetail>>, ApiError> {
    Ok(Json(service.trades(&exchange, &pair).await?))
}

pub async fn get_balances(
    State(service): State<SharedService>,
    Path(exchange): Path<String>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    Ok(Json(service.balances(&exchange).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_http_statuses() {
        let cases = [
            (CommonError::NotFound("pair".into()), StatusCode::NOT_FOUND),
            (CommonError::ParseError("bad".into()), StatusCode::BAD_REQUEST),
            (CommonError::UnsupportedOperation("kind".into()), StatusCode::BAD_REQUEST),
            (CommonError::MissingCredentials("btse".into()), StatusCode::UNAUTHORIZED),
            (CommonError::ExchangeError("down".into()), StatusCode::BAD_GATEWAY),
            (CommonError::ConfigError("env".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn error_response_keeps_the_status() {
        let response = ApiError::from(CommonError::MissingCredentials("bitz".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
