//! REST routes under `/api/v1`.

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use xchange_common::{ConversionResult, ExchangeRate};
use xchange_fx::MarketStats;

use crate::auth::Role;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrencyListResponse {
    pub currencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddCurrencyParams {
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    pub amount: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateResponse {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
}

impl From<ExchangeRate> for ExchangeRateResponse {
    fn from(rate: ExchangeRate) -> Self {
        Self {
            from_currency: rate.pair.from.to_string(),
            to_currency: rate.pair.to.to_string(),
            rate: rate.rate,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExchangeRatesListResponse {
    pub rates: Vec<ExchangeRateResponse>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub stats: MarketStats,
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn list_currencies(State(state): State<Arc<AppState>>) -> Json<CurrencyListResponse> {
    let currencies = state
        .market
        .list_currencies()
        .into_iter()
        .map(String::from)
        .collect();
    Json(CurrencyListResponse { currencies })
}

async fn add_currency(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    params: Result<Query<AddCurrencyParams>, QueryRejection>,
) -> ApiResult<StatusCode> {
    state.auth.require(&headers, Role::Admin)?;
    let params = query(params)?;
    state.market.add_currency(&params.currency)?;
    Ok(StatusCode::CREATED)
}

async fn delete_currency(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> ApiResult<StatusCode> {
    state.auth.require(&headers, Role::Admin)?;
    state.market.remove_currency(&code)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn convert(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ConvertParams>, QueryRejection>,
) -> ApiResult<Json<ConversionResult>> {
    let params = query(params)?;
    let result = state
        .market
        .convert(params.amount, &params.from, &params.to)?;
    Ok(Json(result))
}

async fn list_rates(State(state): State<Arc<AppState>>) -> Json<ExchangeRatesListResponse> {
    let mut rates: Vec<ExchangeRateResponse> = state
        .market
        .list_rates()
        .into_iter()
        .map(ExchangeRateResponse::from)
        .collect();
    rates.sort_by(|a, b| {
        (&a.from_currency, &a.to_currency).cmp(&(&b.from_currency, &b.to_currency))
    });
    Json(ExchangeRatesListResponse { rates })
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        stats: state.market.stats(),
    })
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(detail).into_response()
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/currencies", get(list_currencies).post(add_currency))
        .route("/currencies/:code", delete(delete_currency))
        .route("/exchange", get(convert))
        .route("/rates", get(list_rates))
        .route("/health", get(health));

    Router::new()
        .nest("/api/v1", api)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
