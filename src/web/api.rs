use crate::error::{Error, Result};
use crate::metrics;
use crate::services::Gateway;
use crate::validation::decode_path_segment;
use crate::web::rejection::{error_reply, handle_rejection};
use log::error;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::reply::Response;
use warp::{Filter, Reply};

pub const WELCOME_MESSAGE: &str =
    "Welcome to the pump.fun gateway. Endpoints: /tokens, /token/{symbol}, /trades/{symbol}, /threads, /holders/{symbol}";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// All routes with CORS, JSON rejection handling and request logging applied.
pub fn routes(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["accept", "content-type"])
        .max_age(3600);

    api(gateway)
        .with(cors)
        .recover(handle_rejection)
        .with(warp::log("pump_gateway::web"))
}

pub fn api(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    let root = warp::path::end().map(|| warp::reply::json(&WELCOME_MESSAGE));

    let health = warp::path!("health").map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    });

    let metrics = warp::path!("metrics").and_then(get_metrics);

    let tokens = warp::path!("tokens")
        .and(warp::query::<LimitQuery>())
        .and(with_gateway(gateway.clone()))
        .and_then(list_tokens);

    let token = warp::path!("token" / String)
        .and(with_gateway(gateway.clone()))
        .and_then(get_token);

    let trades = warp::path!("trades" / String)
        .and(warp::query::<LimitQuery>())
        .and(with_gateway(gateway.clone()))
        .and_then(get_trades);

    let threads = warp::path!("threads")
        .and(warp::query::<LimitQuery>())
        .and(with_gateway(gateway.clone()))
        .and_then(get_threads);

    let holders = warp::path!("holders" / String)
        .and(with_gateway(gateway))
        .and_then(get_holders);

    warp::get().and(
        root.or(health)
            .or(metrics)
            .or(tokens)
            .or(token)
            .or(trades)
            .or(threads)
            .or(holders),
    )
}

fn with_gateway(
    gateway: Arc<Gateway>,
) -> impl Filter<Extract = (Arc<Gateway>,), Error = Infallible> + Clone {
    warp::any().map(move || gateway.clone())
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(body) => warp::reply::json(&body).into_response(),
        Err(e) => error_reply(&e),
    }
}

async fn list_tokens(query: LimitQuery, gateway: Arc<Gateway>) -> std::result::Result<Response, Infallible> {
    Ok(respond(gateway.list_tokens(query.limit).await))
}

async fn get_token(symbol: String, gateway: Arc<Gateway>) -> std::result::Result<Response, Infallible> {
    let result = match decode_path_segment(&symbol) {
        Ok(symbol) => gateway.token(&symbol).await,
        Err(e) => Err(e),
    };
    Ok(respond(result))
}

async fn get_trades(
    symbol: String,
    query: LimitQuery,
    gateway: Arc<Gateway>,
) -> std::result::Result<Response, Infallible> {
    let result = match decode_path_segment(&symbol) {
        Ok(symbol) => gateway.trades(&symbol, query.limit).await,
        Err(e) => Err(e),
    };
    Ok(respond(result))
}

async fn get_threads(query: LimitQuery, gateway: Arc<Gateway>) -> std::result::Result<Response, Infallible> {
    Ok(respond(gateway.threads(query.limit).await))
}

async fn get_holders(symbol: String, gateway: Arc<Gateway>) -> std::result::Result<Response, Infallible> {
    let result = match decode_path_segment(&symbol) {
        Ok(symbol) => gateway.holders(&symbol).await,
        Err(e) => Err(e),
    };
    Ok(respond(result))
}

async fn get_metrics() -> std::result::Result<Response, Infallible> {
    let reply = match metrics::render() {
        Ok(text) => warp::reply::with_header(text, "content-type", "text/plain; version=0.0.4")
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            error_reply(&Error::InternalError("Failed to render metrics".to_string()))
        }
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::http::StatusCode;

    #[tokio::test]
    async fn test_welcome_and_health_without_upstream_calls() {
        let gateway = Arc::new(Gateway::new(
            Arc::new(crate::api::MockUpstream::new()),
            Default::default(),
        ));
        let filter = routes(gateway);

        let res = warp::test::request().path("/").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::OK);
        let message: String = serde_json::from_slice(res.body()).unwrap();
        assert!(!message.is_empty());

        let res = warp::test::request().path("/health").reply(&filter).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
