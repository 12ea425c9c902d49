use crate::error::Error;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Rejection, Reply};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::ValidationError(_) => StatusCode::BAD_REQUEST,
        Error::ApiTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::RateLimitExceeded(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::ApiError(_)
        | Error::ApiConnectionFailed(_)
        | Error::NetworkError(_)
        | Error::ApiInvalidData(_)
        | Error::ApiInvalidFormat(_) => StatusCode::BAD_GATEWAY,
        Error::ConfigError(_)
        | Error::ServerError(_)
        | Error::InternalError(_)
        | Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn json_error(status: StatusCode, message: String, kind: &str) -> Response {
    let body = ErrorBody {
        error: message,
        kind: kind.to_string(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

pub fn error_reply(err: &Error) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }
    json_error(status, err.to_string(), err.kind())
}

/// Turns warp's own rejections (unknown route, bad query string, wrong method)
/// into the same JSON error shape the handlers use.
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let reply = if err.is_not_found() {
        json_error(StatusCode::NOT_FOUND, "Route not found".to_string(), "not_found")
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        json_error(StatusCode::BAD_REQUEST, e.to_string(), "invalid_request")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
            "invalid_request",
        )
    } else if let Some(e) = err.find::<warp::filters::cors::CorsForbidden>() {
        json_error(StatusCode::FORBIDDEN, e.to_string(), "invalid_request")
    } else {
        error!("Unhandled rejection: {:?}", err);
        json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
            "internal",
        )
    };
    Ok(reply)
}
