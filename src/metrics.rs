use lazy_static::lazy_static;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref API_CALLS: IntCounterVec = IntCounterVec::new(
        Opts::new("upstream_calls_total", "Total number of upstream API calls"),
        &["upstream"]
    ).expect("valid metric definition");

    pub static ref API_ERRORS: IntCounterVec = IntCounterVec::new(
        Opts::new("upstream_errors_total", "Total number of failed upstream API calls"),
        &["upstream"]
    ).expect("valid metric definition");

    pub static ref API_LATENCY: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "upstream_latency_seconds",
            "Upstream API call latency in seconds"
        ).buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0]),
        &["upstream"]
    ).expect("valid metric definition");
}

pub fn init() -> Result<(), prometheus::Error> {
    REGISTRY.register(Box::new(API_CALLS.clone()))?;
    REGISTRY.register(Box::new(API_ERRORS.clone()))?;
    REGISTRY.register(Box::new(API_LATENCY.clone()))?;
    Ok(())
}

/// Renders the registry in the Prometheus text format.
pub fn render() -> crate::Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| crate::Error::InternalError(e.to_string()))
}
