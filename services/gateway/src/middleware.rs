//! HTTP middleware applied to every route

use tower_http::cors::CorsLayer;
use tower_http::trace::{HttpMakeClassifier, TraceLayer};

/// Any origin may call the gateway
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// Request/response logging through `tracing`
pub fn trace_layer() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http()
}
