pub mod api;
pub mod state;
pub mod utils;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    routing::{get, post},
    BoxError, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::{
    timeout::{error::Elapsed, TimeoutLayer},
    ServiceBuilder,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use self::api::{meta, parse, upload};
use self::state::AppState;
use self::utils::errors::ApiError;

/// 超时与其他中间件错误转为统一的 JSON 错误响应
async fn middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::TimedOut
    } else {
        ApiError::internal("Internal server error", err)
    }
}

/// 构建完整路由
///
/// 内联 JSON 的请求体上限与上传文件上限一致，上传接口额外预留 multipart 开销。
pub fn router(state: Arc<AppState>) -> Router {
    let parser = &state.settings.parser;
    let inline_limit = parser.max_file_size;
    let upload_limit = parser.max_file_size.saturating_add(upload::MULTIPART_OVERHEAD);
    let timeout = Duration::from_secs(state.settings.server.request_timeout_secs);

    let api = Router::new()
        .route(
            "/parse/",
            post(parse::parse_handler).layer(DefaultBodyLimit::max(inline_limit)),
        )
        .route(
            "/simple-parse/",
            post(parse::simple_parse_handler).layer(DefaultBodyLimit::max(inline_limit)),
        )
        .route(
            "/upload/",
            post(upload::upload_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/sample/", get(meta::sample_handler))
        .route("/health/", get(meta::health_handler));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(middleware_error))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}
