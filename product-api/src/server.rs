use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::products;
use crate::config::Config;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: sqlx::MySqlPool,
    /// 启动时构建一次，所有请求共享
    pub products: ProductRepository,
}

pub async fn create_app(state: AppState) -> Result<Router, AppError> {
    let app_state = Arc::new(state);

    // 健康检查路由
    let health_route = Router::new().route("/health", get(|| async { "OK" }));

    let app = Router::new()
        .nest("/products", products::routes())
        .merge(health_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(app_state);

    Ok(app)
}
