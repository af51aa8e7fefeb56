use product_api::config::Config;
use product_api::domain::repositories::product_repository::ProductRepository;
use product_api::error::AppError;
use product_api::infrastructure::database::mysql::init_mysql;
use product_api::logging::init_logging;
use product_api::server::{AppState, create_app};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config)?;

    tracing::info!("Starting product API service");

    // 初始化数据库连接
    let db_pool = init_mysql(&config).await?;

    // 创建应用状态，数据访问层只构建一次
    let app_state = AppState {
        config: config.clone(),
        db: db_pool.clone(),
        products: ProductRepository::new(db_pool),
    };

    // 创建并启动服务器
    let app = create_app(app_state).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", &addr);

    axum::serve(listener, app).await?;
    Ok(())
}
