//! 数据查询 HTTP 服务
//!
//! 提供以下功能：
//! - 主库（PostgreSQL）示例数据与表结构查询，每个请求独立建立并关闭连接
//! - 副库（SQLite）table_metadata 查询与原始 SQL 执行
//! - 静态表清单与版本探测

mod handlers;
mod routes;
mod service;
mod state;
mod stores;


use anyhow::Context;
use axum::{http::HeaderValue, middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "api-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "数据查询服务 API",
        version = "0.1.3_hybrid",
        description = "PostgreSQL 主库与 SQLite 副库的 JSON 查询接口"
    ),
    paths(
        handlers::get_tables,
        handlers::get_test_tables,
        handlers::get_silver_tables,
        handlers::get_list_tables,
        handlers::ping,
        handlers::get_sl_tables,
        handlers::execute_sl_sql,
    ),
    components(schemas(
        common::models::ColumnEntry,
        common::models::SampleTable,
        common::models::SampleData,
        common::models::FieldGroup,
        common::models::FieldDescriptor,
        common::models::SqlQuery,
        common::response::TablesResponse,
        common::response::ResultsResponse,
        common::response::PingResponse,
        common::response::ErrorDetail,
    )),
    tags(
        (name = "primary", description = "主库端点"),
        (name = "secondary", description = "副库端点"),
        (name = "static", description = "静态数据端点"),
        (name = "health", description = "版本探测端点")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (if present) before anything else
    load_dotenv();

    // 初始化日志追踪
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME).context("invalid configuration")?;
    debug!(
        environment = %config.environment,
        ssl = %config.primary.ssl,
        raw_sql = config.allow_raw_sql,
        "configuration loaded"
    );
    if config.allow_raw_sql {
        tracing::warn!("ALLOW_RAW_SQL is enabled: /api/sl_execute_sql runs arbitrary SQL");
    }

    // 创建应用状态（副库在此处建立）
    let state = AppState::new(config.clone())
        .await
        .context("failed to initialize application state")?;

    let app = create_router(state)?;

    // 启动服务
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(service = %config.service_name, address = %addr, "API service has started.");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn create_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_origins)?;

    Ok(Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Allows the configured origins with credentials, mirroring whatever
/// method and headers the browser asks for.
///
/// A wildcard origin cannot be combined with credentials, so `*` is
/// rejected here rather than left to panic inside the layer.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            if o == "*" {
                anyhow::bail!("CORS origin `*` is not allowed with credentials; list origins explicitly");
            }
            HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin `{}`", o))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Load .env file from the working directory (best-effort, no error if missing).
fn load_dotenv() {
    let Ok(content) = std::fs::read_to_string(".env") else {
        return;
    };
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            // Only set if not already set by the environment
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}
