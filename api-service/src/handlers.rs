//! Handler模块
//!
//! 每个路由对应一个独立命名的处理函数。

use axum::{extract::State, Json};

use common::errors::AppError;
use common::models::{ColumnEntry, FieldGroup, SampleTable, SqlQuery};
use common::response::{ErrorDetail, PingResponse, ResultsResponse, TablesResponse};
use common::VERSION;

use crate::service::QueryService;
use crate::state::AppState;

fn service(state: AppState) -> QueryService {
    QueryService::new(state.primary, state.secondary)
}

/// 主库示例数据（前 10 行）
#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "primary",
    responses(
        (status = 200, description = "示例行", body = TablesResponse),
        (status = 500, description = "主库连接或查询失败")
    )
)]
pub async fn get_tables(
    State(state): State<AppState>,
) -> Result<Json<TablesResponse>, AppError> {
    let tables = service(state).sample_tables().await?;
    Ok(Json(TablesResponse { tables }))
}

/// 固定的测试表列表
#[utoipa::path(
    get,
    path = "/api/testtables",
    tag = "static",
    responses(
        (status = 200, description = "两张固定测试表", body = Vec<SampleTable>)
    )
)]
pub async fn get_test_tables(State(state): State<AppState>) -> Json<Vec<SampleTable>> {
    Json(service(state).test_tables())
}

/// 固定的字段分组列表
#[utoipa::path(
    get,
    path = "/api/silvertables",
    tag = "static",
    responses(
        (status = 200, description = "两个固定字段分组", body = Vec<FieldGroup>)
    )
)]
pub async fn get_silver_tables(State(state): State<AppState>) -> Json<Vec<FieldGroup>> {
    Json(service(state).silver_tables())
}

/// silver schema 下所有表的列，按表名、列序排序
#[utoipa::path(
    get,
    path = "/api/listtables",
    tag = "primary",
    responses(
        (status = 200, description = "(表名, 列名) 列表", body = Vec<ColumnEntry>),
        (status = 500, description = "主库连接或查询失败")
    )
)]
pub async fn get_list_tables(
    State(state): State<AppState>,
) -> Result<Json<Vec<ColumnEntry>>, AppError> {
    let columns = service(state).list_columns().await?;
    Ok(Json(columns))
}

/// 存活及版本探测
#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "health",
    responses(
        (status = 200, description = "服务版本", body = PingResponse)
    )
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::for_version(VERSION))
}

/// 副库 table_metadata 表内容
#[utoipa::path(
    get,
    path = "/api/sl_tables",
    tag = "secondary",
    responses(
        (status = 200, description = "table_metadata 全部行", body = ResultsResponse),
        (status = 400, description = "副库查询失败", body = ErrorDetail)
    )
)]
pub async fn get_sl_tables(
    State(state): State<AppState>,
) -> Result<Json<ResultsResponse>, AppError> {
    let results = service(state).table_metadata().await?;
    Ok(Json(ResultsResponse { results }))
}

/// 在副库上原样执行调用方提供的 SQL（需开启 ALLOW_RAW_SQL）
#[utoipa::path(
    post,
    path = "/api/sl_execute_sql",
    tag = "secondary",
    request_body = SqlQuery,
    responses(
        (status = 200, description = "语句结果行", body = ResultsResponse),
        (status = 400, description = "SQL 执行失败", body = ErrorDetail),
        (status = 403, description = "未开启原始 SQL 执行", body = ErrorDetail)
    )
)]
pub async fn execute_sl_sql(
    State(state): State<AppState>,
    Json(req): Json<SqlQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let allowed = state.config.allow_raw_sql;
    let results = service(state).execute(&req.query, allowed).await?;
    Ok(Json(ResultsResponse { results }))
}
