//! 路由模块

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tables", get(handlers::get_tables))
        .route("/api/testtables", get(handlers::get_test_tables))
        .route("/api/silvertables", get(handlers::get_silver_tables))
        .route("/api/listtables", get(handlers::get_list_tables))
        .route("/api/ping", get(handlers::ping))
        .route("/api/sl_tables", get(handlers::get_sl_tables))
        .route("/api/sl_execute_sql", post(handlers::execute_sl_sql))
}
