//! # 주문(Order) 라우트
//!
//! 일반 CRUD 핸들러에 사용자별 주문 조회 경로 하나를 더합니다.
//!
//! - `GET /orders/orderByUserId/{userId}` → 해당 사용자(`userID` 필드)의 주문 목록

use crate::{
    db::Filter,
    error::AppError,
    models::{ApiResponse, Document},
    routes::{crud, resources::ORDERS, AppState},
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    crud::router(&ORDERS).route("/orderByUserId/{user_id}", get(orders_by_user))
}

/// 특정 사용자의 주문을 삽입 순서대로 조회합니다. 주문이 없으면 빈 배열.
pub async fn orders_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let filter = Filter::new().eq("userID", user_id)?;
    crud::list_filtered(&ORDERS, &state, &filter).await
}
