//! # 루트(Root) 핸들러
//!
//! ## 엔드포인트
//! - `GET /` → `{ "success": true, "message": "API working successfully", "data": null }`
//! - 그 밖의 등록되지 않은 경로 → 404 봉투
//!
//! 저장소에 접근하지 않으므로 연결 상태와 관계없이 항상 성공합니다.

use crate::{error::AppError, models::ApiResponse};
use axum::Json;

/// `GET /` — API가 동작 중인지 확인합니다.
pub async fn api_status() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message("API working successfully"))
}

/// 어느 라우트에도 맞지 않는 요청
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found.".to_string())
}
