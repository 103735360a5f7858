//! # 에러 처리 모듈
//!
//! 라우트 핸들러에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 에러 종류(검증/인증/없음/충돌/저장소/내부)를 구분
//! - `IntoResponse` 구현: 에러를 `{success: false, message, data: null}` 봉투(envelope)
//!   형태의 JSON과 종류에 맞는 HTTP 상태 코드로 변환

use crate::db::{InvalidField, StoreError}; // 필터 필드 이름 에러, 문서 저장소 에러
use crate::models::ApiResponse; // 모든 응답이 공통으로 쓰는 봉투
use axum::{
    extract::rejection::JsonRejection,  // JSON 본문 파싱 실패 시 axum이 만드는 거부(rejection) 값
    http::StatusCode,                   // HTTP 상태 코드 (400, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

// #[derive(Debug, Error)]
// - Debug: 디버깅용 출력 ({:?})
// - Error (thiserror): std::error::Error 트레이트와, #[error("...")]에 적은
//   형식의 Display 트레이트를 자동으로 구현합니다.
//
// 4xx variant는 `{0}`, 즉 담고 있는 메시지를 그대로 Display로 사용하므로
// 클라이언트에게 보내는 메시지가 곧 에러 메시지입니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청 본문이나 파라미터가 잘못됨 (HTTP 400)
    #[error("{0}")]
    Validation(String),

    /// 자격 증명이 올바르지 않음 (HTTP 401)
    #[error("{0}")]
    Unauthorized(String),

    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("{0}")]
    NotFound(String),

    /// 리소스 충돌, 예: 이미 존재하는 사용자 이름 (HTTP 409)
    #[error("{0}")]
    Conflict(String),

    /// 문서 저장소 오류 (HTTP 500)
    /// #[from]: `?` 연산자로 StoreError가 자동으로 AppError::Storage로 변환됩니다.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// 서버 내부 오류 (HTTP 500)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 이 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        // match는 모든 variant를 빠짐없이 처리해야 하므로,
        // 새 에러 종류를 추가하면 여기서 컴파일 에러로 알려줍니다.
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// From 트레이트: `?` 연산자나 `.into()`로 다른 에러 타입을 AppError로 바꿀 수 있게 합니다.

// 잘못된 JSON 본문은 axum 기본 응답(plain text) 대신 봉투 형태의 400으로 바꿉니다.
// body_text(): axum이 만든 사람이 읽을 수 있는 실패 사유
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// 쿼리 파라미터의 필드 이름이 허용되지 않으면 400
impl From<InvalidField> for AppError {
    fn from(err: InvalidField) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 클라이언트 에러(4xx)는 메시지를 그대로 돌려주고,
    /// 서버 에러(5xx)는 실제 내용을 로그에만 기록한 뒤 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx는 고정된 일반 메시지로 바꾸고, 실제 내용은 tracing::error!로만 남깁니다.
        // `&self`로 빌려서 match하므로 self는 아래에서 계속 사용할 수 있습니다.
        let message = match &self {
            AppError::Storage(StoreError::Unavailable) => {
                tracing::error!("Request failed: document store is not connected");
                "Document store is unavailable".to_string()
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        // (StatusCode, Json) 튜플도 IntoResponse를 구현합니다.
        // `::<()>`: data가 항상 null이므로 타입 인자를 ()로 지정합니다.
        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
