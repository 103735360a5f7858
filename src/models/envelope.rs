//! # 응답 봉투(Envelope)
//!
//! 모든 엔드포인트는 성공/실패와 관계없이 같은 JSON 형태로 응답합니다.
//!
//! ```json
//! { "success": true, "message": "Categories retrieved successfully.", "data": [...] }
//! ```

use serde::{Deserialize, Serialize};

/// `{success, message, data}` 형태의 공통 응답
///
/// `data`가 `None`이면 JSON에서 `null`로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 데이터를 담은 성공 응답
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 데이터 없는(`data: null`) 성공 응답
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// 실패 응답. `AppError`가 HTTP 응답으로 변환될 때 사용합니다.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
