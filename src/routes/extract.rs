use crate::error::AppError;
use axum::extract::FromRequest;

/// `axum::Json`과 같지만 파싱 실패를 `AppError::Validation`(봉투 형태의 400)으로 돌려줍니다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
