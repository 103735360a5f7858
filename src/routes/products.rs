//! # 상품 본문 검증
//!
//! 상품은 일반 CRUD 핸들러를 그대로 쓰고, 이미지 목록의 형태만 추가로 검사합니다.
//! 이미지 URL 마이그레이션이 모든 상품의 `images`를 해석할 수 있어야 하기 때문입니다.

use crate::error::AppError;
use serde_json::{Map, Value};

/// `images`가 있으면 객체 배열이어야 하고, 각 `url`은 문자열이어야 합니다.
pub fn validate_images(fields: &Map<String, Value>) -> Result<(), AppError> {
    let images = match fields.get("images") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Array(images)) => images,
        Some(_) => {
            return Err(AppError::Validation(
                "images must be an array of image objects.".to_string(),
            ))
        }
    };

    for (index, image) in images.iter().enumerate() {
        let Some(image) = image.as_object() else {
            return Err(AppError::Validation(format!(
                "images[{index}] must be an object."
            )));
        };
        match image.get("url") {
            None | Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::Validation(format!(
                    "images[{index}].url must be a string."
                )))
            }
        }
    }
    Ok(())
}
